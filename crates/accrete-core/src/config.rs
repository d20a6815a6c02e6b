//! Configuration loading and typed config structures for Accrete.
//!
//! The canonical configuration lives in `accrete-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and provides a loader that reads the file. Every
//! section and field carries a default matching the original tuning, so
//! a missing or partial file still yields a runnable configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration is structurally valid but inconsistent.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, physics timestep).
    #[serde(default)]
    pub world: WorldConfig,

    /// Gravity simulator tuning.
    #[serde(default)]
    pub gravity: GravityConfig,

    /// Merge scanner tuning.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Seed spawn settings.
    #[serde(default)]
    pub spawn: SpawnConfig,

    /// Result generator backend settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Canon store settings.
    #[serde(default)]
    pub canon: CanonConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.world.timestep_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "world.timestep_ms must be at least 1".to_owned(),
            });
        }
        if self.scanner.scan_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "scanner.scan_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.scanner.max_tier < 2 {
            return Err(ConfigError::Invalid {
                reason: "scanner.max_tier must be at least 2".to_owned(),
            });
        }
        if self.spawn.seed_names.len() != self.spawn.seed_emojis.len() {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "spawn.seed_names ({}) and spawn.seed_emojis ({}) must have equal length",
                    self.spawn.seed_names.len(),
                    self.spawn.seed_emojis.len()
                ),
            });
        }
        if self.spawn.start_count > self.spawn.seed_names.len() {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "spawn.start_count ({}) exceeds the seed pool ({})",
                    self.spawn.start_count,
                    self.spawn.seed_names.len()
                ),
            });
        }
        Ok(())
    }
}

/// World-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// World name used in logs.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Fixed physics timestep in milliseconds.
    #[serde(default = "default_timestep_ms")]
    pub timestep_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            timestep_ms: default_timestep_ms(),
        }
    }
}

fn default_world_name() -> String {
    String::from("accrete")
}

const fn default_timestep_ms() -> u64 {
    20
}

/// Gravity simulator tuning.
///
/// The spring constant is the center-bias term: not realistic physics,
/// but it guarantees bodies trend toward a shared interaction region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GravityConfig {
    /// Gravitational constant (tune with the mass scale).
    #[serde(default = "default_g")]
    pub g: f32,

    /// Softening length added to squared distances to avoid
    /// singularities as bodies approach each other.
    #[serde(default = "default_softening")]
    pub softening: f32,

    /// Per-step acceleration magnitude cap, reduces jitter.
    #[serde(default = "default_max_accel")]
    pub max_accel: f32,

    /// Linear spring constant toward the origin.
    #[serde(default = "default_k_spring")]
    pub k_spring: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            g: default_g(),
            softening: default_softening(),
            max_accel: default_max_accel(),
            k_spring: default_k_spring(),
        }
    }
}

const fn default_g() -> f32 {
    0.10
}

const fn default_softening() -> f32 {
    0.30
}

const fn default_max_accel() -> f32 {
    20.0
}

const fn default_k_spring() -> f32 {
    0.25
}

/// Merge scanner tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScannerConfig {
    /// Adjacency radius for a tier-2 merge; higher tiers scale it by the
    /// R8 progression.
    #[serde(default = "default_base_radius")]
    pub base_radius: f32,

    /// Base physical radius of a tier-1 body, used for the per-body
    /// size allowance when testing pool membership.
    #[serde(default = "default_body_base_radius")]
    pub body_base_radius: f32,

    /// Wall-clock interval between scans, in milliseconds. Deliberately
    /// decoupled from the physics rate to bound the search cost.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,

    /// Maximum merge target tier; caps content generation and pacing.
    #[serde(default = "default_max_tier")]
    pub max_tier: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_radius: default_base_radius(),
            body_base_radius: default_body_base_radius(),
            scan_interval_ms: default_scan_interval_ms(),
            max_tier: default_max_tier(),
        }
    }
}

const fn default_base_radius() -> f32 {
    1.2
}

const fn default_body_base_radius() -> f32 {
    0.4
}

const fn default_scan_interval_ms() -> u64 {
    200
}

const fn default_max_tier() -> u32 {
    8
}

/// Seed spawn settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpawnConfig {
    /// Number of distinct seeds to spawn at startup.
    #[serde(default = "default_start_count")]
    pub start_count: usize,

    /// Radius of the circle seeds are placed on.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,

    /// Magnitude of the random initial impulse given to each seed.
    #[serde(default = "default_spawn_impulse")]
    pub impulse: f32,

    /// Weight assigned to every seed body.
    #[serde(default = "default_seed_weight")]
    pub seed_weight: u8,

    /// Pool of seed creature names.
    #[serde(default = "default_seed_names")]
    pub seed_names: Vec<String>,

    /// Pool of seed emoji, parallel to `seed_names`.
    #[serde(default = "default_seed_emojis")]
    pub seed_emojis: Vec<String>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            start_count: default_start_count(),
            spawn_radius: default_spawn_radius(),
            impulse: default_spawn_impulse(),
            seed_weight: default_seed_weight(),
            seed_names: default_seed_names(),
            seed_emojis: default_seed_emojis(),
        }
    }
}

const fn default_start_count() -> usize {
    4
}

const fn default_spawn_radius() -> f32 {
    3.0
}

const fn default_spawn_impulse() -> f32 {
    1.5
}

const fn default_seed_weight() -> u8 {
    3
}

fn default_seed_names() -> Vec<String> {
    [
        "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake", "Horse", "Goat", "Monkey", "Rooster",
        "Dog", "Pig",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect()
}

fn default_seed_emojis() -> Vec<String> {
    [
        "🐀", "🐂", "🐯", "🐇", "🐲", "🐍", "🐎", "🐐", "🐒", "🐓", "🐶", "🐖",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect()
}

/// Result generator backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Backend selector: `ollama` or `stub`.
    #[serde(default = "default_generator_backend")]
    pub backend: String,

    /// Ollama chat endpoint URL.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Model identifier passed to the chat endpoint.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: default_generator_backend(),
            chat_url: default_chat_url(),
            model: default_model(),
        }
    }
}

fn default_generator_backend() -> String {
    String::from("ollama")
}

fn default_chat_url() -> String {
    String::from("http://localhost:11434/api/chat")
}

fn default_model() -> String {
    String::from("gemma3n:latest")
}

/// Canon store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanonConfig {
    /// Path of the persisted canon JSON file.
    #[serde(default = "default_canon_file")]
    pub file: String,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            file: default_canon_file(),
        }
    }
}

fn default_canon_file() -> String {
    String::from("canon.json")
}

/// Simulation boundary parameters. Zero means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many physics ticks (0 = run forever).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this much wall-clock time (0 = run forever).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            max_real_time_seconds: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config.world.timestep_ms, 20);
        assert_eq!(config.gravity.g, 0.10);
        assert_eq!(config.scanner.max_tier, 8);
        assert_eq!(config.spawn.seed_names.len(), 12);
        assert_eq!(config.spawn.seed_names.len(), config.spawn.seed_emojis.len());
        assert_eq!(config.canon.file, "canon.json");
        assert_eq!(config.simulation.max_ticks, 0);
    }

    #[test]
    fn partial_yaml_overrides_one_section() {
        let yaml = r"
gravity:
  g: 0.5
  k_spring: 0.0
scanner:
  max_tier: 6
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.gravity.g, 0.5);
        assert_eq!(config.gravity.k_spring, 0.0);
        // Untouched fields keep defaults.
        assert_eq!(config.gravity.softening, 0.30);
        assert_eq!(config.scanner.max_tier, 6);
        assert_eq!(config.scanner.base_radius, 1.2);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(SimulationConfig::parse(": not yaml :").is_err());
    }

    #[test]
    fn zero_timestep_rejected() {
        let yaml = r"
world:
  timestep_ms: 0
";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn mismatched_seed_pools_rejected() {
        let yaml = r#"
spawn:
  seed_names: ["Rat", "Ox"]
  seed_emojis: ["🐀"]
"#;
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn oversized_start_count_rejected() {
        let yaml = r#"
spawn:
  start_count: 3
  seed_names: ["Rat", "Ox"]
  seed_emojis: ["🐀", "🐂"]
"#;
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
