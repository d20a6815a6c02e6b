//! Engine binary for the Accrete simulation.
//!
//! This is the main entry point that wires together the gravity loop,
//! merge scanner, canon store, and result generator. It loads
//! configuration, spawns the seed bodies, and runs the simulation loop
//! until a termination condition is met (or forever, when unbounded).
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `accrete-config.yaml`
//! 3. Load the persisted canon store
//! 4. Construct the generation backend
//! 5. Spawn seed bodies on the spawn circle
//! 6. Run the simulation loop
//! 7. Log the summary

mod error;
mod resolve;
mod sim;
mod spawner;

use std::path::Path;
use std::sync::Arc;

use accrete_canon::CanonStore;
use accrete_core::config::SimulationConfig;
use accrete_core::registry::BodyRegistry;
use accrete_gen::{Generator, OllamaClient, StubGenerator};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::sim::SimHandles;

/// Environment variable overriding the config file path.
const CONFIG_ENV: &str = "ACCRETE_CONFIG";

/// Default config file path, relative to the working directory.
const CONFIG_FILE: &str = "accrete-config.yaml";

/// Application entry point for the Accrete engine.
///
/// # Errors
///
/// Returns an error if configuration loading, seed spawning, or the
/// simulation itself fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("accrete-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        world_name = config.world.name,
        timestep_ms = config.world.timestep_ms,
        scan_interval_ms = config.scanner.scan_interval_ms,
        max_tier = config.scanner.max_tier,
        "Configuration loaded"
    );

    // 3. Load the persisted canon store.
    let canon = CanonStore::load(&config.canon.file);
    info!(
        path = config.canon.file,
        entries = canon.len(),
        "Canon store loaded"
    );

    // 4. Construct the generation backend.
    let generator = match config.generator.backend.as_str() {
        "stub" => Generator::Stub(StubGenerator::new()),
        backend => {
            if backend != "ollama" {
                warn!(backend, "unknown generator backend, using ollama");
            }
            Generator::Ollama(OllamaClient::new(
                &config.generator.chat_url,
                &config.generator.model,
            ))
        }
    };
    info!(backend = generator.name(), "Generator initialized");

    // 5. Spawn seed bodies.
    let mut registry = BodyRegistry::new();
    let spawned = {
        let mut rng = rand::rng();
        spawner::spawn_seed_bodies(&config.spawn, &mut registry, &mut rng)?
    };
    info!(bodies_spawned = spawned.len(), "Seed bodies spawned");

    // 6. Run the simulation loop.
    let handles = SimHandles {
        registry: Arc::new(Mutex::new(registry)),
        canon: Arc::new(Mutex::new(canon)),
        generator: Arc::new(generator),
    };
    let summary = sim::run_simulation(&handles, &config).await;

    // 7. Log the summary.
    info!(
        end_reason = ?summary.end_reason,
        total_ticks = summary.total_ticks,
        merges_dispatched = summary.merges_dispatched,
        surviving_bodies = handles.registry.lock().await.len(),
        canon_entries = handles.canon.lock().await.len(),
        "Simulation complete"
    );

    Ok(())
}

/// Load configuration from `ACCRETE_CONFIG` or the default path,
/// falling back to built-in defaults when no file is present.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_owned());
    let path = Path::new(&path);
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        warn!(path = %path.display(), "config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}
