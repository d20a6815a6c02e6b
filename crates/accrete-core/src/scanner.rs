//! The periodic merge-candidate search.
//!
//! On each invocation the scanner snapshots the live bodies, derives the
//! highest achievable target tier from total points, and walks targets
//! downward looking for a spatially-adjacent minimal subset whose points
//! reach the tier threshold. At most one merge is planned per invocation
//! -- a pacing decision, not a search limitation.
//!
//! The scanner itself is pure: it produces a [`MergePlan`] and touches
//! nothing. The engine commits the plan by calling
//! [`BodyRegistry::take_all`] *before* dispatching the asynchronous
//! result resolution, which is what makes double consumption impossible.
//!
//! [`BodyRegistry::take_all`]: crate::registry::BodyRegistry::take_all

use accrete_types::{Body, BodyId, MergeId, MergeMode, combo_key, highest_tier_from_points, points_for_tier};
use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::config::ScannerConfig;
use crate::registry::BodyRegistry;

/// Positions with squared magnitude below this are treated as degenerate
/// (no defined outward direction).
const DEGENERATE_SQ: f32 = 1e-8;

/// A planned merge: which bodies to consume and what to make of them.
///
/// Source names and emojis are listed in consumption order (nearest to
/// the seed first); the combo key is order-independent by construction.
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Correlation ID for dispatch/completion logging.
    pub merge_id: MergeId,

    /// IDs of the bodies to consume, in consumption order.
    pub consumed: Vec<BodyId>,

    /// Display names of the consumed bodies, in consumption order.
    pub source_names: Vec<String>,

    /// Emoji of the consumed bodies, parallel to `source_names`.
    pub source_emojis: Vec<String>,

    /// Tier of the merged result.
    pub target_tier: u32,

    /// Narrative mode derived from the target tier.
    pub mode: MergeMode,

    /// Canonical cache key for the result.
    pub key: String,

    /// Centroid of the consumed positions; the spawn point.
    pub centroid: Vec2,
}

/// The merge scanner.
#[derive(Debug, Clone)]
pub struct MergeScanner {
    /// Tuning constants.
    config: ScannerConfig,
}

impl MergeScanner {
    /// Create a scanner with the given tuning.
    pub const fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Search radius for a target tier: `base_radius * 10^((t-2)/8)`,
    /// an R8 preferred-number progression (tier 2 uses the base).
    pub fn radius_for_tier(&self, target_tier: u32) -> f32 {
        let steps = target_tier.saturating_sub(2);
        self.config.base_radius * 10_f32.powf(steps_f32(steps) / 8.0)
    }

    /// Plan at most one merge over the current registry.
    ///
    /// Returns `None` when the registry is empty or no target tier down
    /// to 2 admits an adjacent subset reaching its threshold. Tier 1
    /// bodies are primitives and never merge *targets*, so 2 is the
    /// floor of the search.
    pub fn plan(&self, registry: &BodyRegistry) -> Option<MergePlan> {
        let bodies: Vec<&Body> = registry.values().collect();
        if bodies.is_empty() {
            return None;
        }

        let total_points = registry.total_points();
        let best_target = highest_tier_from_points(total_points).clamp(2, self.config.max_tier);

        for target in (2..=best_target).rev() {
            if let Some(plan) = self.try_merge_for_tier(&bodies, target) {
                debug!(
                    merge_id = %plan.merge_id,
                    target_tier = plan.target_tier,
                    consumed = plan.consumed.len(),
                    key = plan.key,
                    "merge planned"
                );
                return Some(plan);
            }
        }
        None
    }

    /// Attempt a merge at one specific target tier.
    ///
    /// Never reports success unless the selected subset's summed points
    /// reach `2^(target-1)`; a failed attempt has no side effects.
    fn try_merge_for_tier(&self, bodies: &[&Body], target_tier: u32) -> Option<MergePlan> {
        let threshold = points_for_tier(target_tier);
        let radius = self.radius_for_tier(target_tier);

        // Only strictly lower tiers may contribute: tiers increase
        // through merges, never sideways or down.
        let eligible: Vec<&Body> = bodies
            .iter()
            .copied()
            .filter(|body| body.tier() < target_tier)
            .collect();
        if eligible.is_empty() {
            return None;
        }

        // Seed: the most "important" eligible body, importance being
        // points + weight, tie-broken toward the origin so merges happen
        // near the well.
        let seed = eligible.iter().copied().max_by(|a, b| {
            importance(a).cmp(&importance(b)).then_with(|| {
                // Closer to the origin wins the tie, so compare reversed.
                b.position
                    .length_squared()
                    .total_cmp(&a.position.length_squared())
            })
        })?;

        // Pool: eligible bodies within the tier radius of the seed,
        // each granted its own physical radius as a size allowance.
        let mut pool: Vec<(&Body, f32)> = eligible
            .iter()
            .copied()
            .filter_map(|body| {
                let dist_sq = (body.position - seed.position).length_squared();
                let reach = radius + body.radius(self.config.body_base_radius);
                (dist_sq <= reach * reach).then_some((body, dist_sq))
            })
            .collect();
        if pool.is_empty() {
            return None;
        }

        // Greedy minimal subset: consume nearest-first until the
        // threshold is reached.
        pool.sort_by(|a, b| a.1.total_cmp(&b.1));
        let mut sum = 0_u64;
        let mut consume: Vec<&Body> = Vec::new();
        for (body, _) in &pool {
            consume.push(body);
            sum = sum.saturating_add(body.points());
            if sum >= threshold {
                break;
            }
        }
        if sum < threshold {
            return None;
        }

        let mode = MergeMode::for_tier(target_tier);
        let source_names: Vec<String> = consume.iter().map(|b| b.display_name.clone()).collect();
        let source_emojis: Vec<String> = consume.iter().map(|b| b.emoji.clone()).collect();
        let key = combo_key(&source_names, mode);
        let centroid = centroid_of(&consume);

        Some(MergePlan {
            merge_id: MergeId::new(),
            consumed: consume.iter().map(|b| b.id).collect(),
            source_names,
            source_emojis,
            target_tier,
            mode,
            key,
            centroid,
        })
    }
}

/// Seed-selection score: points plus weight.
fn importance(body: &Body) -> u64 {
    body.points().saturating_add(u64::from(body.weight()))
}

/// Mean position of a non-empty body slice.
fn centroid_of(bodies: &[&Body]) -> Vec2 {
    let sum: Vec2 = bodies.iter().fold(Vec2::ZERO, |acc, b| acc + b.position);
    sum / count_f32(bodies.len().max(1))
}

/// Normalize a vector, substituting a random unit direction when the
/// input is degenerate (a body sitting exactly on the scan origin has no
/// defined outward vector).
pub fn direction_or_random(v: Vec2, rng: &mut impl Rng) -> Vec2 {
    if v.length_squared() > DEGENERATE_SQ {
        v.normalize()
    } else {
        let angle: f32 = rng.random_range(0.0..core::f32::consts::TAU);
        Vec2::new(angle.cos(), angle.sin())
    }
}

/// Unit direction perpendicular to the radial direction at `position`,
/// used to give spawned bodies a tangential impulse so they settle into
/// orbits instead of falling straight in. Degenerate positions fall back
/// to a random direction.
pub fn tangential_direction(position: Vec2, rng: &mut impl Rng) -> Vec2 {
    let radial = direction_or_random(position, rng);
    Vec2::new(-radial.y, radial.x)
}

/// Body count as f32 (populations stay far below f32's exact range).
#[allow(clippy::cast_precision_loss)]
const fn count_f32(count: usize) -> f32 {
    count as f32
}

/// Tier step count as f32.
#[allow(clippy::cast_precision_loss)]
const fn steps_f32(steps: u32) -> f32 {
    steps as f32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn scanner() -> MergeScanner {
        MergeScanner::new(ScannerConfig::default())
    }

    fn body_at(name: &str, tier: u32, x: f32, y: f32) -> Body {
        Body::new(name, "🐀", tier, 3, Vec2::new(x, y))
    }

    fn registry_of(bodies: Vec<Body>) -> BodyRegistry {
        let mut registry = BodyRegistry::new();
        for body in bodies {
            let _ = registry.spawn(body);
        }
        registry
    }

    #[test]
    fn empty_registry_plans_nothing() {
        assert!(scanner().plan(&BodyRegistry::new()).is_none());
    }

    #[test]
    fn two_adjacent_primitives_merge_to_tier_two() {
        let registry = registry_of(vec![
            body_at("Rat", 1, 0.0, 0.0),
            body_at("Ox", 1, 0.5, 0.0),
        ]);

        let plan = scanner().plan(&registry).unwrap();
        assert_eq!(plan.target_tier, 2);
        assert_eq!(plan.mode, MergeMode::Fusion);
        assert_eq!(plan.consumed.len(), 2);
        assert_eq!(plan.key, "Fusion:Ox+Rat");
        assert!((plan.centroid - Vec2::new(0.25, 0.0)).length() < 1e-6);
    }

    #[test]
    fn distant_primitives_do_not_merge() {
        // Base radius 1.2 plus the tier-1 size allowance is well short
        // of a 100-unit separation.
        let registry = registry_of(vec![
            body_at("Rat", 1, -50.0, 0.0),
            body_at("Ox", 1, 50.0, 0.0),
        ]);
        assert!(scanner().plan(&registry).is_none());
    }

    #[test]
    fn no_eligible_sources_means_no_plan() {
        // A single tier-5 body: total points 16 admit target 5, but no
        // body has tier < 5 ... < 2, so every attempt fails.
        let registry = registry_of(vec![body_at("Dragon", 5, 0.0, 0.0)]);
        assert!(scanner().plan(&registry).is_none());
    }

    #[test]
    fn subset_sum_never_short_of_threshold() {
        // Three primitives total 3 points: target 2 (threshold 2) is the
        // best achievable, never tier 3 (threshold 4).
        let registry = registry_of(vec![
            body_at("Rat", 1, 0.0, 0.0),
            body_at("Ox", 1, 0.3, 0.0),
            body_at("Tiger", 1, 0.0, 0.3),
        ]);

        let plan = scanner().plan(&registry).unwrap();
        assert_eq!(plan.target_tier, 2);
        let sum: u64 = plan
            .consumed
            .iter()
            .map(|id| registry.get(*id).unwrap().points())
            .sum();
        assert!(sum >= points_for_tier(plan.target_tier));
    }

    #[test]
    fn greedy_subset_is_minimal_by_distance() {
        // Two bodies already satisfy the tier-2 threshold; the third,
        // farther one must not be consumed.
        let registry = registry_of(vec![
            body_at("Rat", 1, 0.0, 0.0),
            body_at("Ox", 1, 0.2, 0.0),
            body_at("Tiger", 1, 1.0, 0.0),
        ]);

        let plan = scanner().plan(&registry).unwrap();
        assert_eq!(plan.target_tier, 2);
        assert_eq!(plan.consumed.len(), 2);
        assert!(!plan.source_names.contains(&"Tiger".to_owned()));
    }

    #[test]
    fn seed_prefers_higher_points_plus_weight() {
        // The tier-2 body is more important than the primitives, so it
        // anchors the search and is consumed first.
        let registry = registry_of(vec![
            body_at("Rat", 1, 1.0, 0.0),
            body_at("Ox", 2, 1.2, 0.0),
            body_at("Tiger", 1, 1.4, 0.0),
        ]);

        let plan = scanner().plan(&registry).unwrap();
        assert_eq!(plan.target_tier, 3);
        assert_eq!(plan.source_names.first().unwrap(), "Ox");
    }

    #[test]
    fn higher_targets_use_action_mode() {
        // Points: 2 + 1 + 1 = 4 => best target 3, an odd tier => Action.
        let registry = registry_of(vec![
            body_at("Ox", 2, 0.0, 0.0),
            body_at("Rat", 1, 0.4, 0.0),
            body_at("Tiger", 1, 0.0, 0.4),
        ]);

        let plan = scanner().plan(&registry).unwrap();
        assert_eq!(plan.target_tier, 3);
        assert_eq!(plan.mode, MergeMode::Action);
        assert!(plan.key.starts_with("Action:"));
    }

    #[test]
    fn radius_follows_r8_progression() {
        let s = scanner();
        assert!((s.radius_for_tier(2) - 1.2).abs() < 1e-6);
        // Eight R8 steps = one decade.
        assert!((s.radius_for_tier(10) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_direction_gets_random_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        let dir = direction_or_random(Vec2::ZERO, &mut rng);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn non_degenerate_direction_is_normalized_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let dir = direction_or_random(Vec2::new(3.0, 4.0), &mut rng);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn tangential_is_perpendicular_to_radial() {
        let mut rng = StdRng::seed_from_u64(7);
        let position = Vec2::new(2.0, 1.0);
        let tangent = tangential_direction(position, &mut rng);
        assert!(position.normalize().dot(tangent).abs() < 1e-5);
        assert!((tangent.length() - 1.0).abs() < 1e-5);
    }
}
