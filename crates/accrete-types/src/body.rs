//! The body entity and its tier, points, and mass math.
//!
//! A body is a live creature in the simulation: it has a discrete power
//! tier, a points value that is always exactly `2^(tier-1)`, and a weight
//! in `[1, 7]` that scales its mass. Two distinct mass formulas exist and
//! are deliberately different:
//!
//! - inertial mass `max(0.1, weight * points)` resists impulses,
//! - attractor mass `max(0.5, weight) * points` drives gravitational pull.
//!
//! The tier/points invariant is maintained by construction: tier is only
//! mutable through [`Body::set_tier`], which recomputes points.

use glam::Vec2;

use crate::ids::BodyId;

/// Minimum allowed body weight.
pub const MIN_WEIGHT: u8 = 1;

/// Maximum allowed body weight.
pub const MAX_WEIGHT: u8 = 7;

/// Placeholder glyph used when no emoji is available.
pub const PLACEHOLDER_EMOJI: &str = "??";

/// Points contributed by a body of the given tier: `2^(tier-1)`.
///
/// Tier 0 is treated as tier 1 (one point). Saturates at `u64::MAX` for
/// tiers beyond the representable range, which is far above anything the
/// scanner's tier cap allows.
pub fn points_for_tier(tier: u32) -> u64 {
    let shift = tier.saturating_sub(1);
    1_u64.checked_shl(shift).unwrap_or(u64::MAX)
}

/// Largest tier `T` such that `2^(T-1) <= sum_points`.
///
/// Returns 1 for zero total points: a single primitive body is always the
/// floor of the progression.
pub fn highest_tier_from_points(sum_points: u64) -> u32 {
    let mut tier = 1_u32;
    let mut points = 1_u64;
    while let Some(next) = points.checked_mul(2) {
        if next > sum_points {
            break;
        }
        points = next;
        tier = tier.saturating_add(1);
    }
    tier
}

/// Derive a stable canon slug from a display name: lowercased, with
/// everything that is not alphanumeric dropped.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// A live body in the simulation.
///
/// Created on spawn (seed or merge result), destroyed on consumption by a
/// merge. Position and velocity are owned by the gravity integrator; the
/// remaining attributes are set at spawn and only change through
/// [`Body::set_tier`] / [`Body::set_weight`].
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Unique identifier.
    pub id: BodyId,

    /// Stable canon slug derived from the display name.
    pub slug: String,

    /// Display name (seed name or generated merge name).
    pub display_name: String,

    /// Emoji glyph, 1-4 codepoints; defaults to [`PLACEHOLDER_EMOJI`].
    pub emoji: String,

    /// Power tier, always >= 1.
    tier: u32,

    /// Points, always exactly `2^(tier-1)`.
    points: u64,

    /// Weight in `[1, 7]`, scales both mass formulas.
    weight: u8,

    /// Current position in the 2D simulation plane.
    pub position: Vec2,

    /// Current velocity, integrated by the gravity simulator.
    pub velocity: Vec2,
}

impl Body {
    /// Create a new body at rest.
    ///
    /// The slug is derived from the display name, the emoji falls back to
    /// [`PLACEHOLDER_EMOJI`] when empty, the weight is clamped to
    /// `[1, 7]`, and points are derived from the tier.
    pub fn new(display_name: &str, emoji: &str, tier: u32, weight: u8, position: Vec2) -> Self {
        let tier = tier.max(1);
        let emoji = if emoji.is_empty() {
            PLACEHOLDER_EMOJI.to_owned()
        } else {
            emoji.to_owned()
        };
        Self {
            id: BodyId::new(),
            slug: slugify(display_name),
            display_name: display_name.to_owned(),
            emoji,
            tier,
            points: points_for_tier(tier),
            weight: weight.clamp(MIN_WEIGHT, MAX_WEIGHT),
            position,
            velocity: Vec2::ZERO,
        }
    }

    /// Return the current tier.
    pub const fn tier(&self) -> u32 {
        self.tier
    }

    /// Return the current points (`2^(tier-1)`).
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Return the current weight.
    pub const fn weight(&self) -> u8 {
        self.weight
    }

    /// Set the tier (floored at 1) and recompute points to match.
    pub fn set_tier(&mut self, tier: u32) {
        self.tier = tier.max(1);
        self.points = points_for_tier(self.tier);
    }

    /// Set the weight, clamped to `[1, 7]`.
    pub fn set_weight(&mut self, weight: u8) {
        self.weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
    }

    /// Inertial mass: `max(0.1, weight * points)`.
    pub fn mass(&self) -> f32 {
        (f32::from(self.weight) * points_f32(self.points)).max(0.1)
    }

    /// Attractor mass used for gravitational pull:
    /// `max(0.5, weight) * points`.
    ///
    /// Note the different floor from [`Body::mass`]: the weight itself is
    /// floored, then scaled by points.
    pub fn attractor_mass(&self) -> f32 {
        f32::from(self.weight).max(0.5) * points_f32(self.points)
    }

    /// Physical radius for the given base radius, following the R8
    /// preferred-number progression: `base * 10^((tier-1)/8)`.
    pub fn radius(&self, base_radius: f32) -> f32 {
        let steps = self.tier.saturating_sub(1);
        base_radius * 10_f32.powf(steps_f32(steps) / 8.0)
    }

    /// Apply an instantaneous impulse: velocity changes by
    /// `impulse / mass`.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse / self.mass();
    }
}

/// Points as f32. Tiers stay far below f32's exact-integer range, so the
/// precision loss clippy warns about cannot occur in practice.
#[allow(clippy::cast_precision_loss)]
const fn points_f32(points: u64) -> f32 {
    points as f32
}

/// Tier step count as f32 (always tiny).
#[allow(clippy::cast_precision_loss)]
const fn steps_f32(value: u32) -> f32 {
    value as f32
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn points_double_per_tier() {
        assert_eq!(points_for_tier(1), 1);
        assert_eq!(points_for_tier(2), 2);
        assert_eq!(points_for_tier(3), 4);
        assert_eq!(points_for_tier(8), 128);
        // Tier 0 is treated as tier 1.
        assert_eq!(points_for_tier(0), 1);
    }

    #[test]
    fn highest_tier_scenario_from_nine_points() {
        // 2^3 = 8 <= 9 < 16 = 2^4, so the highest reachable tier is 4.
        assert_eq!(highest_tier_from_points(9), 4);
    }

    #[test]
    fn highest_tier_edges() {
        assert_eq!(highest_tier_from_points(0), 1);
        assert_eq!(highest_tier_from_points(1), 1);
        assert_eq!(highest_tier_from_points(2), 2);
        assert_eq!(highest_tier_from_points(7), 3);
        assert_eq!(highest_tier_from_points(8), 4);
        assert_eq!(highest_tier_from_points(128), 8);
    }

    #[test]
    fn set_tier_recomputes_points() {
        let mut body = Body::new("Rat", "🐀", 1, 3, Vec2::ZERO);
        assert_eq!(body.points(), 1);

        body.set_tier(5);
        assert_eq!(body.tier(), 5);
        assert_eq!(body.points(), 16);

        // Floor at tier 1.
        body.set_tier(0);
        assert_eq!(body.tier(), 1);
        assert_eq!(body.points(), 1);
    }

    #[test]
    fn weight_clamped_on_all_paths() {
        let body = Body::new("Ox", "🐂", 1, 99, Vec2::ZERO);
        assert_eq!(body.weight(), MAX_WEIGHT);

        let mut body = Body::new("Ox", "🐂", 1, 0, Vec2::ZERO);
        assert_eq!(body.weight(), MIN_WEIGHT);

        body.set_weight(200);
        assert_eq!(body.weight(), MAX_WEIGHT);
        body.set_weight(4);
        assert_eq!(body.weight(), 4);
    }

    #[test]
    fn mass_formulas_are_distinct() {
        let body = Body::new("Tiger", "🐯", 3, 2, Vec2::ZERO);
        // tier 3 => points 4; inertial = 2 * 4 = 8; attractor = 2 * 4 = 8.
        assert_eq!(body.mass(), 8.0);
        assert_eq!(body.attractor_mass(), 8.0);

        // Weight floors differ: weight 1, tier 1 => inertial max(0.1, 1),
        // attractor max(0.5, 1) * 1.
        let light = Body::new("Rabbit", "🐇", 1, 1, Vec2::ZERO);
        assert_eq!(light.mass(), 1.0);
        assert_eq!(light.attractor_mass(), 1.0);
    }

    #[test]
    fn empty_emoji_falls_back_to_placeholder() {
        let body = Body::new("Dragon", "", 1, 3, Vec2::ZERO);
        assert_eq!(body.emoji, PLACEHOLDER_EMOJI);
    }

    #[test]
    fn slug_is_lowercase_alphanumeric() {
        assert_eq!(slugify("Fire Dragon"), "firedragon");
        assert_eq!(slugify("Ox-King 3!"), "oxking3");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn radius_follows_r8_progression() {
        let t1 = Body::new("Rat", "🐀", 1, 3, Vec2::ZERO);
        let t2 = Body::new("Rat", "🐀", 2, 3, Vec2::ZERO);
        assert_eq!(t1.radius(0.4), 0.4);
        // One R8 step: factor 10^(1/8).
        let expected = 0.4 * 10_f32.powf(1.0 / 8.0);
        assert!((t2.radius(0.4) - expected).abs() < 1e-6);
    }

    #[test]
    fn impulse_scaled_by_inertial_mass() {
        let mut body = Body::new("Horse", "🐎", 2, 2, Vec2::ZERO);
        // mass = 2 * 2 = 4
        body.apply_impulse(Vec2::new(8.0, 0.0));
        assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
    }
}
