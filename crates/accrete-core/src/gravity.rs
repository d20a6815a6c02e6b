//! The O(n²) n-body gravity simulator with a center-bias spring.
//!
//! Every fixed timestep, each body receives the sum of pairwise
//! attractions toward every other body plus a gentle linear spring toward
//! the origin, with the total acceleration clamped before integration:
//!
//! ```text
//! accel_i = Σ_{j≠i} G · m_attr(j) / (|p_j - p_i|² + ε²) · unit(p_j - p_i)
//!         + k_spring · (origin - p_i)
//! ```
//!
//! The softening length ε prevents singularities as bodies approach each
//! other; the spring keeps the simulation space bounded for gameplay.
//! Cost is O(n²) per step, which is acceptable because the population
//! stays in the tens -- an explicit scalability non-goal.

use accrete_types::BodyId;
use glam::Vec2;

use crate::config::GravityConfig;
use crate::registry::BodyRegistry;

/// Per-body snapshot used while accumulating forces.
#[derive(Debug, Clone, Copy)]
struct Attractor {
    /// Body ID, used to skip self-attraction.
    id: BodyId,

    /// Position at the start of the step.
    position: Vec2,

    /// Attractor mass (`max(0.5, weight) * points`).
    mass: f32,
}

/// Fixed-timestep gravity integrator over a [`BodyRegistry`].
#[derive(Debug, Clone)]
pub struct GravitySimulator {
    /// Tuning constants.
    config: GravityConfig,
}

impl GravitySimulator {
    /// Create a simulator with the given tuning.
    pub const fn new(config: GravityConfig) -> Self {
        Self { config }
    }

    /// Advance every body by one timestep of `dt` seconds.
    ///
    /// Accelerations are computed against a start-of-step snapshot, so
    /// the update is order-independent. Semi-implicit Euler: velocity
    /// first, then position. An empty registry is a no-op.
    pub fn step(&self, registry: &mut BodyRegistry, dt: f32) {
        let attractors: Vec<Attractor> = registry
            .values()
            .map(|body| Attractor {
                id: body.id,
                position: body.position,
                mass: body.attractor_mass(),
            })
            .collect();
        if attractors.is_empty() {
            return;
        }

        let softening_sq = self.config.softening * self.config.softening;

        for body in registry.values_mut() {
            let mut accel = Vec2::ZERO;

            // Pairwise attraction: a = G * m_other / (r² + ε²).
            for other in &attractors {
                if other.id == body.id {
                    continue;
                }
                let delta = other.position - body.position;
                let dist_sq = delta.length_squared() + softening_sq;
                let direction = delta / dist_sq.sqrt();
                accel += direction * (self.config.g * other.mass / dist_sq);
            }

            // Center-bias spring: guarantees an inward trend.
            accel += (Vec2::ZERO - body.position) * self.config.k_spring;

            // Clamp to avoid spikes when bodies pass close together.
            let max = self.config.max_accel;
            if accel.length_squared() > max * max {
                accel = accel.normalize_or_zero() * max;
            }

            body.velocity += accel * dt;
            body.position += body.velocity * dt;
        }
    }
}
