//! Seed spawner: populates the registry at startup.
//!
//! Picks `start_count` distinct entries from the configured seed pools,
//! places each on a circle of `spawn_radius` around the origin, and
//! gives each a small random impulse so the opening state is not
//! perfectly symmetric.

use accrete_core::config::SpawnConfig;
use accrete_core::registry::BodyRegistry;
use accrete_types::{Body, BodyId};
use glam::Vec2;
use rand::Rng;
use tracing::info;

use crate::error::EngineError;

/// Spawn the configured seed bodies into the registry.
///
/// The pool size is the shorter of the two configured lists; the start
/// count is clamped to the pool so a short pool degrades gracefully
/// instead of failing.
///
/// # Errors
///
/// Returns [`EngineError::Spawn`] if the seed pools are empty.
pub fn spawn_seed_bodies(
    config: &SpawnConfig,
    registry: &mut BodyRegistry,
    rng: &mut impl Rng,
) -> Result<Vec<BodyId>, EngineError> {
    let pool = config.seed_names.len().min(config.seed_emojis.len());
    if pool == 0 {
        return Err(EngineError::Spawn {
            reason: "seed pools are empty".to_owned(),
        });
    }
    let count = config.start_count.min(pool);

    let picks = rand::seq::index::sample(rng, pool, count);
    let mut spawned = Vec::with_capacity(count);
    for index in picks {
        let Some(name) = config.seed_names.get(index) else {
            continue;
        };
        let emoji = config.seed_emojis.get(index).map_or("", String::as_str);

        let angle: f32 = rng.random_range(0.0..core::f32::consts::TAU);
        let position = Vec2::new(angle.cos(), angle.sin()) * config.spawn_radius;

        let mut body = Body::new(name, emoji, 1, config.seed_weight, position);
        let kick_angle: f32 = rng.random_range(0.0..core::f32::consts::TAU);
        body.apply_impulse(Vec2::new(kick_angle.cos(), kick_angle.sin()) * config.impulse);

        info!(name = body.display_name, emoji = body.emoji, x = position.x, y = position.y, "seed spawned");
        spawned.push(registry.spawn(body));
    }

    Ok(spawned)
}
