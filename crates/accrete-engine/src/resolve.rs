//! Asynchronous merge resolution.
//!
//! By the time a resolution task starts, the consumed bodies are already
//! gone from the registry -- removal happens synchronously at dispatch
//! (see `sim`), which is what prevents a body from being claimed by two
//! merges. The task then nudges the survivors outward, resolves the
//! result through the canon (miss -> generator -> write-through), and
//! spawns the merged body at the centroid with a tangential impulse.
//!
//! Once dispatched, a resolution always completes and always spawns a
//! result: the generator boundary is total (fallback on failure) and a
//! failed canon write only loses persistence, not the result.

use std::sync::Arc;

use accrete_canon::CanonStore;
use accrete_core::registry::BodyRegistry;
use accrete_core::scanner::{MergePlan, direction_or_random, tangential_direction};
use accrete_gen::Generator;
use accrete_types::Body;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Impulse pushing surviving bodies away from the merge point.
const NUDGE_IMPULSE: f32 = 0.5;

/// Tangential impulse given to the spawned result body.
const SETTLE_IMPULSE: f32 = 0.5;

/// Resolve one dispatched merge to completion.
pub async fn resolve_merge(
    plan: MergePlan,
    registry: Arc<Mutex<BodyRegistry>>,
    canon: Arc<Mutex<CanonStore>>,
    generator: Arc<Generator>,
) {
    // Push the survivors outward from the merge point. A survivor
    // sitting exactly on the centroid gets a random direction.
    {
        let mut live = registry.lock().await;
        let mut rng = rand::rng();
        for body in live.values_mut() {
            let away = direction_or_random(body.position - plan.centroid, &mut rng);
            body.apply_impulse(away * NUDGE_IMPULSE);
        }
    }

    // Canon lookup; on a miss, generate and write through.
    let cached = { canon.lock().await.get(&plan.key).cloned() };
    let result = match cached {
        Some(result) => {
            debug!(merge_id = %plan.merge_id, key = plan.key, "canon hit");
            result
        }
        None => {
            let result = generator
                .generate(
                    &plan.source_names,
                    &plan.source_emojis,
                    plan.target_tier,
                    plan.mode,
                )
                .await;
            let mut store = canon.lock().await;
            if let Err(error) = store.put(&plan.key, plan.target_tier, result.clone()) {
                warn!(%error, key = plan.key, "canon write-through failed");
            }
            result
        }
    };

    // Spawn the merged body at the centroid with an orbital nudge.
    let mut body = Body::new(
        &result.name,
        &result.emoji,
        plan.target_tier,
        result.weight,
        plan.centroid,
    );
    {
        let mut rng = rand::rng();
        let tangent = tangential_direction(plan.centroid, &mut rng);
        body.apply_impulse(tangent * SETTLE_IMPULSE);
    }

    let body_id = { registry.lock().await.spawn(body) };
    info!(
        merge_id = %plan.merge_id,
        %body_id,
        name = result.name,
        emoji = result.emoji,
        tier = plan.target_tier,
        "merge resolved"
    );
}
