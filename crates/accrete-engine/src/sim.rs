//! The dual-interval simulation loop.
//!
//! Two independent periodic drivers share one logical thread:
//!
//! - the **physics tick** advances the gravity integrator at a fixed
//!   timestep, and
//! - the **scan tick** runs the merge scanner on a wall-clock interval,
//!   deliberately decoupled from the physics rate to bound search cost.
//!
//! When the scanner produces a plan, the consumed bodies are removed
//! synchronously *before* the resolution task is spawned -- the ordering
//! guarantee that makes a second merge unable to claim them. Resolution
//! itself (canon lookup, generator call, spawn) runs as a fire-and-forget
//! task and never stalls either driver.

use std::sync::Arc;
use std::time::{Duration, Instant};

use accrete_canon::CanonStore;
use accrete_core::config::SimulationConfig;
use accrete_core::gravity::GravitySimulator;
use accrete_core::registry::BodyRegistry;
use accrete_core::scanner::MergeScanner;
use accrete_gen::Generator;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::resolve;

/// Why the simulation loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// The configured wall-clock limit was reached.
    MaxRealTimeReached,
}

/// Final accounting for a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSummary {
    /// Why the loop ended.
    pub end_reason: EndReason,
    /// Physics ticks executed.
    pub total_ticks: u64,
    /// Merge resolutions dispatched.
    pub merges_dispatched: u64,
}

/// Shared state handed to the loop and its resolution tasks.
pub struct SimHandles {
    /// The live-body registry.
    pub registry: Arc<Mutex<BodyRegistry>>,
    /// The canon store.
    pub canon: Arc<Mutex<CanonStore>>,
    /// The generation backend.
    pub generator: Arc<Generator>,
}

/// Run the simulation until a configured bound is hit.
///
/// With both bounds zero the loop runs forever (the normal interactive
/// mode); bounded runs are used for tests and scripted sessions.
pub async fn run_simulation(
    handles: &SimHandles,
    config: &SimulationConfig,
) -> SimulationSummary {
    let gravity = GravitySimulator::new(config.gravity.clone());
    let scanner = MergeScanner::new(config.scanner.clone());

    let dt = seconds(config.world.timestep_ms);
    let mut physics = tokio::time::interval(Duration::from_millis(config.world.timestep_ms));
    physics.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut scan = tokio::time::interval(Duration::from_millis(config.scanner.scan_interval_ms));
    scan.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let max_ticks = config.simulation.max_ticks;
    let max_real_time = Duration::from_secs(config.simulation.max_real_time_seconds);
    let started = Instant::now();

    let mut total_ticks: u64 = 0;
    let mut merges_dispatched: u64 = 0;

    info!(
        timestep_ms = config.world.timestep_ms,
        scan_interval_ms = config.scanner.scan_interval_ms,
        max_ticks,
        max_real_time_seconds = config.simulation.max_real_time_seconds,
        "simulation loop starting"
    );

    loop {
        tokio::select! {
            _ = physics.tick() => {
                {
                    let mut live = handles.registry.lock().await;
                    gravity.step(&mut live, dt);
                }
                total_ticks = total_ticks.saturating_add(1);

                if max_ticks > 0 && total_ticks >= max_ticks {
                    info!(total_ticks, "tick limit reached");
                    return SimulationSummary {
                        end_reason: EndReason::MaxTicksReached,
                        total_ticks,
                        merges_dispatched,
                    };
                }
                if !max_real_time.is_zero() && started.elapsed() >= max_real_time {
                    info!(elapsed_s = started.elapsed().as_secs(), "real-time limit reached");
                    return SimulationSummary {
                        end_reason: EndReason::MaxRealTimeReached,
                        total_ticks,
                        merges_dispatched,
                    };
                }
            }
            _ = scan.tick() => {
                // Plan and consume under one lock: removal must commit
                // before the resolution task exists.
                let dispatched = {
                    let mut live = handles.registry.lock().await;
                    scanner.plan(&live).and_then(|plan| {
                        live.take_all(&plan.consumed).map(|consumed| (plan, consumed.len()))
                    })
                };
                if let Some((plan, consumed_count)) = dispatched {
                    merges_dispatched = merges_dispatched.saturating_add(1);
                    info!(
                        merge_id = %plan.merge_id,
                        target_tier = plan.target_tier,
                        mode = %plan.mode,
                        consumed = consumed_count,
                        key = plan.key,
                        "merge dispatched"
                    );
                    let registry = Arc::clone(&handles.registry);
                    let canon = Arc::clone(&handles.canon);
                    let generator = Arc::clone(&handles.generator);
                    drop(tokio::spawn(resolve::resolve_merge(
                        plan, registry, canon, generator,
                    )));
                }
            }
        }
    }
}

/// Milliseconds to seconds as f32 (timesteps are tens of milliseconds).
#[allow(clippy::cast_precision_loss)]
const fn seconds(ms: u64) -> f32 {
    ms as f32 / 1000.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use accrete_gen::StubGenerator;
    use accrete_types::Body;
    use glam::Vec2;

    use super::*;

    fn temp_canon() -> CanonStore {
        CanonStore::load(
            std::env::temp_dir().join(format!("accrete-sim-{}.json", uuid::Uuid::now_v7())),
        )
    }

    fn handles_with(bodies: Vec<Body>) -> SimHandles {
        let mut registry = BodyRegistry::new();
        for body in bodies {
            let _ = registry.spawn(body);
        }
        SimHandles {
            registry: Arc::new(Mutex::new(registry)),
            canon: Arc::new(Mutex::new(temp_canon())),
            generator: Arc::new(Generator::Stub(StubGenerator::new())),
        }
    }

    fn fast_config(max_ticks: u64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.timestep_ms = 2;
        config.scanner.scan_interval_ms = 5;
        config.simulation.max_ticks = max_ticks;
        config
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let handles = handles_with(vec![]);
        let summary = run_simulation(&handles, &fast_config(10)).await;

        assert_eq!(summary.end_reason, EndReason::MaxTicksReached);
        assert_eq!(summary.total_ticks, 10);
        assert_eq!(summary.merges_dispatched, 0);

        let _ = std::fs::remove_file(handles.canon.lock().await.path());
    }

    #[tokio::test]
    async fn adjacent_seeds_merge_during_the_run() {
        let handles = handles_with(vec![
            Body::new("Rat", "🐀", 1, 3, Vec2::new(0.0, 0.0)),
            Body::new("Ox", "🐂", 1, 3, Vec2::new(0.3, 0.0)),
        ]);

        let summary = run_simulation(&handles, &fast_config(50)).await;
        assert!(summary.merges_dispatched >= 1);

        // Let the fire-and-forget resolution finish.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let live = handles.registry.lock().await;
        assert_eq!(live.len(), 1);
        let merged = live.values().next().unwrap();
        assert_eq!(merged.tier(), 2);
        assert_eq!(merged.display_name, "Rat & Ox");

        assert_eq!(handles.canon.lock().await.len(), 1);
        let _ = std::fs::remove_file(handles.canon.lock().await.path());
    }

    #[tokio::test]
    async fn bounded_by_real_time() {
        let mut config = fast_config(0);
        config.simulation.max_real_time_seconds = 1;
        let handles = handles_with(vec![]);

        let summary = run_simulation(&handles, &config).await;
        assert_eq!(summary.end_reason, EndReason::MaxRealTimeReached);
        assert!(summary.total_ticks > 0);

        let _ = std::fs::remove_file(handles.canon.lock().await.path());
    }
}
