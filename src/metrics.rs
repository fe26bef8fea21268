/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/**
 * Simulation-wide counters.
 *
 * Created once per simulation and shared through the `SimContext`. Elevators
 * count delivered people and passed floors, the arrival generators count
 * generated people.
 */
#[derive(Debug, Default)]
pub struct Metrics {
    delivered: AtomicU64,
    generated: AtomicU64,
    floors_passed: AtomicU64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub delivered: u64,
    pub generated: u64,
    pub floors_passed: u64,
}

impl Metrics {
    pub fn new() -> Metrics {
        Metrics::default()
    }

    pub fn increment_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_generated(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_floors_passed(&self) {
        self.floors_passed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    pub fn floors_passed(&self) -> u64 {
        self.floors_passed.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.generated.store(0, Ordering::Relaxed);
        self.floors_passed.store(0, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered: self.delivered(),
            generated: self.generated(),
            floors_passed: self.floors_passed(),
        }
    }
}
