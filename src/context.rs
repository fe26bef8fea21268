use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::metrics::Metrics;
use crate::shared::{Result, SimError};

/**
 * Per-simulation context.
 *
 * Built once when the building is constructed and cloned into every floor,
 * elevator and arrival generator. Holds the floor count, the metrics handle
 * and the person id sequence; dropping the last clone tears it down.
 */
#[derive(Debug, Clone)]
pub struct SimContext {
    n_floors: usize,
    metrics: Arc<Metrics>,
    person_ids: Arc<AtomicU64>,
}

impl SimContext {
    pub fn new(n_floors: usize) -> Result<SimContext> {
        if n_floors == 0 {
            return Err(SimError::InvalidFloorCount(n_floors));
        }

        Ok(SimContext {
            n_floors,
            metrics: Arc::new(Metrics::new()),
            person_ids: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn n_floors(&self) -> usize {
        self.n_floors
    }

    pub fn top_floor(&self) -> usize {
        self.n_floors - 1
    }

    pub fn contains_floor(&self, floor: usize) -> bool {
        floor < self.n_floors
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn next_person_id(&self) -> u64 {
        self.person_ids.fetch_add(1, Ordering::Relaxed)
    }
}
