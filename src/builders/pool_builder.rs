//! Builder to construct a [`Pool`] from configuration.

use std::fmt;
use std::sync::Arc;

use crate::config::SimulationConfig;
use crate::core::{EventSink, Pool, PoolError, SlotTable};

/// Assembles a [`Pool`] with its bay count, seed and event sink.
#[derive(Default)]
pub struct PoolBuilder {
    capacity: Option<usize>,
    seed: Option<u64>,
    sink: Option<Arc<dyn EventSink>>,
}

impl PoolBuilder {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the pool-related fields of a simulation configuration.
    #[must_use]
    pub fn from_config(cfg: &SimulationConfig) -> Self {
        Self {
            capacity: Some(cfg.capacity),
            seed: cfg.seed,
            sink: None,
        }
    }

    /// Set the number of bays.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Make bay selection reproducible.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Report pool events to `sink`.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if no capacity was set or it is zero.
    pub fn build(self) -> Result<Pool, PoolError> {
        let capacity = match self.capacity {
            Some(0) => return Err(PoolError::InvalidConfig("capacity must be greater than 0".into())),
            Some(n) => n,
            None => return Err(PoolError::InvalidConfig("capacity not set".into())),
        };
        let table = self.seed.map_or_else(
            || SlotTable::new(capacity),
            |seed| SlotTable::with_seed(capacity, seed),
        );
        let pool = Pool::from_table(table);
        tracing::debug!(capacity, seeded = self.seed.is_some(), "pool built");
        Ok(match self.sink {
            Some(sink) => pool.with_sink(sink),
            None => pool,
        })
    }
}

impl fmt::Debug for PoolBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolBuilder")
            .field("capacity", &self.capacity)
            .field("seed", &self.seed)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
