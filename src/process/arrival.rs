//! Arrival (producer) role.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::core::{Occupant, Placement, Pool, PoolError};
use crate::process::{check_probability, role_rng, Role, Shutdown};
use crate::util::ids::random_occupant_id;

/// Periodically parks a freshly registered car with a fixed probability.
///
/// When the car park is full the role blocks inside [`Pool::enter`] until a
/// bay frees up; that wait is not interrupted by [`Shutdown`].
#[derive(Debug)]
pub struct ArrivalProcess {
    pool: Arc<Pool>,
    shutdown: Arc<Shutdown>,
    interval: Duration,
    probability: f64,
    rng: StdRng,
}

impl ArrivalProcess {
    /// Create an arrival role.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if `probability` is outside `[0, 1]`.
    pub fn new(
        pool: Arc<Pool>,
        shutdown: Arc<Shutdown>,
        interval: Duration,
        probability: f64,
        rng: StdRng,
    ) -> Result<Self, PoolError> {
        Ok(Self {
            pool,
            shutdown,
            interval,
            probability: check_probability(Role::Arrival, probability)?,
            rng,
        })
    }

    /// Create an arrival role using the cadence, probability and seed of `cfg`.
    ///
    /// # Errors
    ///
    /// Same as [`ArrivalProcess::new`].
    pub fn from_config(
        pool: Arc<Pool>,
        shutdown: Arc<Shutdown>,
        cfg: &SimulationConfig,
    ) -> Result<Self, PoolError> {
        Self::new(
            pool,
            shutdown,
            cfg.tick(),
            cfg.arrival_probability,
            role_rng(cfg.seed, Role::Arrival),
        )
    }

    /// Run one tick: with the configured probability, park one new car.
    ///
    /// Returns `None` when the tick was skipped.
    ///
    /// # Errors
    ///
    /// Propagates fatal pool errors.
    pub fn tick(&mut self) -> Result<Option<Placement>, PoolError> {
        if !self.rng.random_bool(self.probability) {
            return Ok(None);
        }
        let occupant = Occupant::new(random_occupant_id(&mut self.rng));
        tracing::trace!(occupant = %occupant.id(), "car arriving");
        self.pool.enter(occupant).map(Some)
    }

    /// Tick until shutdown is requested.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal pool error and returns it.
    pub fn run(mut self) -> Result<(), PoolError> {
        tracing::info!(role = %Role::Arrival, interval = ?self.interval, "role started");
        while !self.shutdown.is_triggered() {
            self.tick()?;
            if self.shutdown.wait_timeout(self.interval) {
                break;
            }
        }
        tracing::info!(role = %Role::Arrival, "role stopped");
        Ok(())
    }
}
