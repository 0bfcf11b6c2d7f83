//! Departure (consumer) role.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::core::{Departure, Pool, PoolError};
use crate::process::{check_probability, role_rng, Role, Shutdown};

/// Periodically removes a random parked car with a fixed probability.
///
/// Blocks inside [`Pool::exit`] while the car park is empty.
#[derive(Debug)]
pub struct DepartureProcess {
    pool: Arc<Pool>,
    shutdown: Arc<Shutdown>,
    interval: Duration,
    probability: f64,
    rng: StdRng,
}

impl DepartureProcess {
    /// Create a departure role.
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
            probability: check_probability(Role::Departure, probability)?,
            rng,
        })
    }

    /// Create a departure role using the cadence, probability and seed of `cfg`.
    ///
    /// # Errors
    ///
    /// Same as [`DepartureProcess::new`].
    pub fn from_config(
        pool: Arc<Pool>,
        shutdown: Arc<Shutdown>,
        cfg: &SimulationConfig,
    ) -> Result<Self, PoolError> {
        Self::new(
            pool,
            shutdown,
            cfg.tick(),
            cfg.departure_probability,
            role_rng(cfg.seed, Role::Departure),
        )
    }

    /// Run one tick: with the configured probability, remove one car.
    ///
    /// # Errors
    ///
    /// Propagates fatal pool errors.
    pub fn tick(&mut self) -> Result<Option<Departure>, PoolError> {
        if !self.rng.random_bool(self.probability) {
            return Ok(None);
        }
        self.pool.exit().map(Some)
    }

    /// Tick until shutdown is requested.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal pool error and returns it.
    pub fn run(mut self) -> Result<(), PoolError> {
        tracing::info!(role = %Role::Departure, interval = ?self.interval, "role started");
        while !self.shutdown.is_triggered() {
            self.tick()?;
            if self.shutdown.wait_timeout(self.interval) {
                break;
            }
        }
        tracing::info!(role = %Role::Departure, "role stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Occupant;
    use rand::SeedableRng;

    #[test]
    fn test_certain_departure_removes_car() {
        let pool = Arc::new(Pool::with_seed(2, 8));
        pool.enter(Occupant::new("DEF456".parse().unwrap())).unwrap();

        let mut departures = DepartureProcess::new(
            Arc::clone(&pool),
            Arc::new(Shutdown::new()),
            Duration::from_millis(1),
            1.0,
            StdRng::seed_from_u64(4),
        )
        .unwrap();
        let departure = departures.tick().unwrap().unwrap();
        assert_eq!(departure.occupant_id.as_str(), "DEF456");
        assert!(departure.became_empty);
    }

    #[test]
    fn test_skipped_tick_does_not_block_on_empty_pool() {
        let pool = Arc::new(Pool::with_seed(2, 8));
        let mut departures = DepartureProcess::new(
            pool,
            Arc::new(Shutdown::new()),
            Duration::from_millis(1),
            0.0,
            StdRng::seed_from_u64(4),
        )
        .unwrap();
        assert!(departures.tick().unwrap().is_none());
    }
}
