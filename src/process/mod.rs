//! Independent process roles that drive the car park.
//!
//! Each role runs on its own OS thread and shares only an `Arc<Pool>` and a
//! [`Shutdown`] signal with the others.

pub mod arrival;
pub mod departure;
pub mod monitor;

use std::fmt;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

pub use arrival::ArrivalProcess;
pub use departure::DepartureProcess;
pub use monitor::{MonitorCommand, MonitorExit, MonitorProcess};

use crate::core::PoolError;

/// Which role a thread plays in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Parks new cars.
    Arrival,
    /// Removes parked cars.
    Departure,
    /// Reads operator commands.
    Monitor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Arrival => "arrival",
            Self::Departure => "departure",
            Self::Monitor => "monitor",
        })
    }
}

/// Stop signal shared by the periodic roles.
///
/// Doubles as the tick timer: roles sleep on it between attempts, so a
/// shutdown wakes them immediately instead of after a full interval.
#[derive(Debug, Default)]
pub struct Shutdown {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl Shutdown {
    /// Create an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every role to stop after its current tick.
    pub fn trigger(&self) {
        {
            let mut stopped = self.stopped.lock();
            *stopped = true;
        }
        self.wake.notify_all();
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.stopped.lock()
    }

    /// Sleep for up to `timeout`. Returns `true` if shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut stopped = self.stopped.lock();
        if !*stopped {
            self.wake.wait_while_for(&mut stopped, |s| !*s, timeout);
        }
        *stopped
    }
}

/// Generator for a role: derived from the run seed when there is one.
pub(crate) fn role_rng(seed: Option<u64>, role: Role) -> StdRng {
    let offset = match role {
        Role::Arrival => 1,
        Role::Departure => 2,
        Role::Monitor => 3,
    };
    seed.map_or_else(StdRng::from_os_rng, |s| {
        StdRng::seed_from_u64(s.wrapping_add(offset))
    })
}

/// Reject probabilities `rand` cannot sample.
pub(crate) fn check_probability(role: Role, probability: f64) -> Result<f64, PoolError> {
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(PoolError::InvalidConfig(format!(
            "{role} probability must be within [0, 1], got {probability}"
        )))
    }
}
