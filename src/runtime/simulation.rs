//! Wires a pool and its three roles onto OS threads.
//!
//! # Design Principles
//!
//! - **One outcome per role**: every role thread reports exactly once on a
//!   channel, even if it panics, so the driver never polls.
//! - **Monitor decides**: the run ends when the monitor quits or any role fails.
//! - **Bounded teardown**: roles still blocked on the gate after the join
//!   timeout are detached and die with the process.

use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::builders::PoolBuilder;
use crate::config::SimulationConfig;
use crate::core::{EventSink, Pool, PoolError, PoolStats};
use crate::process::{
    ArrivalProcess, DepartureProcess, MonitorExit, MonitorProcess, Role, Shutdown,
};

/// Block until one line (the operator pressing return) arrives on `input`.
///
/// End of input also releases the barrier.
///
/// # Errors
///
/// Returns [`PoolError::Io`] if reading fails.
pub fn wait_for_start<R: BufRead>(input: &mut R) -> Result<(), PoolError> {
    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;
    Ok(())
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// Why the monitor stopped.
    pub monitor_exit: MonitorExit,
    /// Pool counters at teardown.
    pub stats: PoolStats,
    /// Roles that did not stop within the join timeout.
    pub detached: Vec<Role>,
}

/// What a role thread reported when it stopped.
enum Outcome {
    Stopped(Role),
    Monitor(MonitorExit),
    Failed(Role, PoolError),
}

/// A configured car park run.
pub struct Simulation {
    config: SimulationConfig,
    pool: Arc<Pool>,
    shutdown: Arc<Shutdown>,
    run_id: Uuid,
}

impl Simulation {
    /// Validate `config` and build the pool, reporting events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration is invalid.
    pub fn new(
        config: SimulationConfig,
        sink: Option<Arc<dyn EventSink>>,
    ) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;
        let builder = PoolBuilder::from_config(&config);
        let builder = match sink {
            Some(sink) => builder.sink(sink),
            None => builder,
        };
        Ok(Self {
            pool: Arc::new(builder.build()?),
            shutdown: Arc::new(Shutdown::new()),
            run_id: Uuid::new_v4(),
            config,
        })
    }

    /// The shared pool, e.g. for inspecting it from tests.
    #[must_use]
    pub const fn pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    /// Identifier of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Spawn the arrival, departure and monitor threads and wait until the
    /// monitor quits or a role fails.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error reported by any role, or
    /// [`PoolError::Io`] if a thread cannot be spawned.
    pub fn run<R, W>(self, input: R, out: W) -> Result<SimulationReport, PoolError>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let span = tracing::info_span!(
            "simulation",
            run_id = %self.run_id,
            capacity = self.config.capacity
        );
        let _entered = span.enter();

        let arrivals =
            ArrivalProcess::from_config(Arc::clone(&self.pool), Arc::clone(&self.shutdown), &self.config)?;
        let departures =
            DepartureProcess::from_config(Arc::clone(&self.pool), Arc::clone(&self.shutdown), &self.config)?;
        let monitor = MonitorProcess::new(Arc::clone(&self.pool), input, out);

        let (tx, rx) = unbounded::<Outcome>();
        let handles = vec![
            spawn_role(Role::Arrival, tx.clone(), move || {
                arrivals.run().map(|()| Outcome::Stopped(Role::Arrival))
            })?,
            spawn_role(Role::Departure, tx.clone(), move || {
                departures.run().map(|()| Outcome::Stopped(Role::Departure))
            })?,
            spawn_role(Role::Monitor, tx, move || monitor.run().map(Outcome::Monitor))?,
        ];
        info!("simulation started");

        let mut pending = vec![Role::Arrival, Role::Departure, Role::Monitor];
        let monitor_exit = loop {
            match rx.recv() {
                Ok(Outcome::Monitor(exit)) => {
                    pending.retain(|r| *r != Role::Monitor);
                    break exit;
                }
                Ok(Outcome::Stopped(role)) => pending.retain(|r| *r != role),
                Ok(Outcome::Failed(role, e)) => {
                    error!(%role, error = %e, "role failed, stopping simulation");
                    self.shutdown.trigger();
                    return Err(e);
                }
                Err(_) => {
                    return Err(PoolError::Internal(
                        "every role exited without reporting".into(),
                    ))
                }
            }
        };

        self.shutdown.trigger();
        let deadline = Instant::now() + self.config.join_timeout();
        while !pending.is_empty() {
            if self.blocked_at_gate(&pending) {
                debug!(?pending, "remaining roles are blocked at the gate");
                break;
            }
            match rx.recv_deadline((Instant::now() + JOIN_POLL).min(deadline)) {
                Ok(Outcome::Stopped(role)) => {
                    debug!(%role, "role joined");
                    pending.retain(|r| *r != role);
                }
                Ok(Outcome::Failed(role, e)) => {
                    error!(%role, error = %e, "role failed during shutdown");
                    return Err(e);
                }
                Ok(Outcome::Monitor(_)) => pending.retain(|r| *r != Role::Monitor),
                Err(RecvTimeoutError::Timeout) if Instant::now() < deadline => {}
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }

        for handle in handles {
            let finished = handle
                .thread()
                .name()
                .and_then(role_from_thread_name)
                .is_some_and(|role| !pending.contains(&role));
            if finished {
                let _ = handle.join();
            }
        }
        for role in &pending {
            warn!(%role, "role still blocked at shutdown - detaching");
        }

        let stats = self.pool.stats();
        info!(
            occupied = stats.occupied,
            entered = stats.total_entered,
            departed = stats.total_departed,
            "simulation finished"
        );
        Ok(SimulationReport {
            run_id: self.run_id,
            monitor_exit,
            stats,
            detached: pending,
        })
    }
}

impl Simulation {
    /// Whether every pending role is parked on the gate. After shutdown the
    /// roles that could wake them have stopped, so waiting longer is futile.
    fn blocked_at_gate(&self, pending: &[Role]) -> bool {
        pending.iter().all(|role| match role {
            Role::Arrival => self.pool.waiting_arrivals() > 0,
            Role::Departure => self.pool.waiting_departures() > 0,
            Role::Monitor => false,
        })
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("run_id", &self.run_id)
            .field("config", &self.config)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

const THREAD_PREFIX: &str = "car-park-";

/// How often the shutdown join re-checks for roles stuck at the gate.
const JOIN_POLL: Duration = Duration::from_millis(10);

fn role_from_thread_name(name: &str) -> Option<Role> {
    match name.strip_prefix(THREAD_PREFIX)? {
        "arrival" => Some(Role::Arrival),
        "departure" => Some(Role::Departure),
        "monitor" => Some(Role::Monitor),
        _ => None,
    }
}

/// Spawn a named role thread that reports exactly one outcome.
fn spawn_role<F>(role: Role, tx: Sender<Outcome>, body: F) -> Result<JoinHandle<()>, PoolError>
where
    F: FnOnce() -> Result<Outcome, PoolError> + Send + 'static,
{
    let span = tracing::Span::current();
    let handle = thread::Builder::new()
        .name(format!("{THREAD_PREFIX}{role}"))
        .spawn(move || {
            let _entered = span.enter();
            let outcome = match panic::catch_unwind(AssertUnwindSafe(body)) {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => Outcome::Failed(role, e),
                Err(_) => Outcome::Failed(role, PoolError::Internal(format!("{role} thread panicked"))),
            };
            // The driver may already have returned; nobody left to tell.
            let _ = tx.send(outcome);
        })?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_thread_names_round_trip() {
        for role in [Role::Arrival, Role::Departure, Role::Monitor] {
            let name = format!("{THREAD_PREFIX}{role}");
            assert_eq!(role_from_thread_name(&name), Some(role));
        }
        assert_eq!(role_from_thread_name("main"), None);
    }

    #[test]
    fn test_start_barrier_consumes_one_line() {
        let mut input = Cursor::new("\np\n");
        wait_for_start(&mut input).unwrap();
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "p\n");
    }

    #[test]
    fn test_start_barrier_accepts_any_bytes() {
        let mut input = Cursor::new(vec![0xfe, 0xff, b'\n', b'q', b'\n']);
        wait_for_start(&mut input).unwrap();
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "q\n");
    }

    #[test]
    fn test_desynchronized_pool_aborts_run() {
        let config = SimulationConfig {
            capacity: 1,
            tick_ms: 1,
            arrival_probability: 1.0,
            departure_probability: 0.0,
            seed: Some(5),
            join_timeout_ms: 200,
        };
        let simulation = Simulation::new(config, None).unwrap();
        // One vacancy permit more than there are bays.
        simulation.pool().gate().release_exit();
        let pool = Arc::clone(simulation.pool());

        // Keep the monitor waiting on open input so only the fault ends the run.
        let (reader, writer) = std::io::pipe().unwrap();
        let started = Instant::now();
        let err = simulation
            .run(std::io::BufReader::new(reader), std::io::sink())
            .unwrap_err();

        assert!(matches!(err, PoolError::InvariantViolation(_)), "{err}");
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(pool.stats().total_entered, 1);
        drop(writer);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = SimulationConfig {
            capacity: 0,
            ..SimulationConfig::default()
        };
        let err = Simulation::new(cfg, None).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }
}
