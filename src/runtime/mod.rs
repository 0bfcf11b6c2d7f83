//! Runtime adapters: the threaded simulation driver and the async bridge.

pub mod simulation;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_bridge;

pub use simulation::{wait_for_start, Simulation, SimulationReport};
#[cfg(feature = "tokio-runtime")]
pub use tokio_bridge::{enter_async, exit_async};
