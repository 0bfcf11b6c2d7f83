//! Core car park abstractions and capacity accounting.

pub mod error;
pub mod events;
pub mod gate;
pub mod occupant;
pub mod pool;
pub mod slot_table;

pub use error::{AppResult, PoolError};
pub use events::{ConsoleSink, EventSink, InMemoryEventSink, PoolEvent, TracingSink};
pub use gate::{CapacityGate, CountingSignal};
pub use occupant::{Occupant, OccupantId, ParseOccupantIdError};
pub use pool::{BayView, Departure, ParkedCar, Placement, Pool, PoolSnapshot, PoolStats};
pub use slot_table::SlotTable;
