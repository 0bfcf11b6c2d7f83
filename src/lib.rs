//! # Car Park
//!
//! A concurrent simulator of a car park with a fixed number of bays, one
//! entry and one exit.
//!
//! Cars arrive and leave on independent OS threads while an operator can ask
//! for the state of every bay at any time. The interesting part is the
//! coordination: the bay table behaves like a bounded buffer, so arrivals
//! block while the park is full and departures block while it is empty.
//!
//! ## Key Pieces
//!
//! - **`SlotTable`**: the bays; cars land in a uniformly random empty bay and
//!   departures pick a uniformly random occupied one
//! - **`CapacityGate`**: two counting signals (`vacancies`, `occupied`) built
//!   on `parking_lot` mutexes and condvars
//! - **`Pool`**: `enter`, `exit` and `snapshot`, with edge-triggered full and
//!   empty events
//! - **Roles**: arrival, departure and monitor loops, wired together by
//!   `Simulation`
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use car_park::core::{InMemoryEventSink, Occupant, Pool, PoolEvent};
//!
//! let events = Arc::new(InMemoryEventSink::new(16));
//! let pool = Pool::with_seed(1, 7).with_sink(events.clone());
//!
//! let placement = pool.enter(Occupant::new("ABC123".parse().unwrap())).unwrap();
//! assert_eq!(placement.bay, 0);
//! assert!(placement.became_full);
//!
//! let departure = pool.exit().unwrap();
//! assert_eq!(departure.occupant_id.as_str(), "ABC123");
//! assert_eq!(events.count(|e| matches!(e, PoolEvent::Empty)), 1);
//! ```
//!
//! For complete examples, see:
//! - `tests/car_park_algorithm_test.rs` - back-pressure and race tests
//! - `tests/simulation_test.rs` - threaded runs with scripted operator input

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core car park abstractions and capacity accounting.
pub mod core;
/// Configuration models for the simulation.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Arrival, departure and monitor roles.
pub mod process;
/// Threaded simulation driver and async bridge.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{Occupant, OccupantId, Pool, PoolError, PoolEvent};
