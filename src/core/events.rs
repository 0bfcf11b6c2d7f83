//! Pool event reporting.
//!
//! The pool emits one [`PoolEvent`] per placement, departure and full/empty
//! transition while it still holds the bay table lock, so every sink observes
//! events in the order the table changed. Sinks must only take locks of their
//! own and must not call back into the pool.

use std::collections::VecDeque;
use std::fmt;
use std::io::Write;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::OccupantId;
use crate::util::clock::secs_f2;

/// Something observable that happened to the car park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolEvent {
    /// A car was placed in a bay.
    Parked {
        /// Registration code.
        id: OccupantId,
        /// Zero-based bay index.
        bay: usize,
    },
    /// A car left its bay.
    Departed {
        /// Registration code.
        id: OccupantId,
        /// Zero-based bay index.
        bay: usize,
        /// Time between arrival and departure.
        dwell: Duration,
    },
    /// The last vacant bay was just taken.
    Full,
    /// The last occupied bay was just cleared.
    Empty,
}

impl fmt::Display for PoolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parked { id, bay } => write!(f, "Car {id} parked in bay {}.", bay + 1),
            Self::Departed { id, bay, dwell } => write!(
                f,
                "Car {id} departed from bay {} and stayed for {} seconds.",
                bay + 1,
                secs_f2(*dwell)
            ),
            Self::Full => f.write_str("The car park is full."),
            Self::Empty => f.write_str("The car park is empty."),
        }
    }
}

/// Observer of pool events.
pub trait EventSink: Send + Sync {
    /// Record an event. Called with the bay table locked; keep it short.
    fn record(&self, event: &PoolEvent);
}

/// Prints each event as one report line.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Report to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Report to an arbitrary writer.
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl EventSink for ConsoleSink {
    fn record(&self, event: &PoolEvent) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{event}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write car park report");
        }
    }
}

/// Reports events as structured `tracing` records instead of console lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &PoolEvent) {
        match event {
            PoolEvent::Parked { id, bay } => {
                tracing::info!(occupant = %id, bay = *bay, "car parked");
            }
            PoolEvent::Departed { id, bay, dwell } => tracing::info!(
                occupant = %id,
                bay = *bay,
                dwell_secs = dwell.as_secs_f64(),
                "car departed"
            ),
            PoolEvent::Full => tracing::info!("car park full"),
            PoolEvent::Empty => tracing::info!("car park empty"),
        }
    }
}

/// Bounded in-memory event log for tests and diagnostics.
#[derive(Debug)]
pub struct InMemoryEventSink {
    events: Mutex<VecDeque<PoolEvent>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink that keeps the most recent `max_events` events.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(4096))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Count stored events matching `pred`.
    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&PoolEvent) -> bool,
    {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    /// Drop all stored events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, event: &PoolEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}
