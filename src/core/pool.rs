//! The car park: bay table plus capacity gate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::{
    CapacityGate, EventSink, Occupant, OccupantId, PoolError, PoolEvent, SlotTable,
};

/// Where an arriving car was parked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Zero-based bay index.
    pub bay: usize,
    /// Whether this arrival took the last vacant bay.
    pub became_full: bool,
}

/// A car that has left the car park.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Registration code of the departed car.
    pub occupant_id: OccupantId,
    /// Zero-based bay index it left.
    pub bay: usize,
    /// Time between arrival and departure.
    pub dwell: Duration,
    /// Whether this departure cleared the last occupied bay.
    pub became_empty: bool,
}

/// A parked car as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkedCar {
    /// Registration code.
    pub id: OccupantId,
    /// Seconds parked as of the snapshot instant.
    pub dwell_secs: f64,
}

/// One bay in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BayView {
    /// Zero-based bay index.
    pub index: usize,
    /// Car in the bay, if any.
    pub occupant: Option<ParkedCar>,
}

/// Point-in-time view of every bay, in index order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSnapshot {
    /// All bays, index order.
    pub bays: Vec<BayView>,
}

impl PoolSnapshot {
    /// Number of occupied bays in the view.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.bays.iter().filter(|b| b.occupant.is_some()).count()
    }

    /// Number of empty bays in the view.
    #[must_use]
    pub fn vacant(&self) -> usize {
        self.bays.len() - self.occupied()
    }
}

impl fmt::Display for PoolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Car park state:")?;
        for bay in &self.bays {
            match &bay.occupant {
                None => writeln!(f, "{}: Empty", bay.index + 1)?,
                Some(car) => writeln!(
                    f,
                    "{}: {} (has parked for {:.2} seconds)",
                    bay.index + 1,
                    car.id,
                    car.dwell_secs
                )?,
            }
        }
        Ok(())
    }
}

/// Statistics about pool utilization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Total number of bays.
    pub capacity: usize,
    /// Bays currently occupied.
    pub occupied: usize,
    /// Bays currently vacant.
    pub vacant: usize,
    /// Cars parked since the pool was created.
    pub total_entered: u64,
    /// Cars departed since the pool was created.
    pub total_departed: u64,
}

/// A fixed-capacity car park shared by arrival, departure and monitor threads.
///
/// Arrivals and departures first reserve a permit on the [`CapacityGate`],
/// blocking while the park is full (or empty), then take the bay table lock
/// for a short critical section. The table lock is never held while waiting
/// on the gate, and gate locks are never taken while the table is locked.
pub struct Pool {
    gate: CapacityGate,
    table: Mutex<SlotTable>,
    sink: Option<Arc<dyn EventSink>>,
    total_entered: AtomicU64,
    total_departed: AtomicU64,
}

impl Pool {
    /// Create an empty pool with `capacity` bays and OS-seeded bay selection.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::from_table(SlotTable::new(capacity))
    }

    /// Create an empty pool whose bay selection is reproducible.
    #[must_use]
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::from_table(SlotTable::with_seed(capacity, seed))
    }

    pub(crate) fn from_table(table: SlotTable) -> Self {
        Self {
            gate: CapacityGate::new(table.capacity()),
            table: Mutex::new(table),
            sink: None,
            total_entered: AtomicU64::new(0),
            total_departed: AtomicU64::new(0),
        }
    }

    /// Attach an event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Number of bays.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.gate.capacity()
    }

    /// Vacancy permits on the gate. Equals `stats().vacant` when no
    /// arrival or departure is in flight.
    #[must_use]
    pub fn gate_vacancies(&self) -> usize {
        self.gate.vacancies()
    }

    /// Occupancy permits on the gate. Equals `stats().occupied` when no
    /// arrival or departure is in flight.
    #[must_use]
    pub fn gate_occupied(&self) -> usize {
        self.gate.occupied()
    }

    /// Arrivals currently blocked because the car park is full.
    #[must_use]
    pub fn waiting_arrivals(&self) -> usize {
        self.gate.waiting_to_enter()
    }

    /// Departures currently blocked because the car park is empty.
    #[must_use]
    pub fn waiting_departures(&self) -> usize {
        self.gate.waiting_to_exit()
    }

    /// Raw gate access for tests that need to desynchronize it.
    #[cfg(test)]
    pub(crate) const fn gate(&self) -> &CapacityGate {
        &self.gate
    }

    /// Park `occupant`, blocking while every bay is taken.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvariantViolation`] if the gate admitted the car
    /// but the table has no empty bay. The pool is unusable afterwards.
    pub fn enter(&self, occupant: Occupant) -> Result<Placement, PoolError> {
        self.gate.reserve_enter();
        self.enter_reserved(occupant)
    }

    /// Like [`Pool::enter`], but give up after `timeout` if no bay frees up.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::enter`].
    pub fn enter_timeout(
        &self,
        occupant: Occupant,
        timeout: Duration,
    ) -> Result<Option<Placement>, PoolError> {
        if !self.gate.reserve_enter_timeout(timeout) {
            tracing::debug!(occupant = %occupant.id(), "no vacant bay before timeout");
            return Ok(None);
        }
        self.enter_reserved(occupant).map(Some)
    }

    /// Remove a randomly chosen car, blocking while the park is empty.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvariantViolation`] if the gate admitted the
    /// departure but the table has no occupied bay.
    pub fn exit(&self) -> Result<Departure, PoolError> {
        self.gate.reserve_exit();
        self.exit_reserved()
    }

    /// Like [`Pool::exit`], but give up after `timeout` if no car is parked.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::exit`].
    pub fn exit_timeout(&self, timeout: Duration) -> Result<Option<Departure>, PoolError> {
        if !self.gate.reserve_exit_timeout(timeout) {
            tracing::debug!("no parked car before timeout");
            return Ok(None);
        }
        self.exit_reserved().map(Some)
    }

    fn enter_reserved(&self, occupant: Occupant) -> Result<Placement, PoolError> {
        let placement = {
            let mut table = self.table.lock();
            let id = occupant.id().clone();
            let bay = table.claim_random_empty(occupant).inspect_err(|e| {
                tracing::error!(occupant = %id, error = %e, "bay table out of sync with gate");
            })?;
            self.emit(&PoolEvent::Parked { id: id.clone(), bay });

            let became_full = table.is_full();
            if became_full {
                self.emit(&PoolEvent::Full);
            }
            tracing::debug!(occupant = %id, bay, occupied = table.occupied(), "car parked");
            Placement { bay, became_full }
        };
        self.total_entered.fetch_add(1, Ordering::Relaxed);
        self.gate.release_enter();
        Ok(placement)
    }

    fn exit_reserved(&self) -> Result<Departure, PoolError> {
        let departure = {
            let mut table = self.table.lock();
            let (bay, occupant) = table.release_random_occupied().inspect_err(|e| {
                tracing::error!(error = %e, "bay table out of sync with gate");
            })?;
            let dwell = occupant.dwell_at(Instant::now());
            let occupant_id = occupant.into_id();
            self.emit(&PoolEvent::Departed {
                id: occupant_id.clone(),
                bay,
                dwell,
            });

            let became_empty = table.is_empty();
            if became_empty {
                self.emit(&PoolEvent::Empty);
            }
            tracing::debug!(
                occupant = %occupant_id,
                bay,
                dwell_secs = dwell.as_secs_f64(),
                occupied = table.occupied(),
                "car departed"
            );
            Departure {
                occupant_id,
                bay,
                dwell,
                became_empty,
            }
        };
        self.total_departed.fetch_add(1, Ordering::Relaxed);
        self.gate.release_exit();
        Ok(departure)
    }

    /// Consistent view of every bay, dwell times measured at one instant.
    ///
    /// Only the bay table lock is taken; the gate is never touched, so a
    /// snapshot never waits behind a blocked arrival or departure.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        let table = self.table.lock();
        let now = Instant::now();
        let bays = table
            .iter()
            .map(|(index, slot)| BayView {
                index,
                occupant: slot.map(|o| ParkedCar {
                    id: o.id().clone(),
                    dwell_secs: o.dwell_at(now).as_secs_f64(),
                }),
            })
            .collect();
        PoolSnapshot { bays }
    }

    /// Current counts, read under the bay table lock.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let (occupied, vacant) = {
            let table = self.table.lock();
            (table.occupied(), table.vacant())
        };
        PoolStats {
            capacity: self.capacity(),
            occupied,
            vacant,
            total_entered: self.total_entered.load(Ordering::Relaxed),
            total_departed: self.total_departed.load(Ordering::Relaxed),
        }
    }

    fn emit(&self, event: &PoolEvent) {
        if let Some(sink) = &self.sink {
            sink.record(event);
        }
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("gate", &self.gate)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
