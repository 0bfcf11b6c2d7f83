//! Fixed-size bay table with random slot selection.
//!
//! The table itself is not synchronized; [`crate::core::Pool`] keeps it behind
//! a single `parking_lot::Mutex` and only calls into it while holding that lock.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Occupant, PoolError};

/// Lower bound on random samples before a scan is declared stuck.
const MIN_SCAN_ATTEMPTS: usize = 1024;

/// Samples per bay before a scan is declared stuck.
const SCAN_ATTEMPTS_PER_BAY: usize = 64;

/// Bays of the car park plus the bookkeeping needed to pick one at random.
#[derive(Debug)]
pub struct SlotTable {
    slots: Vec<Option<Occupant>>,
    occupied: usize,
    max_attempts: usize,
    rng: StdRng,
}

impl SlotTable {
    /// Create an empty table seeded from OS entropy.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_os_rng())
    }

    /// Create an empty table with a deterministic generator.
    #[must_use]
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            slots: vec![None; capacity],
            occupied: 0,
            max_attempts: capacity
                .saturating_mul(SCAN_ATTEMPTS_PER_BAY)
                .max(MIN_SCAN_ATTEMPTS),
            rng,
        }
    }

    /// Total number of bays.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied bays.
    #[must_use]
    pub const fn occupied(&self) -> usize {
        self.occupied
    }

    /// Number of empty bays.
    #[must_use]
    pub fn vacant(&self) -> usize {
        self.capacity() - self.occupied
    }

    /// Whether every bay is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied == self.capacity()
    }

    /// Whether every bay is free.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Occupant of bay `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Occupant> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterate bays in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&Occupant>)> {
        self.slots.iter().enumerate().map(|(i, s)| (i, s.as_ref()))
    }

    /// Park `occupant` in a uniformly chosen empty bay and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvariantViolation`] when no bay is empty, which
    /// means the caller claimed without a matching gate reservation. The
    /// occupant is dropped in that case.
    pub fn claim_random_empty(&mut self, occupant: Occupant) -> Result<usize, PoolError> {
        if self.is_full() {
            return Err(PoolError::InvariantViolation(format!(
                "claim for {} with all {} bays occupied",
                occupant.id(),
                self.capacity()
            )));
        }
        let index = self.scan(|slot| slot.is_none(), "empty")?;
        self.slots[index] = Some(occupant);
        self.occupied += 1;
        Ok(index)
    }

    /// Clear a uniformly chosen occupied bay, returning its index and occupant.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvariantViolation`] when no bay is occupied.
    pub fn release_random_occupied(&mut self) -> Result<(usize, Occupant), PoolError> {
        if self.is_empty() {
            return Err(PoolError::InvariantViolation(format!(
                "release with all {} bays empty",
                self.capacity()
            )));
        }
        let index = self.scan(Option::is_some, "occupied")?;
        let occupant = self.slots[index].take().ok_or_else(|| {
            PoolError::InvariantViolation(format!("bay {index} emptied during release"))
        })?;
        self.occupied -= 1;
        Ok((index, occupant))
    }

    /// Resample until `wanted` accepts a bay, giving up after `max_attempts`.
    fn scan<F>(&mut self, wanted: F, kind: &str) -> Result<usize, PoolError>
    where
        F: Fn(&Option<Occupant>) -> bool,
    {
        let capacity = self.slots.len();
        for _ in 0..self.max_attempts {
            let index = self.rng.random_range(0..capacity);
            if wanted(&self.slots[index]) {
                return Ok(index);
            }
        }
        Err(PoolError::InvariantViolation(format!(
            "no {kind} bay found after {} samples ({} of {capacity} occupied)",
            self.max_attempts, self.occupied
        )))
    }
}
