//! Counting signals that bound how many cars can be parked.
//!
//! Each signal is a counter protected by a `parking_lot::Mutex` and paired with
//! a `parking_lot::Condvar`. Waiters sleep on the condvar, never poll.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct Permits {
    available: usize,
    waiters: usize,
}

/// A counting semaphore without fairness guarantees.
#[derive(Debug)]
pub struct CountingSignal {
    permits: Mutex<Permits>,
    available: Condvar,
}

impl CountingSignal {
    /// Create a signal holding `initial` permits.
    #[must_use]
    pub fn new(initial: usize) -> Self {
        Self {
            permits: Mutex::new(Permits {
                available: initial,
                waiters: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock();
        if permits.available == 0 {
            permits.waiters += 1;
            self.available.wait_while(&mut permits, |p| p.available == 0);
            permits.waiters -= 1;
        }
        permits.available -= 1;
    }

    /// Take a permit if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if permits.available == 0 {
            return false;
        }
        permits.available -= 1;
        true
    }

    /// Wait at most `timeout` for a permit. Returns whether one was taken.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let mut permits = self.permits.lock();
        if permits.available == 0 {
            permits.waiters += 1;
            self.available
                .wait_while_for(&mut permits, |p| p.available == 0, timeout);
            permits.waiters -= 1;
            if permits.available == 0 {
                return false;
            }
        }
        permits.available -= 1;
        true
    }

    /// Return a permit and wake one waiter.
    pub fn release(&self) {
        {
            let mut permits = self.permits.lock();
            permits.available += 1;
        }
        self.available.notify_one();
    }

    /// Permits currently available.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.lock().available
    }

    /// Threads currently blocked waiting for a permit.
    #[must_use]
    pub fn waiters(&self) -> usize {
        self.permits.lock().waiters
    }
}

/// The pair of signals that turns the bay table into a bounded buffer.
///
/// `vacancies` starts at the capacity and gates arrivals; `occupied` starts at
/// zero and gates departures.
#[derive(Debug)]
pub struct CapacityGate {
    capacity: usize,
    vacancies: CountingSignal,
    occupied: CountingSignal,
}

impl CapacityGate {
    /// Create a gate for `capacity` bays, all vacant.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            vacancies: CountingSignal::new(capacity),
            occupied: CountingSignal::new(0),
        }
    }

    /// Number of bays the gate guards.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a bay is vacant and reserve it for an arrival.
    pub fn reserve_enter(&self) {
        self.vacancies.acquire();
    }

    /// Reserve a vacant bay without blocking.
    pub fn try_reserve_enter(&self) -> bool {
        self.vacancies.try_acquire()
    }

    /// Wait up to `timeout` for a vacant bay.
    pub fn reserve_enter_timeout(&self, timeout: Duration) -> bool {
        self.vacancies.acquire_timeout(timeout)
    }

    /// Block until a bay is occupied and reserve it for a departure.
    pub fn reserve_exit(&self) {
        self.occupied.acquire();
    }

    /// Reserve an occupied bay without blocking.
    pub fn try_reserve_exit(&self) -> bool {
        self.occupied.try_acquire()
    }

    /// Wait up to `timeout` for an occupied bay.
    pub fn reserve_exit_timeout(&self, timeout: Duration) -> bool {
        self.occupied.acquire_timeout(timeout)
    }

    /// Publish a completed arrival, waking a blocked departure.
    pub fn release_enter(&self) {
        self.occupied.release();
    }

    /// Publish a completed departure, waking a blocked arrival.
    pub fn release_exit(&self) {
        self.vacancies.release();
    }

    /// Vacancy permits not yet reserved.
    #[must_use]
    pub fn vacancies(&self) -> usize {
        self.vacancies.available()
    }

    /// Occupancy permits not yet reserved.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied.available()
    }

    /// Arrivals blocked waiting for a vacant bay.
    #[must_use]
    pub fn waiting_to_enter(&self) -> usize {
        self.vacancies.waiters()
    }

    /// Departures blocked waiting for a parked car.
    #[must_use]
    pub fn waiting_to_exit(&self) -> usize {
        self.occupied.waiters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_initial_counts() {
        let gate = CapacityGate::new(3);
        assert_eq!(gate.capacity(), 3);
        assert_eq!(gate.vacancies(), 3);
        assert_eq!(gate.occupied(), 0);
    }

    #[test]
    fn test_try_reserve_respects_zero() {
        let gate = CapacityGate::new(1);
        assert!(!gate.try_reserve_exit());
        assert!(gate.try_reserve_enter());
        assert!(!gate.try_reserve_enter());
        gate.release_enter();
        assert!(gate.try_reserve_exit());
        gate.release_exit();
        assert_eq!(gate.vacancies(), 1);
        assert_eq!(gate.occupied(), 0);
    }

    #[test]
    fn test_timeout_expires_when_empty() {
        let gate = CapacityGate::new(2);
        assert!(!gate.reserve_exit_timeout(Duration::from_millis(20)));
        assert_eq!(gate.occupied(), 0);
        assert_eq!(gate.waiting_to_exit(), 0);
    }

    #[test]
    fn test_release_wakes_blocked_reserver() {
        let gate = Arc::new(CapacityGate::new(1));
        gate.reserve_enter();

        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.reserve_enter_timeout(Duration::from_secs(5)))
        };

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while gate.waiting_to_enter() == 0 && std::time::Instant::now() < deadline {
            thread::yield_now();
        }
        assert_eq!(gate.waiting_to_enter(), 1);
        assert_eq!(gate.waiting_to_exit(), 0);
        gate.release_exit();
        assert!(waiter.join().unwrap());
        assert_eq!(gate.vacancies(), 0);
        assert_eq!(gate.waiting_to_enter(), 0);
    }

    #[test]
    fn test_signal_never_goes_negative() {
        let signal = Arc::new(CountingSignal::new(0));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let signal = Arc::clone(&signal);
            handles.push(thread::spawn(move || signal.acquire()));
        }
        thread::sleep(Duration::from_millis(20));
        for _ in 0..4 {
            signal.release();
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(signal.available(), 0);
    }
}
