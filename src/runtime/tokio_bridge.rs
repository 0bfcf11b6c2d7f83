//! Async entry points for callers running inside a tokio runtime.
//!
//! The gate wait is a blocking condvar wait, so it is moved onto tokio's
//! blocking thread pool with `spawn_blocking` instead of stalling a runtime
//! worker.

use std::sync::Arc;

use crate::core::{Departure, Occupant, Placement, Pool, PoolError};

/// Park `occupant`, waiting asynchronously while the car park is full.
///
/// # Errors
///
/// Returns the pool's error, or [`PoolError::Internal`] if the blocking task
/// panicked or was cancelled.
pub async fn enter_async(pool: &Arc<Pool>, occupant: Occupant) -> Result<Placement, PoolError> {
    let pool = Arc::clone(pool);
    tokio::task::spawn_blocking(move || pool.enter(occupant))
        .await
        .map_err(|e| PoolError::Internal(format!("enter task failed: {e}")))?
}

/// Remove a random car, waiting asynchronously while the car park is empty.
///
/// # Errors
///
/// Returns the pool's error, or [`PoolError::Internal`] if the blocking task
/// panicked or was cancelled.
pub async fn exit_async(pool: &Arc<Pool>) -> Result<Departure, PoolError> {
    let pool = Arc::clone(pool);
    tokio::task::spawn_blocking(move || pool.exit())
        .await
        .map_err(|e| PoolError::Internal(format!("exit task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_exit_waits_for_arrival() {
        let pool = Arc::new(Pool::with_seed(1, 21));

        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { exit_async(&pool).await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!waiter.is_finished());

        let placement = enter_async(&pool, Occupant::new("TOK123".parse().unwrap()))
            .await
            .unwrap();
        let departure = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("exit should unblock")
            .unwrap()
            .unwrap();

        assert_eq!(departure.bay, placement.bay);
        assert_eq!(departure.occupant_id.as_str(), "TOK123");
    }
}
