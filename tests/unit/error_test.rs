//! Tests for error types

use car_park::core::PoolError;

#[test]
fn test_invariant_violation_error() {
    let err = PoolError::InvariantViolation("no empty bay".to_string());
    assert_eq!(format!("{err}"), "invariant violation: no empty bay");
    assert!(err.is_fatal());
}

#[test]
fn test_invalid_config_error() {
    let err = PoolError::InvalidConfig("capacity must be greater than 0".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: capacity must be greater than 0"
    );
    assert!(!err.is_fatal());
}

#[test]
fn test_io_error_not_fatal() {
    let err = PoolError::from(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "stdin closed",
    ));
    assert_eq!(format!("{err}"), "io error: stdin closed");
    assert!(!err.is_fatal());
}

#[test]
fn test_internal_error() {
    let err = PoolError::Internal("monitor thread panicked".to_string());
    assert_eq!(format!("{err}"), "internal error: monitor thread panicked");
    assert!(err.is_fatal());
}

#[test]
fn test_into_anyhow_keeps_message() {
    let result: car_park::core::AppResult<()> =
        Err(PoolError::InvalidConfig("tick_ms must be greater than 0".into()).into());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("tick_ms"));
    assert!(err.downcast_ref::<PoolError>().is_some());
}
