//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use car_park::config::simulation::{
    ENV_ARRIVAL_PROBABILITY, ENV_CAPACITY, ENV_SEED, ENV_TICK_MS,
};
use car_park::config::SimulationConfig;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let cfg = SimulationConfig::default();
    assert_eq!(cfg.capacity, 10);
    assert_eq!(cfg.tick(), Duration::from_millis(500));
    assert!((cfg.arrival_probability - 0.6).abs() < f64::EPSILON);
    assert!((cfg.departure_probability - 0.4).abs() < f64::EPSILON);
    assert_eq!(cfg.seed, None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_zero_capacity_invalid() {
    let cfg = SimulationConfig {
        capacity: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().unwrap_err().contains("capacity"));
}

#[test]
fn test_zero_tick_invalid() {
    let cfg = SimulationConfig {
        tick_ms: 0,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_probability_out_of_range() {
    let cfg = SimulationConfig {
        departure_probability: 1.5,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().unwrap_err().contains("departure_probability"));

    let cfg = SimulationConfig {
        arrival_probability: f64::NAN,
        ..SimulationConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_json_partial_uses_defaults() {
    let cfg = SimulationConfig::from_json_str(r#"{ "capacity": 4, "seed": 99 }"#).unwrap();
    assert_eq!(cfg.capacity, 4);
    assert_eq!(cfg.seed, Some(99));
    assert_eq!(cfg.tick_ms, 500);
}

#[test]
fn test_json_rejects_invalid_values() {
    assert!(SimulationConfig::from_json_str(r#"{ "capacity": 0 }"#).is_err());
    assert!(SimulationConfig::from_json_str("not json")
        .unwrap_err()
        .starts_with("parse error"));
}

#[test]
fn test_json_file_missing() {
    let err = SimulationConfig::from_json_file(std::path::Path::new(
        "/nonexistent/car_park.json",
    ))
    .unwrap_err();
    assert!(err.contains("cannot read"));
}

#[test]
fn test_env_overrides() {
    let cfg = SimulationConfig::default()
        .apply_overrides(lookup(&[
            (ENV_CAPACITY, "3"),
            (ENV_TICK_MS, " 25 "),
            (ENV_ARRIVAL_PROBABILITY, "1.0"),
            (ENV_SEED, "7"),
        ]))
        .unwrap();
    assert_eq!(cfg.capacity, 3);
    assert_eq!(cfg.tick_ms, 25);
    assert!((cfg.arrival_probability - 1.0).abs() < f64::EPSILON);
    assert_eq!(cfg.seed, Some(7));
}

#[test]
fn test_env_override_parse_error() {
    let err = SimulationConfig::default()
        .apply_overrides(lookup(&[(ENV_CAPACITY, "lots")]))
        .unwrap_err();
    assert!(err.contains(ENV_CAPACITY));
}

#[test]
fn test_no_overrides_is_identity() {
    let cfg = SimulationConfig::default().apply_overrides(|_| None).unwrap();
    assert_eq!(cfg, SimulationConfig::default());
}
