//! Tests for builder modules

use std::sync::Arc;

use car_park::builders::PoolBuilder;
use car_park::config::SimulationConfig;
use car_park::core::{InMemoryEventSink, Occupant, PoolError, PoolEvent};

#[test]
fn test_builder_from_config() {
    let cfg = SimulationConfig {
        capacity: 4,
        seed: Some(12),
        ..SimulationConfig::default()
    };
    let pool = PoolBuilder::from_config(&cfg).build().unwrap();
    assert_eq!(pool.capacity(), 4);
    assert_eq!(pool.stats().vacant, 4);
}

#[test]
fn test_builder_requires_capacity() {
    let err = PoolBuilder::new().build().unwrap_err();
    assert!(matches!(err, PoolError::InvalidConfig(_)));

    let err = PoolBuilder::new().capacity(0).build().unwrap_err();
    assert!(matches!(err, PoolError::InvalidConfig(_)));
}

#[test]
fn test_builder_seed_reproducible() {
    let bays = |seed| {
        let pool = PoolBuilder::new().capacity(8).seed(seed).build().unwrap();
        ["AAA001", "AAA002", "AAA003"]
            .iter()
            .map(|code| pool.enter(Occupant::new(code.parse().unwrap())).unwrap().bay)
            .collect::<Vec<_>>()
    };
    assert_eq!(bays(31), bays(31));
}

#[test]
fn test_builder_attaches_sink() {
    let sink = Arc::new(InMemoryEventSink::new(8));
    let pool = PoolBuilder::new()
        .capacity(1)
        .seed(1)
        .sink(sink.clone())
        .build()
        .unwrap();
    pool.enter(Occupant::new("ZZZ999".parse().unwrap())).unwrap();
    assert_eq!(sink.count(|e| matches!(e, PoolEvent::Parked { .. })), 1);
    assert_eq!(sink.count(|e| *e == PoolEvent::Full), 1);
}
