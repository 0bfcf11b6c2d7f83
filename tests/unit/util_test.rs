//! Tests for utility functions

use std::time::Duration;

use car_park::core::OccupantId;
use car_park::util::{random_occupant_id, secs_f2};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_secs_two_decimals() {
    assert_eq!(secs_f2(Duration::from_millis(1500)), "1.50");
    assert_eq!(secs_f2(Duration::ZERO), "0.00");
    assert_eq!(secs_f2(Duration::from_millis(12_346)), "12.35");
}

#[test]
fn test_random_ids_have_shape() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let id = random_occupant_id(&mut rng);
        let s = id.as_str();
        assert_eq!(s.len(), 6);
        assert!(s[..3].bytes().all(|b| b.is_ascii_uppercase()));
        assert!(s[3..].bytes().all(|b| b.is_ascii_digit()));
    }
}

#[test]
fn test_occupant_id_parse() {
    assert!("ABC123".parse::<OccupantId>().is_ok());
    assert!("abc123".parse::<OccupantId>().is_err());
    assert!("ABCD12".parse::<OccupantId>().is_err());
    assert!("AB123".parse::<OccupantId>().is_err());
}

#[test]
fn test_occupant_id_serde() {
    let id: OccupantId = "QRS456".parse().unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"QRS456\"");
    let back: OccupantId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
    assert!(serde_json::from_str::<OccupantId>("\"bad\"").is_err());
}
