//! Tests for event reporting

use std::io::{self, Write};
use std::sync::Arc;

use car_park::core::{ConsoleSink, EventSink, Occupant, Pool, PoolEvent, TracingSink};
use parking_lot::Mutex;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_pool_reports_to_console() {
    let buf = SharedBuf::default();
    let pool = Pool::with_seed(1, 4).with_sink(Arc::new(ConsoleSink::new(buf.clone())));

    pool.enter(Occupant::new("ABC123".parse().unwrap())).unwrap();
    pool.exit().unwrap();

    let text = String::from_utf8(buf.0.lock().clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Car ABC123 parked in bay 1.");
    assert_eq!(lines[1], "The car park is full.");
    assert!(lines[2].starts_with("Car ABC123 departed from bay 1 and stayed for "));
    assert!(lines[2].ends_with(" seconds."));
    assert_eq!(lines[3], "The car park is empty.");
}

#[test]
fn test_tracing_sink_accepts_every_event() {
    let sink = TracingSink;
    sink.record(&PoolEvent::Parked {
        id: "ABC123".parse().unwrap(),
        bay: 0,
    });
    sink.record(&PoolEvent::Full);
    sink.record(&PoolEvent::Empty);

    let pool = Pool::with_seed(2, 8).with_sink(Arc::new(TracingSink));
    pool.enter(Occupant::new("DEF456".parse().unwrap())).unwrap();
    assert_eq!(pool.exit().unwrap().occupant_id.as_str(), "DEF456");
}

#[test]
fn test_event_display_matches_console() {
    assert_eq!(PoolEvent::Full.to_string(), "The car park is full.");
    let parked = PoolEvent::Parked {
        id: "XYZ789".parse().unwrap(),
        bay: 9,
    };
    assert_eq!(parked.to_string(), "Car XYZ789 parked in bay 10.");
}
