//! Raw contact input

use serde::{Deserialize, Serialize};

/// A position in the input surface's coordinate space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Raw contact event from the input source
///
/// Timestamps are engine-clock milliseconds supplied by the source; the
/// engine never reads a clock of its own. `Up` carries no position - the
/// contact is classified from the last observed motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactEvent {
    Down { position: Point, time_ms: u64 },
    Motion { position: Point, time_ms: u64 },
    Up { time_ms: u64 },
    Cancel,
}

impl ContactEvent {
    /// Timestamp carried by the event, if any (`Cancel` has none)
    pub fn time_ms(&self) -> Option<u64> {
        match self {
            ContactEvent::Down { time_ms, .. }
            | ContactEvent::Motion { time_ms, .. }
            | ContactEvent::Up { time_ms } => Some(*time_ms),
            ContactEvent::Cancel => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_tuple() {
        let p = Point::from((3.0, -4.0));
        assert_eq!(p, Point::new(3.0, -4.0));
    }

    #[test]
    fn test_event_time() {
        let down = ContactEvent::Down {
            position: Point::new(0.0, 0.0),
            time_ms: 42,
        };
        assert_eq!(down.time_ms(), Some(42));
        assert_eq!(ContactEvent::Cancel.time_ms(), None);
    }
}
