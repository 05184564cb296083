//! Per-contact state tracking

use crate::input::touch::Point;

/// Cancellable long-press deadline owned by a contact
///
/// The deadline lives with the contact state; the host timer facility only
/// wakes the engine, which checks `fire_if_due`. Disarming happens inside
/// the event handler that triggers it, so a stale host timer firing later
/// finds nothing armed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongPressTimer {
    deadline_ms: Option<u64>,
}

impl LongPressTimer {
    /// Arm the timer. Called exactly once per contact, at contact start.
    pub fn arm(&mut self, deadline_ms: u64) {
        self.deadline_ms = Some(deadline_ms);
    }

    /// Drop the pending deadline. No-op when nothing is armed.
    pub fn disarm(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// The pending deadline in engine-clock milliseconds
    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Fire the timer if the deadline has been reached, disarming it.
    /// Returns whether it fired.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// State tracked for one active contact lifecycle
#[derive(Debug, Clone)]
pub struct Contact {
    /// Position at contact start
    pub origin: Point,
    /// Position at the last observed motion
    pub current: Point,
    /// Engine-clock time at contact start
    pub start_time_ms: u64,
    /// Engine-clock time of the last observed event
    pub last_time_ms: u64,
    /// Instantaneous velocity from the last motion pair (units/sec)
    pub velocity: Point,
    /// Pending long-press deadline
    pub long_press: LongPressTimer,
    /// Set once the long-press handler has been dispatched; suppresses
    /// end-of-contact classification for this lifecycle
    pub long_press_fired: bool,
}

impl Contact {
    pub fn new(position: Point, time_ms: u64) -> Self {
        Self {
            origin: position,
            current: position,
            start_time_ms: time_ms,
            last_time_ms: time_ms,
            velocity: Point::from((0.0, 0.0)),
            long_press: LongPressTimer::default(),
            long_press_fired: false,
        }
    }

    /// Record a motion sample, updating velocity from the previous one
    pub fn update(&mut self, position: Point, time_ms: u64) {
        let dt = time_ms.saturating_sub(self.last_time_ms) as f64 / 1000.0;
        if dt > 0.001 {
            self.velocity = Point::from((
                (position.x - self.current.x) / dt,
                (position.y - self.current.y) / dt,
            ));
        }
        self.current = position;
        self.last_time_ms = time_ms;
    }

    /// Displacement since contact start
    pub fn delta(&self) -> Point {
        Point::from((
            self.current.x - self.origin.x,
            self.current.y - self.origin.y,
        ))
    }

    /// Straight-line distance from the origin (not path length)
    pub fn distance_from_origin(&self) -> f64 {
        let d = self.delta();
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

/// Position and time of the last recorded contact start, kept across
/// contact lifecycles for double-tap detection
#[derive(Debug, Clone, Copy)]
pub struct TapRecord {
    pub position: Point,
    pub time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_and_distance() {
        let mut contact = Contact::new(Point::new(10.0, 20.0), 0);
        contact.update(Point::new(13.0, 24.0), 50);
        assert_eq!(contact.delta(), Point::new(3.0, 4.0));
        assert!((contact.distance_from_origin() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_from_last_motion_pair() {
        let mut contact = Contact::new(Point::new(0.0, 0.0), 0);
        contact.update(Point::new(50.0, 0.0), 100);
        // 50 units over 100ms = 500 units/sec
        assert!((contact.velocity.x - 500.0).abs() < 1e-9);
        assert_eq!(contact.velocity.y, 0.0);
    }

    #[test]
    fn test_velocity_skips_zero_dt() {
        let mut contact = Contact::new(Point::new(0.0, 0.0), 0);
        contact.update(Point::new(50.0, 0.0), 0);
        assert_eq!(contact.velocity, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_long_press_timer_fires_once_at_deadline() {
        let mut timer = LongPressTimer::default();
        timer.arm(500);
        assert!(timer.is_armed());
        assert!(!timer.fire_if_due(499));
        assert!(timer.is_armed());
        assert!(timer.fire_if_due(500));
        assert!(!timer.is_armed());
        assert!(!timer.fire_if_due(600));
    }

    #[test]
    fn test_long_press_timer_disarm() {
        let mut timer = LongPressTimer::default();
        timer.arm(500);
        timer.disarm();
        assert!(!timer.fire_if_due(1000));
        // disarming an idle timer is a no-op
        timer.disarm();
        assert_eq!(timer.deadline_ms(), None);
    }
}
