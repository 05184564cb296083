//! Gesture recognition engine
//!
//! Consumes the raw contact stream and classifies it into discrete
//! gestures:
//! - Swipes (left, right, up, down) by axis-dominant displacement
//! - Tap and double-tap
//! - Long press via a cancellable deadline
//! - A live drag stream while the contact is active
//!
//! At most one contact is tracked at a time. Exactly one of
//! {swipe, tap, nothing} is emitted per contact end; long-press fires
//! mid-contact and double-tap fires at the following contact start.

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::input::contact::{Contact, TapRecord};
use crate::input::touch::{ContactEvent, Point};

/// Both-axis displacement under this counts as a tap at contact end, and
/// a second contact start within this of the previous one stays inside
/// the double-tap position window
pub const TAP_TOLERANCE: f64 = 10.0;

/// Straight-line movement beyond this disqualifies a long press
pub const JITTER_TOLERANCE: f64 = 10.0;

/// Direction of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Recognized gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Single tap (short contact with both-axis displacement under tolerance)
    Tap { position: Point },

    /// Second contact start inside the double-tap time and position window
    DoubleTap { position: Point },

    /// Contact held past the long-press delay without moving beyond jitter
    LongPress { position: Point },

    /// Axis-dominant displacement past the swipe threshold at contact end
    Swipe { direction: SwipeDirection, delta: Point },
}

/// Live drag telemetry published to the drag observer on every motion
///
/// This is presentation-facing state, not a discrete gesture; it carries
/// the straight-line distance as a velocity proxy alongside the measured
/// velocity of the last motion pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub delta: Point,
    pub distance_from_origin: f64,
    pub velocity: Point,
}

/// Handler invoked with a gesture position or final swipe delta
pub type GestureCallback = Box<dyn FnMut(Point)>;

/// Observer invoked with live drag telemetry
pub type DragCallback = Box<dyn FnMut(&DragState)>;

/// Per-gesture handler slots
///
/// Empty slots silently drop the gesture. Handler presence also gates the
/// bookkeeping that serves it: the long-press deadline is only armed when
/// `on_long_press` is set, and tap history is only kept when
/// `on_double_tap` is set.
#[derive(Default)]
pub struct GestureHandlers {
    /// Invoked with the final delta on a left swipe
    pub on_swipe_left: Option<GestureCallback>,
    /// Invoked with the final delta on a right swipe
    pub on_swipe_right: Option<GestureCallback>,
    /// Invoked with the final delta on an upward swipe
    pub on_swipe_up: Option<GestureCallback>,
    /// Invoked with the final delta on a downward swipe
    pub on_swipe_down: Option<GestureCallback>,
    /// Invoked with the contact origin on a tap
    pub on_tap: Option<GestureCallback>,
    /// Invoked with the second start position on a double-tap
    pub on_double_tap: Option<GestureCallback>,
    /// Invoked with the contact origin when the long-press delay elapses
    pub on_long_press: Option<GestureCallback>,
    /// Invoked on every motion while a contact is active
    pub on_drag: Option<DragCallback>,
}

/// Gesture recognition state machine
///
/// All timestamps are engine-clock milliseconds carried by the events; the
/// engine never reads a clock. The host arms a real timer for the deadline
/// reported by `pending_long_press_ms` and calls `handle_timeout` when it
/// fires.
pub struct GestureEngine {
    config: EngineConfig,
    handlers: GestureHandlers,
    contact: Option<Contact>,
    last_tap: Option<TapRecord>,
}

impl GestureEngine {
    pub fn new(config: EngineConfig, handlers: GestureHandlers) -> Self {
        Self {
            config,
            handlers,
            contact: None,
            last_tap: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a contact is currently being tracked
    pub fn has_active_contact(&self) -> bool {
        self.contact.is_some()
    }

    /// Deadline of the armed long-press timer, if any
    pub fn pending_long_press_ms(&self) -> Option<u64> {
        self.contact.as_ref().and_then(|c| c.long_press.deadline_ms())
    }

    /// Feed one raw contact event
    pub fn handle_event(&mut self, event: ContactEvent) {
        match event {
            ContactEvent::Down { position, time_ms } => self.contact_down(position, time_ms),
            ContactEvent::Motion { position, time_ms } => self.contact_motion(position, time_ms),
            ContactEvent::Up { time_ms } => self.contact_up(time_ms),
            ContactEvent::Cancel => self.contact_cancel(),
        }
    }

    /// Handle contact start
    pub fn contact_down(&mut self, position: Point, time_ms: u64) {
        if self.contact.take().is_some() {
            // A well-behaved source sends up/cancel first; never merge the
            // stale contact's deltas into the new one.
            debug!("contact start while a contact is active, abandoning previous contact");
        }
        trace!(x = position.x, y = position.y, time_ms, "contact start");

        let mut contact = Contact::new(position, time_ms);
        if self.handlers.on_long_press.is_some() {
            contact
                .long_press
                .arm(time_ms + self.config.long_press_delay_ms);
        }
        self.contact = Some(contact);

        if self.handlers.on_double_tap.is_some() {
            let in_window = self.last_tap.is_some_and(|last| {
                let dt = time_ms.saturating_sub(last.time_ms);
                let dx = (position.x - last.position.x).abs();
                let dy = (position.y - last.position.y).abs();
                dt < self.config.double_tap_delay_ms && dx < TAP_TOLERANCE && dy < TAP_TOLERANCE
            });

            if in_window {
                // Clear the history so a third rapid tap is not read as
                // another double-tap.
                self.last_tap = None;
                self.dispatch(GestureEvent::DoubleTap { position });
            } else {
                self.last_tap = Some(TapRecord { position, time_ms });
            }
        }
    }

    /// Handle contact motion
    pub fn contact_motion(&mut self, position: Point, time_ms: u64) {
        let Some(contact) = self.contact.as_mut() else {
            trace!("motion with no active contact, ignoring");
            return;
        };

        contact.update(position, time_ms);
        let distance = contact.distance_from_origin();

        if distance > JITTER_TOLERANCE && contact.long_press.is_armed() {
            contact.long_press.disarm();
            debug!(distance, "movement beyond jitter tolerance, long press disqualified");
        }

        let drag = DragState {
            delta: contact.delta(),
            distance_from_origin: distance,
            velocity: contact.velocity,
        };
        if let Some(observer) = self.handlers.on_drag.as_mut() {
            observer(&drag);
        }
    }

    /// Handle contact end, classifying the completed contact
    pub fn contact_up(&mut self, time_ms: u64) {
        let Some(mut contact) = self.contact.take() else {
            trace!("up with no active contact, ignoring");
            return;
        };
        contact.long_press.disarm();

        if contact.long_press_fired {
            debug!("long press already fired for this contact, skipping end classification");
            return;
        }

        let delta = contact.delta();
        let (abs_x, abs_y) = (delta.x.abs(), delta.y.abs());
        let duration_ms = time_ms.saturating_sub(contact.start_time_ms);

        if abs_x > self.config.swipe_threshold || abs_y > self.config.swipe_threshold {
            let direction = if abs_x > abs_y {
                if delta.x > 0.0 {
                    SwipeDirection::Right
                } else {
                    SwipeDirection::Left
                }
            } else if delta.y > 0.0 {
                SwipeDirection::Down
            } else {
                SwipeDirection::Up
            };
            self.dispatch(GestureEvent::Swipe { direction, delta });
        } else if abs_x < TAP_TOLERANCE && abs_y < TAP_TOLERANCE {
            self.dispatch(GestureEvent::Tap {
                position: contact.origin,
            });
        } else {
            // Dead zone: too far for a tap, too short for a swipe.
            debug!(abs_x, abs_y, duration_ms, "movement in dead zone, no gesture");
        }
    }

    /// Handle contact cancellation from the input source
    pub fn contact_cancel(&mut self) {
        if let Some(mut contact) = self.contact.take() {
            contact.long_press.disarm();
            debug!("contact cancelled, no gesture");
        }
    }

    /// Service the long-press deadline
    ///
    /// Called by the host timer facility. Fires at most once per contact,
    /// and only once `now_ms` has reached the armed deadline; a stale
    /// wakeup after disarm is a no-op.
    pub fn handle_timeout(&mut self, now_ms: u64) {
        let Some(contact) = self.contact.as_mut() else {
            return;
        };
        if !contact.long_press.fire_if_due(now_ms) {
            return;
        }
        contact.long_press_fired = true;
        let position = contact.origin;
        self.dispatch(GestureEvent::LongPress { position });
    }

    /// Route a classified gesture to its handler slot
    ///
    /// Engine bookkeeping is already consistent by the time a handler
    /// runs; a handler that panics cannot corrupt classification state.
    /// An empty slot drops the gesture.
    fn dispatch(&mut self, event: GestureEvent) {
        debug!(?event, "gesture classified");
        let slot = match event {
            GestureEvent::Swipe { direction, .. } => match direction {
                SwipeDirection::Left => &mut self.handlers.on_swipe_left,
                SwipeDirection::Right => &mut self.handlers.on_swipe_right,
                SwipeDirection::Up => &mut self.handlers.on_swipe_up,
                SwipeDirection::Down => &mut self.handlers.on_swipe_down,
            },
            GestureEvent::Tap { .. } => &mut self.handlers.on_tap,
            GestureEvent::DoubleTap { .. } => &mut self.handlers.on_double_tap,
            GestureEvent::LongPress { .. } => &mut self.handlers.on_long_press,
        };
        let payload = match event {
            GestureEvent::Swipe { delta, .. } => delta,
            GestureEvent::Tap { position }
            | GestureEvent::DoubleTap { position }
            | GestureEvent::LongPress { position } => position,
        };
        match slot {
            Some(handler) => handler(payload),
            None => trace!("no handler registered, gesture dropped"),
        }
    }
}
