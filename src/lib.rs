//! Swish - single-contact touch gesture recognition
//!
//! Consumes a raw stream of contact events (down, motion, up, cancel) and
//! classifies them into discrete gestures:
//! - Swipes in four directions (axis-dominant displacement over a threshold)
//! - Tap and double-tap
//! - Long-press via a cancellable deadline timer
//! - A live drag stream while a contact is active
//!
//! Consumers register per-gesture handler slots; empty slots drop the
//! gesture silently. The engine is single-threaded and clock-injected: it
//! only ever sees timestamps carried by events, which keeps classification
//! deterministic under test. `runtime` binds it to a calloop event loop
//! for real-time use.

pub mod clock;
pub mod config;
pub mod input;
pub mod runtime;

pub use clock::EngineClock;
pub use config::EngineConfig;
pub use input::{
    Contact, ContactEvent, DragState, GestureEngine, GestureEvent, GestureHandlers, Point,
    SwipeDirection,
};
pub use runtime::GestureRuntime;
