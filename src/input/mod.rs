//! Input handling - raw contact events and gesture recognition
//!
//! This module provides:
//! - The raw contact-event stream the engine consumes (`touch`)
//! - Per-contact state tracking and the long-press deadline (`contact`)
//! - The gesture classification engine and handler slots (`engine`)
//! - JSON-lines contact scripts for driving the engine without hardware
//!   (`script`)

mod contact;
mod engine;
pub mod script;
mod touch;

pub use contact::*;
pub use engine::*;
pub use touch::*;
