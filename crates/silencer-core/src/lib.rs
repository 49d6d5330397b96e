//! Core domain logic for the logcat silencer.
//!
//! This crate contains the fundamental types and logic for:
//! - Category extraction: pulling the component tag out of a log line
//! - The stream gate: suppressing known categories until the stream goes quiet
//! - Clocks: the time source the quiet timer is sampled from

pub mod category;
pub mod clock;
mod gate;

pub use category::{CategoryKey, DEFAULT_CATEGORY_FIELD, ParseFailure, classify};
pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{
    ConfigError, DEFAULT_QUIET_PERIOD, GateConfig, GateState, GateStats, Handled, QuietStatus,
    Release, StreamGate, Verdict,
};
