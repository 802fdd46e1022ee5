//! Loop control: shared flags and the signal listener.
//!
//! Two threads touch this state, the capture loop and the listener,
//! and they share nothing but two boolean flags. The flags are atomic so
//! a concurrent toggle can never tear; relaxed ordering is enough
//! because a toggle observed one tick late is not a correctness issue.

mod flags;
mod listener;

pub use flags::ControlFlags;
pub use listener::{QueuedSignals, Signal, SignalListener, SignalSource, StdinSignals};
