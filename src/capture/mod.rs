//! Screen input and frame handling.
//!
//! This module provides abstractions for grabbing full-screen frames and
//! for loading runtime configuration. The screen is treated as an opaque
//! source of pixels; everything the pipeline knows about the puzzle is
//! derived downstream.

mod config;
mod frame;
mod screen;

pub use config::{ActConfig, CaptureConfig, ConfigError, CorpusConfig, FileConfig};
pub use frame::Frame;
pub use screen::{CaptureError, MockScreen, ScreenGrabber};

#[cfg(feature = "screen")]
pub use screen::XcapScreen;
