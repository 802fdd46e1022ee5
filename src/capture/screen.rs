//! Screen grabber abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over the OS screen
//! capture service, allowing for both a real adapter (behind the `screen`
//! feature) and mock implementations for tests and demonstration runs.

use super::Frame;
use thiserror::Error;

/// Errors that can occur while grabbing frames.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No capturable display was found.
    #[error("no display available: {0}")]
    NoDisplay(String),
    /// The capture call itself failed.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// The mock ran out of scripted frames.
    #[error("no frames queued")]
    Exhausted,
}

/// Trait for full-screen capture implementations.
///
/// One call per loop tick; the grabber assigns monotonically increasing
/// sequence numbers to the frames it returns.
pub trait ScreenGrabber {
    /// Captures the full virtual screen as a single frame.
    fn capture(&mut self) -> Result<Frame, CaptureError>;
}

/// Mock screen that replays a scripted sequence of frames.
///
/// The last queued frame repeats forever, which mirrors how a static
/// screen looks to the polling loop. With nothing queued, capture fails
/// with [`CaptureError::Exhausted`].
#[derive(Default)]
pub struct MockScreen {
    frames: Vec<image::RgbaImage>,
    cursor: usize,
    sequence: u64,
}

impl MockScreen {
    /// Creates an empty mock screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a frame buffer to be returned by subsequent captures.
    pub fn push(&mut self, pixels: image::RgbaImage) {
        self.frames.push(pixels);
    }

    /// Builds a mock screen from a list of frame buffers.
    pub fn with_frames(frames: Vec<image::RgbaImage>) -> Self {
        Self {
            frames,
            cursor: 0,
            sequence: 0,
        }
    }
}

impl ScreenGrabber for MockScreen {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        if self.frames.is_empty() {
            return Err(CaptureError::Exhausted);
        }
        let idx = self.cursor.min(self.frames.len() - 1);
        self.cursor += 1;
        self.sequence += 1;
        Ok(Frame::new(self.frames[idx].clone(), self.sequence))
    }
}

/// Real screen grabber backed by the `xcap` crate.
///
/// Captures the primary monitor. Only compiled with the `screen` feature.
#[cfg(feature = "screen")]
pub struct XcapScreen {
    monitor: xcap::Monitor,
    sequence: u64,
}

#[cfg(feature = "screen")]
impl XcapScreen {
    /// Opens the primary monitor for capture.
    pub fn open() -> Result<Self, CaptureError> {
        let monitors =
            xcap::Monitor::all().map_err(|e| CaptureError::NoDisplay(e.to_string()))?;
        let monitor = monitors
            .into_iter()
            .next()
            .ok_or_else(|| CaptureError::NoDisplay("no monitors reported".into()))?;
        Ok(Self {
            monitor,
            sequence: 0,
        })
    }
}

#[cfg(feature = "screen")]
impl ScreenGrabber for XcapScreen {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        let pixels = self
            .monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        self.sequence += 1;
        Ok(Frame::new(pixels, self.sequence))
    }
}
