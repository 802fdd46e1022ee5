//! Grid Pilot Library
//!
//! Watches a live screen feed for grid-based logic puzzles, reconstructs
//! their logical state from pixels, solves them, and replays the solution
//! as synthetic pointer clicks at the right screen coordinates.
//!
//! # Architecture
//!
//! The system follows an explicit data flow, driven by a polling loop:
//!
//! ```text
//! capture → detect → classify → solve → act
//!    ↑                                    │
//!    └───────── runner (armed/stop) ──────┘
//! ```
//!
//! # Design Principles
//!
//! - **Fail-soft**: a frame that yields no grid, a misread board, or an
//!   unsolvable instance is logged and retried on the next tick; only the
//!   explicit stop signal ends the loop
//! - **Opaque collaborators**: screen capture and pointer injection are
//!   traits with mock implementations; real OS adapters are feature-gated
//! - **Deterministic geometry**: grid detection is a pure function of the
//!   frame and its thresholds
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use grid_pilot::{
//!     act::MockPointer,
//!     capture::{FileConfig, MockScreen},
//!     control::ControlFlags,
//!     runner::{QueensPipeline, Runner},
//! };
//!
//! let config = FileConfig::default();
//! let flags = Arc::new(ControlFlags::new());
//!
//! let pipeline = QueensPipeline::new(&config);
//! let mut runner = Runner::new(
//!     MockScreen::new(),
//!     MockPointer::new(),
//!     Box::new(pipeline),
//!     Arc::clone(&flags),
//!     &config,
//! );
//!
//! flags.set_armed(true);
//! runner.run();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod act;
pub mod capture;
pub mod classify;
pub mod control;
pub mod detect;
pub mod runner;
pub mod solve;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types at crate root
pub use act::{ClickPlan, ClickTarget, MockPointer, PointerInjector, Translator};
pub use capture::{CaptureError, FileConfig, Frame, MockScreen, ScreenGrabber};
pub use classify::{Link, LinkMap, RegionGrid, Symbol, SymbolGrid};
pub use control::{ControlFlags, Signal, SignalListener, SignalSource};
pub use detect::{CellRect, DetectedGrid, GridRegion};
pub use runner::{DuetPipeline, PuzzlePipeline, QueensPipeline, Runner, TickOutcome};
pub use solve::{QueensSolution, Strategy};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
