//! The capture loop.
//!
//! A four-state machine drives every tick:
//!
//! ```text
//! Idle ──toggle──▶ Detecting ──stable──▶ Solving ──solution──▶ Acting
//!  ▲                 │   ▲                  │                    │
//!  │                 └───┴── retry ─────────┘                    │
//!  └───────────────── armed cleared ◀────────────────────────────┘
//! ```
//!
//! Idle: armed is down, frames are still captured but ignored.
//! Detecting: every tick re-runs detection; a hit must repeat at the
//! same screen origin on the next tick before it is trusted (debounce).
//! Solving and Acting happen synchronously inside one tick; a classify
//! or solve failure drops back to Detecting. After acting, the armed
//! flag is cleared and the machine returns to Idle. The stop flag is
//! checked once per tick regardless of state.

mod pipeline;

pub use pipeline::{DuetPipeline, PipelineError, PuzzlePipeline, QueensPipeline};

use crate::act::PointerInjector;
use crate::capture::{FileConfig, ScreenGrabber};
use crate::control::ControlFlags;
use crate::detect::DetectError;
use std::sync::Arc;
use std::time::Duration;

/// What one tick of the loop did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The stop flag was up; the loop must exit.
    Stopped,
    /// Armed is down; the frame was discarded.
    Idle,
    /// The capture service failed this tick.
    CaptureFailed,
    /// Detection found no qualifying grid; still Detecting.
    NotFound(DetectError),
    /// Detection succeeded at a new location; debounce holds.
    Unstable,
    /// Classification or solving failed; back to Detecting.
    Failed(PipelineError),
    /// A solution was clicked in; armed has been cleared.
    Acted {
        /// Total clicks issued.
        clicks: u32,
    },
}

/// Drives capture → detect → classify → solve → act against a pipeline.
pub struct Runner<G, P> {
    grabber: G,
    pointer: P,
    pipeline: Box<dyn PuzzlePipeline>,
    flags: Arc<ControlFlags>,
    poll_interval: Duration,
    /// Origin of the previous tick's detection, for the debounce.
    last_origin: Option<(u32, u32)>,
}

impl<G: ScreenGrabber, P: PointerInjector> Runner<G, P> {
    /// Wires a runner from its collaborators.
    pub fn new(
        grabber: G,
        pointer: P,
        pipeline: Box<dyn PuzzlePipeline>,
        flags: Arc<ControlFlags>,
        config: &FileConfig,
    ) -> Self {
        Self {
            grabber,
            pointer,
            pipeline,
            flags,
            poll_interval: Duration::from_millis(config.capture.poll_ms),
            last_origin: None,
        }
    }

    /// The pointer collaborator, for inspection after a run.
    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// Executes one tick of the state machine.
    ///
    /// Flags are read once at the top; a toggle landing mid-tick takes
    /// effect on the next tick, so an in-flight action sequence always
    /// completes.
    pub fn tick(&mut self) -> TickOutcome {
        if self.flags.stop_requested() {
            return TickOutcome::Stopped;
        }
        let armed = self.flags.armed();

        let frame = match self.grabber.capture() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(%err, "capture failed, skipping tick");
                return TickOutcome::CaptureFailed;
            }
        };

        if !armed {
            self.last_origin = None;
            return TickOutcome::Idle;
        }

        let detected = match self.pipeline.detect(&frame) {
            Ok(detected) => detected,
            Err(err) => {
                tracing::trace!(%err, "no grid this tick");
                self.last_origin = None;
                return TickOutcome::NotFound(err);
            }
        };

        let origin = detected.region.origin();
        if self.last_origin != Some(origin) {
            tracing::debug!(?origin, "grid detected, waiting for a stable repeat");
            self.last_origin = Some(origin);
            return TickOutcome::Unstable;
        }

        match self.pipeline.plan(&frame, &detected) {
            Ok(plan) => {
                tracing::info!(
                    pipeline = self.pipeline.name(),
                    targets = plan.len(),
                    "acting on solution"
                );
                for target in plan.targets() {
                    for _ in 0..target.clicks {
                        self.pointer.click(target.x, target.y);
                    }
                }
                self.flags.set_armed(false);
                self.last_origin = None;
                TickOutcome::Acted {
                    clicks: plan.click_count(),
                }
            }
            Err(err) => {
                tracing::warn!(%err, "instance not solved, still scanning");
                TickOutcome::Failed(err)
            }
        }
    }

    /// Runs ticks until the stop flag rises.
    pub fn run(&mut self) {
        self.run_for(None);
    }

    /// Runs ticks until the stop flag rises or `max_ticks` elapse.
    pub fn run_for(&mut self, max_ticks: Option<u64>) {
        tracing::info!(pipeline = self.pipeline.name(), "capture loop started");
        let mut ticks = 0u64;
        loop {
            if let TickOutcome::Stopped = self.tick() {
                break;
            }
            ticks += 1;
            if max_ticks.is_some_and(|max| ticks >= max) {
                tracing::info!(ticks, "tick limit reached");
                break;
            }
            std::thread::sleep(self.poll_interval);
        }
        tracing::info!("capture loop stopped");
    }
}
