//! Per-variant puzzle pipelines.
//!
//! A pipeline bundles the variant-specific stages (boundary detection,
//! classification, solving, click translation) behind one seam so the
//! capture loop stays variant-agnostic.

use crate::act::{ClickPlan, Translator};
use crate::capture::{FileConfig, Frame};
use crate::classify::{classify_links, classify_regions, classify_symbols, ClassifyError};
use crate::detect::{
    detect_duet_region, detect_queens_region, extract_queens_cells, uniform_cells, DetectError,
    DetectedGrid, DUET_SIDE,
};
use crate::solve::{
    CorpusStore, DuetCorpusScan, DuetInstance, QueensCorpusScan, SolveError, Strategy,
};
use thiserror::Error;

/// Anything that can go wrong between a stable detection and a click
/// plan. Every variant is recoverable: the loop logs it and keeps
/// scanning.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Geometry was lost between detection and planning.
    #[error(transparent)]
    Detect(#[from] DetectError),
    /// The grid could not be labeled.
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    /// No valid assignment exists, or the corpus is unavailable.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// One puzzle family's detect/classify/solve/translate bundle.
pub trait PuzzlePipeline {
    /// Human-readable family name, for logs.
    fn name(&self) -> &'static str;

    /// Locates the puzzle geometry in a full-screen frame.
    fn detect(&self, frame: &Frame) -> Result<DetectedGrid, DetectError>;

    /// Classifies and solves a detected grid, returning the click plan.
    fn plan(&mut self, frame: &Frame, grid: &DetectedGrid) -> Result<ClickPlan, PipelineError>;
}

/// Pipeline for the region-colored queens variant.
pub struct QueensPipeline {
    strategy: QueensCorpusScan,
    translator: Translator,
}

impl QueensPipeline {
    /// Builds the pipeline from configuration.
    pub fn new(config: &FileConfig) -> Self {
        Self {
            strategy: QueensCorpusScan::new(CorpusStore::new(config.corpus.dir.clone())),
            translator: Translator::new(&config.act),
        }
    }
}

impl PuzzlePipeline for QueensPipeline {
    fn name(&self) -> &'static str {
        "queens"
    }

    fn detect(&self, frame: &Frame) -> Result<DetectedGrid, DetectError> {
        let region = detect_queens_region(frame)?;
        let grid_img = frame.crop(region.x, region.y, region.w, region.h);
        let (cells, side) = extract_queens_cells(&grid_img)?;
        Ok(DetectedGrid {
            region,
            cells,
            side,
        })
    }

    fn plan(&mut self, frame: &Frame, grid: &DetectedGrid) -> Result<ClickPlan, PipelineError> {
        let region = &grid.region;
        let grid_img = frame.crop(region.x, region.y, region.w, region.h);
        let regions = classify_regions(&grid_img, &grid.cells, grid.side)?;
        let solution = self.strategy.solve(&regions)?;
        tracing::info!(side = grid.side, "queens instance solved");
        Ok(self.translator.queens_plan(region, &grid.cells, &solution))
    }
}

/// Pipeline for the linked binary-symbol variant.
pub struct DuetPipeline {
    strategy: DuetCorpusScan,
    translator: Translator,
}

impl DuetPipeline {
    /// Builds the pipeline from configuration.
    pub fn new(config: &FileConfig) -> Self {
        Self {
            strategy: DuetCorpusScan::new(CorpusStore::new(config.corpus.dir.clone())),
            translator: Translator::new(&config.act),
        }
    }
}

impl PuzzlePipeline for DuetPipeline {
    fn name(&self) -> &'static str {
        "duet"
    }

    fn detect(&self, frame: &Frame) -> Result<DetectedGrid, DetectError> {
        let region = detect_duet_region(frame)?;
        let cells = uniform_cells(region.w, region.h, DUET_SIDE);
        Ok(DetectedGrid {
            region,
            cells,
            side: DUET_SIDE,
        })
    }

    fn plan(&mut self, frame: &Frame, grid: &DetectedGrid) -> Result<ClickPlan, PipelineError> {
        let region = &grid.region;
        let grid_img = frame.crop(region.x, region.y, region.w, region.h);
        let givens = classify_symbols(&grid_img);
        let links = classify_links(&grid_img);
        tracing::debug!(links = links.len(), "duet instance classified");

        let instance = DuetInstance { givens, links };
        let solution = self.strategy.solve(&instance)?;
        tracing::info!("duet instance solved");
        Ok(self
            .translator
            .duet_plan(region, &instance.givens, &solution))
    }
}
