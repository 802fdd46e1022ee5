//! Grid geometry detection.
//!
//! This module turns a raw frame into discrete geometry: the puzzle's
//! outer bounding box and the per-cell rectangles inside it. It either
//! returns a complete result or an explicit "not found" error, never a
//! partial one. Detection is deterministic given the same frame.

mod binarize;
mod blob;
mod grid;

pub use binarize::{adaptive_threshold, box_blur, dilate, sobel_edges, threshold_ink, Mask};
pub use blob::{convex_hull, find_blobs, hull_area, Blob, Connectivity};
pub use grid::{
    detect_duet_region, detect_queens_region, extract_queens_cells, uniform_cells, CellRect,
    DetectError, DetectedGrid, GridRegion, DUET_SIDE, MIN_QUEENS_SIDE,
};
