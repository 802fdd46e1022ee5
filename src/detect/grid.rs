//! Grid boundary and cell geometry.
//!
//! Locates the puzzle's outer bounding box within a full-screen frame and
//! segments the cropped grid into per-cell rectangles. Detection either
//! returns complete geometry or an explicit error; there is no partial
//! result. Everything here is a pure function of the frame and the
//! thresholds below.

use super::binarize::{adaptive_threshold, box_blur, dilate, sobel_edges, threshold_ink};
use super::blob::{find_blobs, Blob, Connectivity};
use crate::capture::Frame;
use thiserror::Error;

/// Sobel magnitude above which a pixel counts as an edge.
pub const EDGE_THRESHOLD: u32 = 40;
/// Box blur radius applied before edge extraction (5×5 kernel).
pub const BLUR_RADIUS: usize = 2;
/// Maximum luma for a pixel to count as grid-line ink.
pub const INK_LUMA_MAX: u8 = 10;
/// Minimum pixel area for a cell-interior candidate.
pub const MIN_CELL_AREA: usize = 100;
/// Allowed relative deviation from the median cell area.
pub const MEDIAN_AREA_TOLERANCE: f64 = 0.2;
/// Cell bounding boxes must be square within this aspect band.
pub const ASPECT_BAND: (f64, f64) = (0.9, 1.1);
/// Rectangles closer than this on every edge are duplicates.
pub const DEDUPE_TOLERANCE: i64 = 10;
/// Cell origins snap to shared offsets within this distance.
pub const SNAP_TOLERANCE: i64 = 10;
/// Smallest supported queens board.
pub const MIN_QUEENS_SIDE: usize = 5;
/// Fixed side length of the duet board.
pub const DUET_SIDE: usize = 6;
/// Width/height mismatch tolerance for the duet boundary.
pub const DUET_SQUARENESS_TOLERANCE: i64 = 50;
/// Minimum bounding-box area for the duet boundary.
pub const DUET_MIN_AREA: u64 = 100_000;
/// Adaptive threshold window side length.
pub const ADAPTIVE_WINDOW: usize = 11;
/// Adaptive threshold mean offset.
pub const ADAPTIVE_C: i32 = 2;

/// Axis-aligned bounding box of the puzzle within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRegion {
    /// Left edge in frame coordinates.
    pub x: u32,
    /// Top edge in frame coordinates.
    pub y: u32,
    /// Region width.
    pub w: u32,
    /// Region height.
    pub h: u32,
}

impl GridRegion {
    /// Top-left corner, the debounce comparison key.
    #[inline]
    pub fn origin(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

/// Axis-aligned bounding box of one cell, relative to the grid region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge in grid coordinates.
    pub x: u32,
    /// Top edge in grid coordinates.
    pub y: u32,
    /// Cell width.
    pub w: u32,
    /// Cell height.
    pub h: u32,
}

/// Complete grid geometry for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedGrid {
    /// Outer boundary in frame coordinates.
    pub region: GridRegion,
    /// Cell rectangles in row-major order, grid-relative.
    pub cells: Vec<CellRect>,
    /// Board side length (cells per row).
    pub side: usize,
}

/// Reasons the detector reports "no grid found".
#[derive(Debug, Clone, Error)]
pub enum DetectError {
    /// No qualifying outer boundary in the frame.
    #[error("no grid boundary found")]
    NoBoundary,
    /// A boundary existed but failed the squareness or size floor.
    #[error("boundary rejected: {0}")]
    BoundaryRejected(String),
    /// Cell segmentation produced an unusable count.
    #[error("cell count {found} is not a supported grid")]
    CellCount {
        /// Number of surviving cell candidates.
        found: usize,
    },
    /// The board side is below the supported minimum.
    #[error("grid side {side} below minimum {MIN_QUEENS_SIDE}")]
    GridTooSmall {
        /// Detected side length.
        side: usize,
    },
    /// Snapped cells do not share one origin set per axis.
    #[error("cells do not align to a common lattice")]
    MisalignedCells,
}

/// Finds the queens puzzle boundary: the largest edge component.
pub fn detect_queens_region(frame: &Frame) -> Result<GridRegion, DetectError> {
    let gray = box_blur(&frame.to_luma(), BLUR_RADIUS);
    let edges = sobel_edges(&gray, EDGE_THRESHOLD);
    let blobs = find_blobs(&edges, Connectivity::Eight);

    let largest = blobs
        .into_iter()
        .max_by_key(Blob::bbox_area)
        .ok_or(DetectError::NoBoundary)?;

    tracing::debug!(
        x = largest.x,
        y = largest.y,
        w = largest.w,
        h = largest.h,
        "queens boundary candidate"
    );

    Ok(GridRegion {
        x: largest.x,
        y: largest.y,
        w: largest.w,
        h: largest.h,
    })
}

/// Finds the duet puzzle boundary: the largest near-square component of
/// the adaptive-threshold mask, subject to a minimum-area floor.
pub fn detect_duet_region(frame: &Frame) -> Result<GridRegion, DetectError> {
    let gray = box_blur(&frame.to_luma(), BLUR_RADIUS);
    let mask = dilate(&adaptive_threshold(&gray, ADAPTIVE_WINDOW, ADAPTIVE_C));
    let mut blobs = find_blobs(&mask, Connectivity::Eight);
    if blobs.is_empty() {
        return Err(DetectError::NoBoundary);
    }
    blobs.sort_by_key(|b| std::cmp::Reverse(b.bbox_area()));

    let candidate = blobs
        .iter()
        .find(|b| (b.w as i64 - b.h as i64).abs() < DUET_SQUARENESS_TOLERANCE)
        .ok_or(DetectError::NoBoundary)?;

    if candidate.bbox_area() < DUET_MIN_AREA {
        return Err(DetectError::BoundaryRejected(format!(
            "area {} below floor {}",
            candidate.bbox_area(),
            DUET_MIN_AREA
        )));
    }

    Ok(GridRegion {
        x: candidate.x,
        y: candidate.y,
        w: candidate.w,
        h: candidate.h,
    })
}

/// Segments a cropped queens grid into snapped, row-major cell rectangles.
///
/// Cell interiors are the light (non-ink) components enclosed by the grid
/// lines. Candidates are filtered by squareness and by closeness to the
/// median area, deduplicated, and snapped to the shared lattice offsets.
/// The survivor count must be a perfect square N² with N ≥ 5.
pub fn extract_queens_cells(grid: &Frame) -> Result<(Vec<CellRect>, usize), DetectError> {
    let gray = grid.to_luma();
    let light = threshold_ink(&gray, INK_LUMA_MAX).invert();
    let blobs = find_blobs(&light, Connectivity::Four);

    let mut rects: Vec<CellRect> = blobs
        .iter()
        .filter(|b| !b.touches_border)
        .filter(|b| b.area > MIN_CELL_AREA)
        .filter(|b| {
            let aspect = b.aspect_ratio();
            aspect >= ASPECT_BAND.0 && aspect <= ASPECT_BAND.1
        })
        .map(|b| CellRect {
            x: b.x,
            y: b.y,
            w: b.w,
            h: b.h,
        })
        .collect();

    rects = filter_by_median_area(rects);
    rects = dedupe_rects(rects);
    let rects = snap_rects(rects);

    let count = rects.len();
    let side = (count as f64).sqrt().round() as usize;
    if side * side != count || count == 0 {
        return Err(DetectError::CellCount { found: count });
    }
    if side < MIN_QUEENS_SIDE {
        return Err(DetectError::GridTooSmall { side });
    }

    let distinct_x = distinct_count(rects.iter().map(|r| r.x));
    let distinct_y = distinct_count(rects.iter().map(|r| r.y));
    if distinct_x != side || distinct_y != side {
        return Err(DetectError::MisalignedCells);
    }

    let mut sorted = rects;
    sorted.sort_by_key(|r| (r.y, r.x));
    Ok((sorted, side))
}

/// Splits a region of the given size into uniform duet cells, row-major.
///
/// Integer division matches the click-coordinate math; trailing remainder
/// pixels are left to the outer border.
pub fn uniform_cells(region_w: u32, region_h: u32, side: usize) -> Vec<CellRect> {
    let cell_w = region_w / side as u32;
    let cell_h = region_h / side as u32;
    let mut cells = Vec::with_capacity(side * side);
    for row in 0..side as u32 {
        for col in 0..side as u32 {
            cells.push(CellRect {
                x: col * cell_w,
                y: row * cell_h,
                w: cell_w,
                h: cell_h,
            });
        }
    }
    cells
}

fn filter_by_median_area(rects: Vec<CellRect>) -> Vec<CellRect> {
    if rects.is_empty() {
        return rects;
    }
    let mut areas: Vec<u64> = rects.iter().map(|r| r.w as u64 * r.h as u64).collect();
    areas.sort_unstable();
    let median = areas[areas.len() / 2] as f64;

    rects
        .into_iter()
        .filter(|r| {
            let area = (r.w as u64 * r.h as u64) as f64;
            (area - median).abs() / median <= MEDIAN_AREA_TOLERANCE
        })
        .collect()
}

fn is_duplicate(a: &CellRect, b: &CellRect) -> bool {
    (a.x as i64 - b.x as i64).abs() <= DEDUPE_TOLERANCE
        && (a.y as i64 - b.y as i64).abs() <= DEDUPE_TOLERANCE
        && (a.w as i64 - b.w as i64).abs() <= DEDUPE_TOLERANCE
        && (a.h as i64 - b.h as i64).abs() <= DEDUPE_TOLERANCE
}

fn dedupe_rects(rects: Vec<CellRect>) -> Vec<CellRect> {
    let mut kept: Vec<CellRect> = Vec::with_capacity(rects.len());
    for rect in rects {
        if !kept.iter().any(|k| is_duplicate(k, &rect)) {
            kept.push(rect);
        }
    }
    kept
}

/// Clusters a coordinate list into shared offsets and returns the
/// median of each cluster.
fn cluster_offsets(mut values: Vec<u32>) -> Vec<u32> {
    values.sort_unstable();
    let mut clusters = Vec::new();
    let mut start = 0;
    for i in 1..=values.len() {
        if i == values.len() || values[i] as i64 - values[start] as i64 > SNAP_TOLERANCE {
            let group = &values[start..i];
            clusters.push(group[group.len() / 2]);
            start = i;
        }
    }
    clusters
}

/// Snaps each rectangle origin to the nearest shared x/y offset.
///
/// Anti-aliasing jitters detected origins by a pixel or two; snapping
/// restores the common lattice the cells actually sit on.
fn snap_rects(rects: Vec<CellRect>) -> Vec<CellRect> {
    if rects.is_empty() {
        return rects;
    }
    let xs = cluster_offsets(rects.iter().map(|r| r.x).collect());
    let ys = cluster_offsets(rects.iter().map(|r| r.y).collect());

    let nearest = |value: u32, offsets: &[u32]| -> u32 {
        *offsets
            .iter()
            .min_by_key(|&&o| (o as i64 - value as i64).abs())
            .unwrap_or(&value)
    };

    rects
        .into_iter()
        .map(|r| CellRect {
            x: nearest(r.x, &xs),
            y: nearest(r.y, &ys),
            w: r.w,
            h: r.h,
        })
        .collect()
}

fn distinct_count(values: impl Iterator<Item = u32>) -> usize {
    let mut v: Vec<u32> = values.collect();
    v.sort_unstable();
    v.dedup();
    v.len()
}
