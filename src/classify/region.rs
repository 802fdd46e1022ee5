//! Region id extraction via mean-color clustering.
//!
//! Each cell's center window is averaged and greedily clustered against
//! the colors seen so far. The tolerance is near-exact: the puzzles this
//! targets use solid fills, so two cells of one region differ only by
//! compression noise.

use crate::capture::Frame;
use crate::detect::CellRect;
use thiserror::Error;

/// Fractional inset from each cell edge before sampling, to stay clear
/// of grid-line pixels.
pub const SAMPLE_MARGIN: f64 = 0.4;
/// Maximum Euclidean RGB distance for two mean colors to share a region.
pub const CLUSTER_EPSILON: f64 = 2.0;

/// N×N map from cell to region id.
///
/// Ids are assigned in order of first appearance, row-major, and are
/// bijective with `0..side` for a valid board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGrid {
    side: usize,
    ids: Vec<u8>,
}

impl RegionGrid {
    /// Builds a region grid from row-major ids.
    ///
    /// `ids.len()` must equal `side * side`.
    pub fn from_ids(side: usize, ids: Vec<u8>) -> Self {
        assert_eq!(ids.len(), side * side);
        Self { side, ids }
    }

    /// Board side length.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Region id at a cell.
    #[inline]
    pub fn id(&self, row: usize, col: usize) -> u8 {
        self.ids[row * self.side + col]
    }

    /// Number of distinct region ids present.
    pub fn distinct_ids(&self) -> usize {
        let mut seen = [false; 256];
        let mut count = 0;
        for &id in &self.ids {
            if !seen[id as usize] {
                seen[id as usize] = true;
                count += 1;
            }
        }
        count
    }
}

/// Classification failures.
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    /// The clustered color count does not match the board side.
    #[error("found {found} regions on a side-{expected} board")]
    RegionCount {
        /// Expected region count (the board side).
        expected: usize,
        /// Distinct colors actually found.
        found: usize,
    },
}

/// Mean RGB over the inset center window of a cell.
fn mean_center_color(grid: &Frame, cell: &CellRect) -> [f64; 3] {
    let x0 = cell.x + (SAMPLE_MARGIN * cell.w as f64) as u32;
    let x1 = cell.x + ((1.0 - SAMPLE_MARGIN) * cell.w as f64) as u32;
    let y0 = cell.y + (SAMPLE_MARGIN * cell.h as f64) as u32;
    let y1 = cell.y + ((1.0 - SAMPLE_MARGIN) * cell.h as f64) as u32;

    let pixels = grid.pixels();
    let mut sum = [0.0f64; 3];
    let mut count = 0u64;
    for y in y0..y1.max(y0 + 1) {
        for x in x0..x1.max(x0 + 1) {
            if x >= pixels.width() || y >= pixels.height() {
                continue;
            }
            let p = pixels.get_pixel(x, y);
            sum[0] += p[0] as f64;
            sum[1] += p[1] as f64;
            sum[2] += p[2] as f64;
            count += 1;
        }
    }
    if count == 0 {
        return [0.0; 3];
    }
    [
        sum[0] / count as f64,
        sum[1] / count as f64,
        sum[2] / count as f64,
    ]
}

fn color_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Clusters cell colors into region ids.
///
/// Cells must be in row-major order. Fails if the number of distinct
/// clusters does not equal the board side.
pub fn classify_regions(
    grid: &Frame,
    cells: &[CellRect],
    side: usize,
) -> Result<RegionGrid, ClassifyError> {
    let mut references: Vec<[f64; 3]> = Vec::new();
    let mut ids = Vec::with_capacity(cells.len());

    for cell in cells {
        let color = mean_center_color(grid, cell);
        let id = references
            .iter()
            .position(|r| color_distance(r, &color) < CLUSTER_EPSILON);
        match id {
            Some(idx) => ids.push(idx as u8),
            None => {
                references.push(color);
                ids.push((references.len() - 1) as u8);
            }
        }
    }

    if references.len() != side {
        tracing::debug!(
            expected = side,
            found = references.len(),
            "region color count mismatch"
        );
        return Err(ClassifyError::RegionCount {
            expected: side,
            found: references.len(),
        });
    }

    Ok(RegionGrid::from_ids(side, ids))
}
