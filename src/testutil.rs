//! Synthetic board renderers shared by the unit tests.
//!
//! These draw the same visual vocabulary the detector is tuned for:
//! near-black lattice lines on a light page, solid region fills, a
//! convex disc and a crescent for the two duet symbols, and "=" / "×"
//! badges on shared borders.

use crate::classify::{Link, LinkMap, RegionGrid, Symbol, SymbolGrid};
use crate::detect::DUET_SIDE;
use crate::solve::{enumerate_queens, QueensSolution};
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LINE_W: u32 = 2;

/// Solid fills with luma well above the ink threshold and pairwise RGB
/// distances far beyond the clustering epsilon.
const PALETTE: [[u8; 3]; 12] = [
    [204, 68, 68],
    [68, 204, 68],
    [68, 68, 204],
    [204, 204, 68],
    [204, 68, 204],
    [68, 204, 204],
    [230, 140, 60],
    [140, 60, 230],
    [60, 140, 100],
    [180, 120, 120],
    [120, 180, 60],
    [90, 90, 160],
];

/// A uniformly white frame buffer.
pub(crate) fn blank_canvas(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, WHITE)
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Filled dark disc.
pub(crate) fn draw_disc(img: &mut RgbaImage, cx: u32, cy: u32, r: u32) {
    paint_disc(img, cx, cy, r, INK);
}

fn paint_disc(img: &mut RgbaImage, cx: u32, cy: u32, r: u32, color: Rgba<u8>) {
    let r = r as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Crescent: a disc with an offset bite taken out of its right side.
pub(crate) fn draw_crescent(img: &mut RgbaImage, cx: u32, cy: u32, r: u32) {
    paint_disc(img, cx, cy, r, INK);
    paint_disc(img, cx + r / 2 + 1, cy, r, WHITE);
}

/// Equality badge: two short horizontal bars.
pub(crate) fn draw_equals(img: &mut RgbaImage, cx: u32, cy: u32, half: u32) {
    fill_rect(img, cx - half, cy - 5, half * 2, 3, INK);
    fill_rect(img, cx - half, cy + 3, half * 2, 3, INK);
}

/// Difference badge: an "×" of two diagonal strokes.
pub(crate) fn draw_cross(img: &mut RgbaImage, cx: u32, cy: u32, half: u32) {
    let half = half as i64;
    for t in -half..=half {
        for (dx, dy) in [(t, t), (t, -t)] {
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            // 2px stroke thickness.
            for (ox, oy) in [(0, 0), (1, 0), (0, 1)] {
                let (px, py) = (x + ox, y + oy);
                if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height()
                {
                    img.put_pixel(px as u32, py as u32, INK);
                }
            }
        }
    }
}

/// Draws an N×N lattice of ink lines with the given cell pitch; returns
/// nothing, the caller fills the interiors.
fn draw_lattice(img: &mut RgbaImage, ox: u32, oy: u32, side: u32, cell: u32) {
    let extent = side * cell + LINE_W;
    for c in 0..=side {
        fill_rect(img, ox + c * cell, oy, LINE_W, extent, INK);
        fill_rect(img, ox, oy + c * cell, extent, LINE_W, INK);
    }
}

/// Region layout around a placement's marked cells: every cell joins the
/// region of the nearest marked cell, so the generating placement stays
/// valid while most others collide on a region.
pub(crate) fn voronoi_regions(solution: &QueensSolution) -> RegionGrid {
    let side = solution.side();
    let mut ids = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let nearest = (0..side)
                .min_by_key(|&i| {
                    let dr = row.abs_diff(i);
                    let dc = col.abs_diff(solution.column(i));
                    dr * dr + dc * dc
                })
                .unwrap();
            ids.push(nearest as u8);
        }
    }
    RegionGrid::from_ids(side, ids)
}

/// Region layout where every row is one region: any placement trivially
/// satisfies region distinctness.
pub(crate) fn row_regions(side: usize) -> RegionGrid {
    let ids = (0..side * side).map(|i| (i / side) as u8).collect();
    RegionGrid::from_ids(side, ids)
}

/// Geometry of a rendered queens board.
pub(crate) struct QueensLayout {
    pub origin_x: u32,
    pub origin_y: u32,
    pub cell_px: u32,
    pub regions: RegionGrid,
    pub solution: QueensSolution,
}

impl QueensLayout {
    /// Interior bounds of a cell in frame coordinates: `(x0, y0, x1, y1)`.
    pub fn cell_bounds(&self, row: usize, col: usize) -> (u32, u32, u32, u32) {
        let x0 = self.origin_x + col as u32 * self.cell_px + LINE_W;
        let y0 = self.origin_y + row as u32 * self.cell_px + LINE_W;
        (
            x0,
            y0,
            self.origin_x + (col as u32 + 1) * self.cell_px,
            self.origin_y + (row as u32 + 1) * self.cell_px,
        )
    }
}

/// Renders a solvable queens board: the first enumerated placement for
/// this side, wrapped in a Voronoi region layout.
pub(crate) fn queens_fixture(side: usize) -> (RgbaImage, QueensLayout) {
    let solution = enumerate_queens(side)
        .into_iter()
        .next()
        .expect("side has structurally valid placements");
    let regions = voronoi_regions(&solution);

    let cell = 50u32;
    let (ox, oy) = (40u32, 60u32);
    let extent = side as u32 * cell + LINE_W;
    let mut img = blank_canvas(ox + extent + 40, oy + extent + 40);

    draw_lattice(&mut img, ox, oy, side as u32, cell);
    for row in 0..side {
        for col in 0..side {
            let fill = PALETTE[regions.id(row, col) as usize % PALETTE.len()];
            fill_rect(
                &mut img,
                ox + col as u32 * cell + LINE_W,
                oy + row as u32 * cell + LINE_W,
                cell - LINE_W,
                cell - LINE_W,
                Rgba([fill[0], fill[1], fill[2], 255]),
            );
        }
    }

    (
        img,
        QueensLayout {
            origin_x: ox,
            origin_y: oy,
            cell_px: cell,
            regions,
            solution,
        },
    )
}

/// Geometry of a rendered duet board.
pub(crate) struct DuetLayout {
    pub origin_x: u32,
    pub origin_y: u32,
    pub cell_px: u32,
}

impl DuetLayout {
    /// Outer bounds of the board in frame coordinates, with a little
    /// slack for the detector's edge bands: `(x0, y0, x1, y1)`.
    pub fn board_bounds(&self) -> (u32, u32, u32, u32) {
        let extent = DUET_SIDE as u32 * self.cell_px + LINE_W;
        (
            self.origin_x.saturating_sub(4),
            self.origin_y.saturating_sub(4),
            self.origin_x + extent + 4,
            self.origin_y + extent + 4,
        )
    }
}

/// Renders a 6×6 duet board with the given pre-filled symbols and link
/// badges. Cells are 70px so the board clears the detector's area floor
/// and the border badges sit well inside the classifier's sample strips.
pub(crate) fn duet_fixture(givens: &SymbolGrid, links: &LinkMap) -> (RgbaImage, DuetLayout) {
    let cell = 70u32;
    let (ox, oy) = (50u32, 50u32);
    let extent = DUET_SIDE as u32 * cell + LINE_W;
    let mut img = blank_canvas(ox + extent + 50, oy + extent + 50);

    draw_lattice(&mut img, ox, oy, DUET_SIDE as u32, cell);

    for (row, col, symbol) in givens.iter() {
        let cx = ox + col as u32 * cell + cell / 2;
        let cy = oy + row as u32 * cell + cell / 2;
        match symbol {
            Symbol::Blank => {}
            Symbol::Sun => draw_disc(&mut img, cx, cy, 14),
            Symbol::Moon => draw_crescent(&mut img, cx, cy, 14),
        }
    }

    for constraint in links.iter() {
        let (ar, ac) = constraint.a;
        let (br, bc) = constraint.b;
        let (cx, cy) = if ar == br {
            // Horizontal neighbors share a vertical border.
            (
                ox + bc as u32 * cell + LINE_W / 2,
                oy + ar as u32 * cell + cell / 2,
            )
        } else {
            (
                ox + ac as u32 * cell + cell / 2,
                oy + br as u32 * cell + LINE_W / 2,
            )
        };
        // White badge detaches the glyph from the lattice line.
        fill_rect(&mut img, cx - 14, cy - 14, 28, 28, WHITE);
        match constraint.kind {
            Link::MustMatch => draw_equals(&mut img, cx, cy, 6),
            Link::MustDiffer => draw_cross(&mut img, cx, cy, 5),
        }
    }

    (
        img,
        DuetLayout {
            origin_x: ox,
            origin_y: oy,
            cell_px: cell,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queens_fixture_regions_are_bijective() {
        let (_, layout) = queens_fixture(8);
        assert_eq!(layout.regions.distinct_ids(), 8);
        assert!(crate::solve::is_valid_placement(layout.solution.columns()));
        assert!(crate::solve::respects_regions(
            &layout.solution,
            &layout.regions
        ));
    }

    #[test]
    fn test_duet_fixture_size_clears_area_floor() {
        let (img, layout) = duet_fixture(&SymbolGrid::new(), &LinkMap::new());
        let extent = DUET_SIDE as u32 * layout.cell_px + LINE_W;
        assert!(extent as u64 * extent as u64 >= 100_000);
        assert!(img.width() > extent && img.height() > extent);
    }
}
