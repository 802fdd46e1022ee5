//! Symbol and border-link extraction for the duet board.
//!
//! Cells carry one of two glyphs or nothing; the glyph class is decided
//! by convexity (a solid disc reads convex, a crescent does not). Border
//! links reuse the same presence/convexity test on a thin strip
//! straddling each shared edge: a convex glyph is "=" (must match), a
//! non-convex one is "×" (must differ).

use crate::capture::Frame;
use crate::detect::{
    adaptive_threshold, find_blobs, uniform_cells, Blob, Connectivity, DUET_SIDE,
};

/// Adaptive threshold window for glyph binarization.
const GLYPH_WINDOW: usize = 11;
/// Adaptive threshold offset for glyph binarization.
const GLYPH_C: i32 = 2;
/// Components below this pixel count are noise, not glyphs.
const MIN_GLYPH_AREA: usize = 20;
/// Components covering at least this fraction of the cell are the cell
/// frame itself, not a glyph.
const MAX_GLYPH_FRACTION: f64 = 0.9;
/// Fractional margin a glyph must keep from the sample edges.
const EDGE_MARGIN: f64 = 0.1;
/// Minimum solidity for a component to count as convex.
const CONVEX_SOLIDITY: f64 = 0.85;
/// Border strips extend 1/5 of a cell on each side of the shared edge.
const STRIP_DIVISOR: u32 = 5;

/// One cell state on the duet board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Symbol {
    /// Unfilled cell.
    #[default]
    Blank = 0,
    /// The convex glyph.
    Sun = 1,
    /// The non-convex glyph.
    Moon = 2,
}

impl Symbol {
    /// Clicks needed to cycle a blank cell to this symbol.
    #[inline]
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// The other non-blank symbol.
    pub fn other(self) -> Symbol {
        match self {
            Symbol::Sun => Symbol::Moon,
            Symbol::Moon => Symbol::Sun,
            Symbol::Blank => Symbol::Blank,
        }
    }
}

/// Fixed-size 6×6 symbol board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolGrid {
    cells: [[Symbol; DUET_SIDE]; DUET_SIDE],
}

impl SymbolGrid {
    /// An all-blank board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol at a cell.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Symbol {
        self.cells[row][col]
    }

    /// Sets a cell.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, symbol: Symbol) {
        self.cells[row][col] = symbol;
    }

    /// Count of `symbol` in a row.
    pub fn count_in_row(&self, row: usize, symbol: Symbol) -> usize {
        self.cells[row].iter().filter(|&&s| s == symbol).count()
    }

    /// Count of `symbol` in a column.
    pub fn count_in_col(&self, col: usize, symbol: Symbol) -> usize {
        (0..DUET_SIDE)
            .filter(|&row| self.cells[row][col] == symbol)
            .count()
    }

    /// True when no cell is blank.
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&s| s != Symbol::Blank))
    }

    /// Iterates `(row, col, symbol)` row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Symbol)> + '_ {
        (0..DUET_SIDE).flat_map(move |row| {
            (0..DUET_SIDE).map(move |col| (row, col, self.cells[row][col]))
        })
    }
}

/// Link constraint kinds between adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The two cells must hold the same symbol ("=").
    MustMatch,
    /// The two cells must hold different symbols ("×").
    MustDiffer,
}

/// One constraint over an ordered adjacent cell pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConstraint {
    /// First cell `(row, col)`.
    pub a: (usize, usize),
    /// Second cell, the right or down neighbor of `a`.
    pub b: (usize, usize),
    /// Constraint kind.
    pub kind: Link,
}

/// Sparse set of link constraints. Pairs not present are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    links: Vec<LinkConstraint>,
}

impl LinkMap {
    /// An empty link map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint.
    pub fn push(&mut self, constraint: LinkConstraint) {
        self.links.push(constraint);
    }

    /// Iterates all constraints.
    pub fn iter(&self) -> impl Iterator<Item = &LinkConstraint> {
        self.links.iter()
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no pair is constrained.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Outcome of scanning one sample for a glyph.
struct GlyphReading {
    present: bool,
    convex: bool,
}

/// Presence/convexity test shared by cells and border strips.
///
/// Components touching the 10% edge margin or covering most of the
/// sample are ignored; they are grid furniture, not glyphs.
fn read_glyph(sample: &Frame) -> GlyphReading {
    let gray = sample.to_luma();
    let mask = adaptive_threshold(&gray, GLYPH_WINDOW, GLYPH_C);
    let blobs = find_blobs(&mask, Connectivity::Eight);

    let (w, h) = (sample.width() as f64, sample.height() as f64);
    let sample_area = w * h;

    let mut present = false;
    let mut convex = false;
    for blob in &blobs {
        if blob.area < MIN_GLYPH_AREA {
            continue;
        }
        if blob.bbox_area() as f64 >= MAX_GLYPH_FRACTION * sample_area {
            continue;
        }
        let inside = blob.x as f64 > EDGE_MARGIN * w
            && blob.y as f64 > EDGE_MARGIN * h
            && ((blob.x + blob.w) as f64) < (1.0 - EDGE_MARGIN) * w
            && ((blob.y + blob.h) as f64) < (1.0 - EDGE_MARGIN) * h;
        if !inside {
            continue;
        }
        present = true;
        if is_convex(blob) {
            convex = true;
        }
    }
    GlyphReading { present, convex }
}

fn is_convex(blob: &Blob) -> bool {
    blob.solidity() >= CONVEX_SOLIDITY
}

/// Reads the 36 cell symbols from a cropped duet grid.
pub fn classify_symbols(grid: &Frame) -> SymbolGrid {
    let cells = uniform_cells(grid.width(), grid.height(), DUET_SIDE);
    let mut board = SymbolGrid::new();
    for (idx, cell) in cells.iter().enumerate() {
        let sample = grid.crop(cell.x, cell.y, cell.w, cell.h);
        let reading = read_glyph(&sample);
        if reading.present {
            let symbol = if reading.convex {
                Symbol::Sun
            } else {
                Symbol::Moon
            };
            board.set(idx / DUET_SIDE, idx % DUET_SIDE, symbol);
        }
    }
    board
}

/// Reads the border-link constraints from a cropped duet grid.
pub fn classify_links(grid: &Frame) -> LinkMap {
    let cell_w = grid.width() / DUET_SIDE as u32;
    let cell_h = grid.height() / DUET_SIDE as u32;
    let strip_w = cell_w / STRIP_DIVISOR;
    let strip_h = cell_h / STRIP_DIVISOR;
    let mut links = LinkMap::new();

    // Vertical borders: between (row, b-1) and (row, b).
    for b in 1..DUET_SIDE as u32 {
        for row in 0..DUET_SIDE as u32 {
            let x = (b * cell_w).saturating_sub(strip_w);
            let y = (row * cell_h + cell_h / 2).saturating_sub(strip_h);
            let sample = grid.crop(x, y, strip_w * 2, strip_h * 2);
            let reading = read_glyph(&sample);
            if reading.present {
                links.push(LinkConstraint {
                    a: (row as usize, (b - 1) as usize),
                    b: (row as usize, b as usize),
                    kind: link_kind(&reading),
                });
            }
        }
    }

    // Horizontal borders: between (b-1, col) and (b, col).
    for b in 1..DUET_SIDE as u32 {
        for col in 0..DUET_SIDE as u32 {
            let x = (col * cell_w + cell_w / 2).saturating_sub(strip_w);
            let y = (b * cell_h).saturating_sub(strip_h);
            let sample = grid.crop(x, y, strip_w * 2, strip_h * 2);
            let reading = read_glyph(&sample);
            if reading.present {
                links.push(LinkConstraint {
                    a: ((b - 1) as usize, col as usize),
                    b: (b as usize, col as usize),
                    kind: link_kind(&reading),
                });
            }
        }
    }

    links
}

fn link_kind(reading: &GlyphReading) -> Link {
    if reading.convex {
        Link::MustMatch
    } else {
        Link::MustDiffer
    }
}
