//! Click-plan translation.
//!
//! Maps solved boards to absolute screen coordinates. All captured
//! coordinates are halved first when the capture density is twice the
//! logical display density.

use crate::capture::ActConfig;
use crate::classify::{Symbol, SymbolGrid};
use crate::detect::{CellRect, GridRegion, DUET_SIDE};
use crate::solve::QueensSolution;

/// One click location with a repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTarget {
    /// Absolute screen x.
    pub x: i32,
    /// Absolute screen y.
    pub y: i32,
    /// Number of clicks to issue at this point.
    pub clicks: u32,
}

/// Ordered list of click targets for one solved puzzle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickPlan {
    targets: Vec<ClickTarget>,
}

impl ClickPlan {
    /// The targets in execution order.
    pub fn targets(&self) -> &[ClickTarget] {
        &self.targets
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when nothing needs clicking.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Total clicks across all targets.
    pub fn click_count(&self) -> u32 {
        self.targets.iter().map(|t| t.clicks).sum()
    }
}

/// Builds click plans from solved boards.
#[derive(Debug, Clone)]
pub struct Translator {
    double_click: bool,
    hidpi: bool,
    inset: i32,
}

impl Translator {
    /// Creates a translator from the action configuration.
    pub fn new(config: &ActConfig) -> Self {
        Self {
            double_click: config.double_click,
            hidpi: config.hidpi,
            inset: config.click_inset,
        }
    }

    #[inline]
    fn scale(&self, value: u32) -> i32 {
        if self.hidpi {
            (value / 2) as i32
        } else {
            value as i32
        }
    }

    /// Plan for a solved queens board: one target per row at the chosen
    /// cell's origin plus the configured inset, in row order.
    pub fn queens_plan(
        &self,
        region: &GridRegion,
        cells: &[CellRect],
        solution: &QueensSolution,
    ) -> ClickPlan {
        let side = solution.side();
        let clicks = if self.double_click { 2 } else { 1 };
        let targets = (0..side)
            .map(|row| {
                let cell = &cells[row * side + solution.column(row)];
                ClickTarget {
                    x: self.scale(region.x) + self.scale(cell.x) + self.inset,
                    y: self.scale(region.y) + self.scale(cell.y) + self.inset,
                    clicks,
                }
            })
            .collect();
        ClickPlan { targets }
    }

    /// Plan for a solved duet board: cell centers of the non-given
    /// cells, row-major, with one click per symbol ordinal (blank → sun
    /// → moon cycle).
    pub fn duet_plan(
        &self,
        region: &GridRegion,
        givens: &SymbolGrid,
        solution: &SymbolGrid,
    ) -> ClickPlan {
        let cell_w = self.scale(region.w) / DUET_SIDE as i32;
        let cell_h = self.scale(region.h) / DUET_SIDE as i32;
        let mut targets = Vec::new();
        for (row, col, symbol) in solution.iter() {
            if givens.get(row, col) != Symbol::Blank {
                continue;
            }
            let clicks = symbol.ordinal();
            if clicks == 0 {
                continue;
            }
            targets.push(ClickTarget {
                x: self.scale(region.x) + col as i32 * cell_w + cell_w / 2,
                y: self.scale(region.y) + row as i32 * cell_h + cell_h / 2,
                clicks,
            });
        }
        ClickPlan { targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> GridRegion {
        GridRegion {
            x: 100,
            y: 200,
            w: 360,
            h: 360,
        }
    }

    fn uniform_cells_8(side: usize, cell: u32) -> Vec<CellRect> {
        (0..side * side)
            .map(|i| CellRect {
                x: (i % side) as u32 * cell,
                y: (i / side) as u32 * cell,
                w: cell,
                h: cell,
            })
            .collect()
    }

    #[test]
    fn test_queens_plan_single_click() {
        let config = ActConfig {
            double_click: false,
            hidpi: false,
            click_inset: 10,
        };
        let translator = Translator::new(&config);
        let cells = uniform_cells_8(5, 50);
        let solution = QueensSolution::new(vec![1, 3, 0, 2, 4]);

        let plan = translator.queens_plan(&region(), &cells, &solution);
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.click_count(), 5);
        // Row 0, column 1: 100 + 50 + 10.
        assert_eq!(plan.targets()[0], ClickTarget { x: 160, y: 210, clicks: 1 });
    }

    #[test]
    fn test_queens_plan_double_click_and_hidpi() {
        let config = ActConfig {
            double_click: true,
            hidpi: true,
            click_inset: 10,
        };
        let translator = Translator::new(&config);
        let cells = uniform_cells_8(5, 50);
        let solution = QueensSolution::new(vec![1, 3, 0, 2, 4]);

        let plan = translator.queens_plan(&region(), &cells, &solution);
        assert_eq!(plan.click_count(), 10);
        // Halved offsets: 100/2 + 50/2 + 10.
        assert_eq!(plan.targets()[0], ClickTarget { x: 85, y: 110, clicks: 2 });
    }

    #[test]
    fn test_duet_plan_skips_givens_and_counts_ordinals() {
        let translator = Translator::new(&ActConfig::default());
        let mut givens = SymbolGrid::new();
        givens.set(0, 0, Symbol::Sun);

        let mut solution = SymbolGrid::new();
        for (row, col, _) in SymbolGrid::new().iter() {
            let symbol = if (row + col) % 2 == 0 {
                Symbol::Sun
            } else {
                Symbol::Moon
            };
            solution.set(row, col, symbol);
        }

        let plan = translator.duet_plan(&region(), &givens, &solution);
        // One target per non-given cell.
        assert_eq!(plan.len(), 35);
        // Cell (0,1) is a moon: two clicks at its center (60px cells).
        assert_eq!(
            plan.targets()[0],
            ClickTarget {
                x: 100 + 60 + 30,
                y: 200 + 30,
                clicks: 2
            }
        );
    }
}
