//! Duet-variant solving.
//!
//! The corpus is the exhaustive set of structurally valid boards:
//! balanced rows and columns, no run of three equal symbols. It is
//! generated once by column-major backtracking and cached to disk; a
//! specific instance is then solved by scanning for the first cached
//! board consistent with its pre-filled cells and link constraints.

use super::corpus::CorpusStore;
use super::{SolveError, Strategy};
use crate::classify::{Link, LinkMap, Symbol, SymbolGrid};
use crate::detect::DUET_SIDE;

/// Per-symbol cap for one row or column.
const BALANCE_CAP: usize = DUET_SIDE / 2;

/// One concrete puzzle to solve: fixed cells plus link constraints.
#[derive(Debug, Clone, Default)]
pub struct DuetInstance {
    /// Pre-filled symbols; blank cells are free.
    pub givens: SymbolGrid,
    /// Constraints between adjacent cells.
    pub links: LinkMap,
}

/// True when a candidate board is consistent with the instance.
pub fn matches_instance(candidate: &SymbolGrid, instance: &DuetInstance) -> bool {
    for (row, col, given) in instance.givens.iter() {
        if given != Symbol::Blank && candidate.get(row, col) != given {
            return false;
        }
    }
    for link in instance.links.iter() {
        let a = candidate.get(link.a.0, link.a.1);
        let b = candidate.get(link.b.0, link.b.1);
        let satisfied = match link.kind {
            Link::MustMatch => a == b,
            Link::MustDiffer => a != b,
        };
        if !satisfied {
            return false;
        }
    }
    true
}

/// Legality of placing `symbol` at `(row, col)` given the column-major
/// fill order: all earlier columns full, rows above filled in this
/// column.
///
/// Checks the per-symbol row/column caps and the run-of-three windows
/// ending at the placed cell. Later cells are blank, so these local
/// windows are the only complete ones.
fn placement_legal(grid: &SymbolGrid, row: usize, col: usize, symbol: Symbol) -> bool {
    if grid.count_in_row(row, symbol) >= BALANCE_CAP {
        return false;
    }
    if grid.count_in_col(col, symbol) >= BALANCE_CAP {
        return false;
    }
    if col >= 2
        && grid.get(row, col - 1) == symbol
        && grid.get(row, col - 2) == symbol
    {
        return false;
    }
    if row >= 2
        && grid.get(row - 1, col) == symbol
        && grid.get(row - 2, col) == symbol
    {
        return false;
    }
    true
}

/// True when every row and column holds exactly half of each symbol.
fn exactly_balanced(grid: &SymbolGrid) -> bool {
    (0..DUET_SIDE).all(|i| {
        grid.count_in_row(i, Symbol::Sun) == BALANCE_CAP
            && grid.count_in_row(i, Symbol::Moon) == BALANCE_CAP
            && grid.count_in_col(i, Symbol::Sun) == BALANCE_CAP
            && grid.count_in_col(i, Symbol::Moon) == BALANCE_CAP
    })
}

/// Enumerates every structurally valid board.
///
/// Column-major backtracking with the local pruning above; a final
/// exact-balance check gates admission, since the per-step cap alone
/// does not prove a finished board balanced.
pub fn enumerate_duet_grids() -> Vec<SymbolGrid> {
    let mut grid = SymbolGrid::new();
    let mut out = Vec::new();
    enumerate_rec(&mut grid, 0, 0, &mut out);
    out
}

fn enumerate_rec(grid: &mut SymbolGrid, col: usize, row: usize, out: &mut Vec<SymbolGrid>) {
    if col == DUET_SIDE {
        if exactly_balanced(grid) {
            out.push(*grid);
        }
        return;
    }
    if row == DUET_SIDE {
        enumerate_rec(grid, col + 1, 0, out);
        return;
    }
    for symbol in [Symbol::Sun, Symbol::Moon] {
        if placement_legal(grid, row, col, symbol) {
            grid.set(row, col, symbol);
            enumerate_rec(grid, col, row + 1, out);
            grid.set(row, col, Symbol::Blank);
        }
    }
}

/// Corpus-scan strategy: load-or-generate the enumeration, then return
/// the first cached board consistent with the instance.
pub struct DuetCorpusScan {
    store: CorpusStore,
    corpus: Option<Vec<SymbolGrid>>,
}

impl DuetCorpusScan {
    /// Creates a scanner over the given corpus store.
    pub fn new(store: CorpusStore) -> Self {
        Self {
            store,
            corpus: None,
        }
    }

    fn corpus(&mut self) -> &[SymbolGrid] {
        if self.corpus.is_none() {
            let grids = match self.store.load_duet() {
                Ok(grids) => {
                    tracing::info!(candidates = grids.len(), "duet corpus loaded");
                    grids
                }
                Err(err) => {
                    tracing::info!(%err, "duet corpus unavailable, generating");
                    let grids = enumerate_duet_grids();
                    if let Err(save_err) = self.store.save_duet(&grids) {
                        tracing::warn!(%save_err, "failed to cache duet corpus");
                    }
                    tracing::info!(candidates = grids.len(), "duet corpus generated");
                    grids
                }
            };
            self.corpus = Some(grids);
        }
        self.corpus.as_deref().unwrap_or(&[])
    }
}

impl Strategy for DuetCorpusScan {
    type Instance = DuetInstance;
    type Solution = SymbolGrid;

    fn solve(&mut self, instance: &DuetInstance) -> Result<SymbolGrid, SolveError> {
        self.corpus()
            .iter()
            .find(|candidate| matches_instance(candidate, instance))
            .copied()
            .ok_or(SolveError::Unsolvable)
    }
}

/// Direct backtracking strategy: searches with the instance's givens and
/// links folded into the pruning, no corpus required.
#[derive(Debug, Default)]
pub struct DuetBacktracking;

impl DuetBacktracking {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }

    fn search(instance: &DuetInstance, grid: &mut SymbolGrid, col: usize, row: usize) -> bool {
        if col == DUET_SIDE {
            return exactly_balanced(grid);
        }
        if row == DUET_SIDE {
            return Self::search(instance, grid, col + 1, 0);
        }

        let given = instance.givens.get(row, col);
        let choices: &[Symbol] = match given {
            Symbol::Blank => &[Symbol::Sun, Symbol::Moon],
            Symbol::Sun => &[Symbol::Sun],
            Symbol::Moon => &[Symbol::Moon],
        };

        for &symbol in choices {
            if !placement_legal(grid, row, col, symbol) {
                continue;
            }
            grid.set(row, col, symbol);
            if Self::links_hold(instance, grid, row, col)
                && Self::search(instance, grid, col, row + 1)
            {
                return true;
            }
            grid.set(row, col, Symbol::Blank);
        }
        false
    }

    /// Checks every link whose later endpoint (in column-major order) is
    /// the just-placed cell; the earlier endpoint is already filled.
    fn links_hold(instance: &DuetInstance, grid: &SymbolGrid, row: usize, col: usize) -> bool {
        instance
            .links
            .iter()
            .filter(|link| link.b == (row, col))
            .all(|link| {
                let a = grid.get(link.a.0, link.a.1);
                let b = grid.get(row, col);
                if a == Symbol::Blank {
                    return true;
                }
                match link.kind {
                    Link::MustMatch => a == b,
                    Link::MustDiffer => a != b,
                }
            })
    }
}

impl Strategy for DuetBacktracking {
    type Instance = DuetInstance;
    type Solution = SymbolGrid;

    fn solve(&mut self, instance: &DuetInstance) -> Result<SymbolGrid, SolveError> {
        let mut grid = SymbolGrid::new();
        if Self::search(instance, &mut grid, 0, 0) {
            Ok(grid)
        } else {
            Err(SolveError::Unsolvable)
        }
    }
}
