//! Solution corpus persistence.
//!
//! One file per puzzle family: `queens_<N>.txt` holds one candidate per
//! line as N comma-separated columns; `duet.bin` holds the enumerated
//! 6×6 boards as a flat binary blob (magic, little-endian count, then 36
//! symbol bytes per board).

use super::queens::QueensSolution;
use crate::classify::{Symbol, SymbolGrid};
use crate::detect::DUET_SIDE;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

const DUET_MAGIC: &[u8; 4] = b"GPD1";
const DUET_CELLS: usize = DUET_SIDE * DUET_SIDE;

/// Corpus file IO errors.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Filesystem failure.
    #[error("corpus io error: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but does not parse.
    #[error("corpus format error: {0}")]
    Format(String),
}

impl CorpusError {
    /// True when the failure is simply "no such file".
    pub fn is_not_found(&self) -> bool {
        matches!(self, CorpusError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Directory-backed store for precomputed solution sets.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    dir: PathBuf,
}

impl CorpusStore {
    /// Creates a store rooted at a directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the queens corpus for a board side.
    pub fn queens_path(&self, side: usize) -> PathBuf {
        self.dir.join(format!("queens_{side}.txt"))
    }

    /// Path of the duet corpus.
    pub fn duet_path(&self) -> PathBuf {
        self.dir.join("duet.bin")
    }

    /// Loads the queens corpus for a board side.
    pub fn load_queens(&self, side: usize) -> Result<Vec<QueensSolution>, CorpusError> {
        let content = fs::read_to_string(self.queens_path(side))?;
        let mut solutions = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let columns = line
                .split(',')
                .map(|field| field.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| CorpusError::Format(format!("line {}: {e}", line_no + 1)))?;
            if columns.len() != side || columns.iter().any(|&c| c >= side) {
                return Err(CorpusError::Format(format!(
                    "line {}: expected {side} columns below {side}",
                    line_no + 1
                )));
            }
            solutions.push(QueensSolution::new(columns));
        }
        Ok(solutions)
    }

    /// Writes a queens corpus file.
    pub fn save_queens(
        &self,
        side: usize,
        solutions: &[QueensSolution],
    ) -> Result<(), CorpusError> {
        let mut out = fs::File::create(self.queens_path(side))?;
        for solution in solutions {
            let line = solution
                .columns()
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Loads the duet corpus blob.
    pub fn load_duet(&self) -> Result<Vec<SymbolGrid>, CorpusError> {
        let bytes = fs::read(self.duet_path())?;
        parse_duet(&bytes)
    }

    /// Writes the duet corpus blob.
    pub fn save_duet(&self, grids: &[SymbolGrid]) -> Result<(), CorpusError> {
        let mut bytes = Vec::with_capacity(8 + grids.len() * DUET_CELLS);
        bytes.extend_from_slice(DUET_MAGIC);
        bytes.extend_from_slice(&(grids.len() as u32).to_le_bytes());
        for grid in grids {
            for (_, _, symbol) in grid.iter() {
                bytes.push(symbol as u8);
            }
        }
        fs::write(self.duet_path(), bytes)?;
        Ok(())
    }
}

fn parse_duet(bytes: &[u8]) -> Result<Vec<SymbolGrid>, CorpusError> {
    if bytes.len() < 8 || &bytes[..4] != DUET_MAGIC {
        return Err(CorpusError::Format("bad magic".into()));
    }
    let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let body = &bytes[8..];
    if body.len() != count * DUET_CELLS {
        return Err(CorpusError::Format(format!(
            "expected {} board bytes, found {}",
            count * DUET_CELLS,
            body.len()
        )));
    }

    let mut grids = Vec::with_capacity(count);
    for chunk in body.chunks_exact(DUET_CELLS) {
        let mut grid = SymbolGrid::new();
        for (idx, &value) in chunk.iter().enumerate() {
            let symbol = match value {
                1 => Symbol::Sun,
                2 => Symbol::Moon,
                other => {
                    return Err(CorpusError::Format(format!(
                        "invalid symbol byte {other}"
                    )))
                }
            };
            grid.set(idx / DUET_SIDE, idx % DUET_SIDE, symbol);
        }
        grids.push(grid);
    }
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::enumerate_duet_grids;

    fn temp_store(tag: &str) -> CorpusStore {
        let dir = std::env::temp_dir().join(format!(
            "grid-pilot-corpus-{}-{}",
            tag,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        CorpusStore::new(dir)
    }

    #[test]
    fn test_queens_roundtrip() {
        let store = temp_store("queens");
        let solutions = vec![
            QueensSolution::new(vec![0, 2, 4, 6, 1, 3, 5, 7]),
            QueensSolution::new(vec![1, 3, 5, 7, 0, 2, 4, 6]),
        ];
        store.save_queens(8, &solutions).unwrap();
        let loaded = store.load_queens(8).unwrap();
        assert_eq!(loaded, solutions);
    }

    #[test]
    fn test_queens_rejects_bad_width() {
        let store = temp_store("badwidth");
        fs::write(store.queens_path(8), "0,2,4\n").unwrap();
        assert!(matches!(
            store.load_queens(8),
            Err(CorpusError::Format(_))
        ));
    }

    #[test]
    fn test_duet_roundtrip_prefix() {
        let store = temp_store("duet");
        let grids: Vec<_> = enumerate_duet_grids().into_iter().take(5).collect();
        store.save_duet(&grids).unwrap();
        let loaded = store.load_duet().unwrap();
        assert_eq!(loaded, grids);
    }

    #[test]
    fn test_duet_rejects_truncated_blob() {
        let store = temp_store("trunc");
        fs::write(store.duet_path(), b"GPD1\x02\x00\x00\x00abc").unwrap();
        assert!(matches!(store.load_duet(), Err(CorpusError::Format(_))));
    }
}
