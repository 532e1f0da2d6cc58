//! Header row detection and grid → table conversion
//!
//! Master workbooks carry a few title/instruction rows above the real
//! header, and the number varies between exports. The header is found with
//! a fixed priority list:
//! 1. first row (within the lookahead window) containing every key column
//! 2. first row containing at least half of the key columns
//! 3. the row with the most non-empty cells

use std::collections::HashMap;

use super::table::{Row, SheetTable};
use super::value::CellValue;

pub const DEFAULT_HEADER_LOOKAHEAD: usize = 15;

/// Which rule picked the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    AllKeys,
    HalfKeys,
    Densest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChoice {
    pub row: usize,
    pub matched: HeaderMatch,
}

/// Pick the header row of a raw cell grid
pub fn detect_header_row(
    grid: &[Vec<CellValue>],
    key_columns: &[&str],
    lookahead: usize,
) -> HeaderChoice {
    let window = &grid[..grid.len().min(lookahead)];

    let key_hits = |row: &[CellValue]| -> usize {
        let texts: Vec<String> = row.iter().map(CellValue::normalized).collect();
        key_columns
            .iter()
            .filter(|key| texts.iter().any(|t| t == *key))
            .count()
    };

    if !key_columns.is_empty() {
        if let Some(row) = window.iter().position(|r| key_hits(r) == key_columns.len()) {
            return HeaderChoice {
                row,
                matched: HeaderMatch::AllKeys,
            };
        }

        let half = (key_columns.len() / 2).max(1);
        if let Some(row) = window.iter().position(|r| key_hits(r) >= half) {
            return HeaderChoice {
                row,
                matched: HeaderMatch::HalfKeys,
            };
        }
    }

    // First row wins ties
    let mut best = 0;
    let mut best_count = 0;
    for (idx, row) in window.iter().enumerate() {
        let count = row.iter().filter(|c| !c.is_empty()).count();
        if count > best_count {
            best = idx;
            best_count = count;
        }
    }

    HeaderChoice {
        row: best,
        matched: HeaderMatch::Densest,
    }
}

/// Column names for a header row.
///
/// Blank header cells yield `None` (the column is dropped). Repeated names
/// get `.1`, `.2`, ... appended to the later occurrences.
pub fn header_names(cells: &[CellValue]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(cells.len());

    for cell in cells {
        let base = cell.normalized();
        if base.is_empty() {
            names.push(None);
            continue;
        }

        let mut name = base.clone();
        while seen.contains_key(&name) {
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            name = format!("{}.{}", base, count);
        }
        seen.insert(name.clone(), 0);
        names.push(Some(name));
    }

    names
}

/// Convert a raw grid into a table using the detected header row.
///
/// Rows below the header whose kept cells are all empty are skipped.
pub fn table_from_grid(
    grid: &[Vec<CellValue>],
    key_columns: &[&str],
    lookahead: usize,
) -> SheetTable {
    if grid.is_empty() {
        return SheetTable::default();
    }

    let choice = detect_header_row(grid, key_columns, lookahead);
    log::debug!(
        "Header row {} chosen by {:?} (keys: {:?})",
        choice.row,
        choice.matched,
        key_columns
    );

    let names = header_names(&grid[choice.row]);
    let columns: Vec<String> = names.iter().flatten().cloned().collect();

    let rows = grid[choice.row + 1..]
        .iter()
        .map(|cells| {
            let values = names
                .iter()
                .enumerate()
                .filter_map(|(idx, name)| {
                    let name = name.as_ref()?;
                    let value = cells.get(idx).cloned().unwrap_or(CellValue::Empty);
                    Some((name.clone(), value))
                })
                .collect();
            Row::new(values)
        })
        .filter(|row| !row.is_blank())
        .collect();

    SheetTable::new(columns, rows)
}
