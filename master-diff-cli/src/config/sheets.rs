//! Sheets compared in a master workbook and their key columns

use anyhow::{Result, bail};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetSpec {
    /// Exact worksheet name in the workbook
    pub name: &'static str,
    pub display_name: &'static str,
    /// Columns forming the composite key, in key order
    pub key_columns: &'static [&'static str],
}

pub const SHEETS: &[SheetSpec] = &[
    SheetSpec {
        name: "1 - Organization Details",
        display_name: "Organization Details",
        key_columns: &["Organization Short Name"],
    },
    SheetSpec {
        name: "2 - Divisions",
        display_name: "Divisions",
        key_columns: &["Organization Short Name"],
    },
    SheetSpec {
        name: "3 - Human Resources",
        display_name: "Human Resources",
        key_columns: &["Organization Short Name", "NIC"],
    },
    SheetSpec {
        name: "4 - Vehicles",
        display_name: "Vehicles",
        key_columns: &["Organization Short Name", "Vehicle Number"],
    },
    SheetSpec {
        name: "5 - Locations",
        display_name: "Locations",
        key_columns: &["Organization Short Name", "Location Reference ID"],
    },
];

/// Look up a sheet by worksheet name or display name (case-insensitive)
pub fn find_sheet(query: &str) -> Option<&'static SheetSpec> {
    let query = query.trim();
    SHEETS.iter().find(|s| {
        s.name.eq_ignore_ascii_case(query) || s.display_name.eq_ignore_ascii_case(query)
    })
}

/// Resolve `--sheet` arguments; an empty selection means every sheet.
///
/// The result keeps the configured sheet order regardless of argument order.
pub fn select_sheets(queries: &[String]) -> Result<Vec<&'static SheetSpec>> {
    if queries.is_empty() {
        return Ok(SHEETS.iter().collect());
    }

    let mut selected = Vec::new();
    for query in queries {
        match find_sheet(query) {
            Some(sheet) => {
                if !selected.contains(&sheet) {
                    selected.push(sheet);
                }
            }
            None => {
                let known: Vec<&str> = SHEETS.iter().map(|s| s.display_name).collect();
                bail!("Unknown sheet '{}'. Known sheets: {}", query, known.join(", "));
            }
        }
    }

    selected.sort_by_key(|s| SHEETS.iter().position(|c| c == *s));
    Ok(selected)
}
