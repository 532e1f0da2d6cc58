//! Sheet-level comparison: alignment, rendering and findings for one sheet

use serde::Serialize;

use super::align::{Side, align_rows};
use super::analysis::{
    ChangeDetail, DuplicateKey, HeaderCheck, KeySets, StatusCounts, change_details,
    find_duplicates, key_sets, validate_headers,
};
use super::render::{SideBySide, render, union_columns};
use super::table::SheetTable;
use crate::config::sheets::SheetSpec;

/// Why a configured sheet produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotFoundInEither,
    EmptyOnBothSides,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotFoundInEither => write!(f, "sheet not found in either file"),
            SkipReason::EmptyOnBothSides => write!(f, "sheet has no data rows in either file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetComparison {
    pub sheet: SheetSpec,
    pub present_a: bool,
    pub present_b: bool,
    pub rows_a: usize,
    pub rows_b: usize,
    pub table: SideBySide,
    pub counts: StatusCounts,
    pub keys: KeySets,
    pub header_a: HeaderCheck,
    pub header_b: HeaderCheck,
    pub duplicates_a: Vec<DuplicateKey>,
    pub duplicates_b: Vec<DuplicateKey>,
    pub changes: Vec<ChangeDetail>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetOutcome {
    Compared(SheetComparison),
    Skipped {
        sheet: SheetSpec,
        reason: SkipReason,
        present_a: bool,
        present_b: bool,
    },
}

impl SheetOutcome {
    pub fn sheet(&self) -> &SheetSpec {
        match self {
            SheetOutcome::Compared(c) => &c.sheet,
            SheetOutcome::Skipped { sheet, .. } => sheet,
        }
    }

    pub fn comparison(&self) -> Option<&SheetComparison> {
        match self {
            SheetOutcome::Compared(c) => Some(c),
            SheetOutcome::Skipped { .. } => None,
        }
    }
}

/// Compare one sheet of the two files.
///
/// `None` means the sheet is absent from that file; it is treated as zero
/// rows so the other file's rows still come out as one-sided records.
pub fn compare_sheet(
    sheet: &SheetSpec,
    a: Option<&SheetTable>,
    b: Option<&SheetTable>,
    reference: Side,
) -> SheetOutcome {
    if a.is_none() && b.is_none() {
        return SheetOutcome::Skipped {
            sheet: *sheet,
            reason: SkipReason::NotFoundInEither,
            present_a: false,
            present_b: false,
        };
    }
    if a.is_none_or(SheetTable::is_empty) && b.is_none_or(SheetTable::is_empty) {
        return SheetOutcome::Skipped {
            sheet: *sheet,
            reason: SkipReason::EmptyOnBothSides,
            present_a: a.is_some(),
            present_b: b.is_some(),
        };
    }

    let empty = SheetTable::default();
    let table_a = a.unwrap_or(&empty);
    let table_b = b.unwrap_or(&empty);
    let keys = sheet.key_columns;

    let (reference_table, header_a, header_b) = match reference {
        Side::A => (a, validate_headers(a, a, keys), validate_headers(b, a, keys)),
        Side::B => (b, validate_headers(a, b, keys), validate_headers(b, b, keys)),
    };
    for (side, check) in [(Side::A, &header_a), (Side::B, &header_b)] {
        if let HeaderCheck::MissingKeyColumns { missing } = check {
            log::warn!(
                "{}: {} file lacks key column(s) {:?}; its rows cannot be matched",
                sheet.name,
                side,
                missing
            );
        }
    }
    if reference_table.is_none() {
        log::warn!(
            "{}: missing from the reference ({}) file, using the other file's order",
            sheet.name,
            reference
        );
    }

    let records = align_rows(table_a, table_b, keys, reference);
    let counts = StatusCounts::from_records(&records);
    let changes = change_details(&records, keys);
    let table = render(&records, union_columns(table_a, table_b, reference));

    log::info!(
        "{}: {} rows ({} same, {} changed, {} A-only, {} B-only)",
        sheet.name,
        counts.total(),
        counts.same,
        counts.changed,
        counts.a_only,
        counts.b_only
    );

    SheetOutcome::Compared(SheetComparison {
        sheet: *sheet,
        present_a: a.is_some(),
        present_b: b.is_some(),
        rows_a: table_a.len(),
        rows_b: table_b.len(),
        table,
        counts,
        keys: key_sets(table_a, table_b, keys),
        header_a,
        header_b,
        duplicates_a: find_duplicates(table_a, keys),
        duplicates_b: find_duplicates(table_b, keys),
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sheets::find_sheet;
    use crate::diff::align::Status;
    use crate::diff::table::test_support::{make_row, make_table};

    fn locations() -> &'static SheetSpec {
        find_sheet("Locations").unwrap()
    }

    fn loc(org: &str, id: &str, name: &str) -> crate::diff::table::Row {
        make_row(&[
            ("Organization Short Name", org),
            ("Location Reference ID", id),
            ("Location Name", name),
        ])
    }

    #[test]
    fn test_missing_in_both_is_skipped() {
        let outcome = compare_sheet(locations(), None, None, Side::B);
        assert!(matches!(
            outcome,
            SheetOutcome::Skipped { reason: SkipReason::NotFoundInEither, .. }
        ));
    }

    #[test]
    fn test_empty_on_both_sides_is_skipped() {
        let empty = make_table(vec![]);
        let outcome = compare_sheet(locations(), Some(&empty), None, Side::B);
        assert!(matches!(
            outcome,
            SheetOutcome::Skipped {
                reason: SkipReason::EmptyOnBothSides,
                present_a: true,
                present_b: false,
                ..
            }
        ));
    }

    #[test]
    fn test_sheet_missing_on_one_side() {
        let a = make_table(vec![loc("X", "L1", "Depot"), loc("X", "L2", "Yard")]);

        let outcome = compare_sheet(locations(), Some(&a), None, Side::B);
        let comparison = outcome.comparison().unwrap();

        assert!(comparison.present_a);
        assert!(!comparison.present_b);
        assert_eq!(comparison.counts.a_only, 2);
        assert_eq!(comparison.header_b, HeaderCheck::SheetNotFound);
        assert_eq!(comparison.table.columns.len(), 3);
    }

    #[test]
    fn test_full_comparison() {
        let a = make_table(vec![
            loc("X", "L1", "Depot"),
            loc("X", "L2", "Yard"),
            loc("X", "L2", "Yard"),
        ]);
        let b = make_table(vec![loc("X", "L2", "Yard2"), loc("X", "L3", "Warehouse")]);

        let outcome = compare_sheet(locations(), Some(&a), Some(&b), Side::B);
        let c = outcome.comparison().unwrap();

        let statuses: Vec<Status> = c.table.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Changed, Status::AOnly, Status::BOnly, Status::AOnly]
        );
        assert_eq!(c.rows_a, 3);
        assert_eq!(c.rows_b, 2);
        assert_eq!(c.keys.in_both, 1);
        assert_eq!(c.duplicates_a.len(), 1);
        assert!(c.duplicates_b.is_empty());
        assert_eq!(c.changes.len(), 1);
        assert_eq!(c.changes[0].column, "Location Name");
        assert!(c.header_a.is_ok());
        assert!(c.header_b.is_ok());
    }
}
