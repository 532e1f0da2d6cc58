//! Flat side-by-side rendering of alignment records

use serde::Serialize;

use super::align::{AlignmentRecord, Side, Status};
use super::table::SheetTable;
use super::value::{CellValue, values_equal};

pub const STATUS_HEADER: &str = "Status";

/// Classification of one (left, right) cell pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellClass {
    Same,
    Changed,
    AOnly,
    BOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellPair {
    pub left: CellValue,
    pub right: CellValue,
    pub class: CellClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub cells: Vec<CellPair>,
    pub status: Status,
}

/// Side-by-side table: one column pair per field plus a status per row
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SideBySide {
    pub columns: Vec<String>,
    pub rows: Vec<RenderedRow>,
}

impl SideBySide {
    /// `"<field> (<label_a>)"`, `"<field> (<label_b>)"` for every field, then `Status`
    pub fn header_labels(&self, label_a: &str, label_b: &str) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.columns.len() * 2 + 1);
        for column in &self.columns {
            labels.push(format!("{} ({})", column, label_a));
            labels.push(format!("{} ({})", column, label_b));
        }
        labels.push(STATUS_HEADER.to_string());
        labels
    }
}

/// Reference side's columns first, then the other side's new columns
pub fn union_columns(left: &SheetTable, right: &SheetTable, reference: Side) -> Vec<String> {
    let (first, second) = match reference {
        Side::A => (left, right),
        Side::B => (right, left),
    };

    let mut columns = first.columns.clone();
    for column in &second.columns {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    }
    columns
}

/// Render records over the given union columns
pub fn render(records: &[AlignmentRecord<'_>], columns: Vec<String>) -> SideBySide {
    let rows = records
        .iter()
        .map(|record| {
            let cells = columns
                .iter()
                .map(|column| {
                    let left = record.left.map(|r| r.value(column).clone()).unwrap_or(CellValue::Empty);
                    let right = record.right.map(|r| r.value(column).clone()).unwrap_or(CellValue::Empty);
                    let class = match record.status {
                        Status::AOnly => CellClass::AOnly,
                        Status::BOnly => CellClass::BOnly,
                        Status::Same | Status::Changed => {
                            if values_equal(&left, &right) {
                                CellClass::Same
                            } else {
                                CellClass::Changed
                            }
                        }
                    };
                    CellPair { left, right, class }
                })
                .collect();

            RenderedRow {
                cells,
                status: record.status,
            }
        })
        .collect();

    SideBySide { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::align::align_rows;
    use crate::diff::table::test_support::{make_row, make_table};

    const KEYS: &[&str] = &["Org", "LocID"];

    #[test]
    fn test_union_columns_reference_first() {
        let a = make_table(vec![make_row(&[("Org", "X"), ("Extra", "1"), ("LocID", "L1")])]);
        let b = make_table(vec![make_row(&[("LocID", "L1"), ("Org", "X"), ("Name", "n")])]);

        assert_eq!(union_columns(&a, &b, Side::B), vec!["LocID", "Org", "Name", "Extra"]);
        assert_eq!(union_columns(&a, &b, Side::A), vec!["Org", "Extra", "LocID", "Name"]);
    }

    #[test]
    fn test_render_shape_and_classes() {
        let a = make_table(vec![
            make_row(&[("Org", "X"), ("LocID", "L1"), ("Name", "Depot")]),
            make_row(&[("Org", "X"), ("LocID", "L2"), ("Name", "Yard")]),
        ]);
        let b = make_table(vec![
            make_row(&[("Org", "X"), ("LocID", "L2"), ("Name", "Yard2")]),
            make_row(&[("Org", "X"), ("LocID", "L3"), ("Name", "Warehouse")]),
        ]);

        let records = align_rows(&a, &b, KEYS, Side::B);
        let table = render(&records, union_columns(&a, &b, Side::B));

        assert_eq!(table.rows.len(), records.len());
        assert_eq!(table.header_labels("a.xlsx", "b.xlsx").len(), table.columns.len() * 2 + 1);

        let changed = &table.rows[0];
        assert_eq!(changed.status, Status::Changed);
        let classes: Vec<CellClass> = changed.cells.iter().map(|c| c.class).collect();
        assert_eq!(classes, vec![CellClass::Same, CellClass::Same, CellClass::Changed]);
        assert_eq!(changed.cells[2].left, CellValue::from("Yard"));
        assert_eq!(changed.cells[2].right, CellValue::from("Yard2"));

        let b_only = &table.rows[1];
        assert!(b_only.cells.iter().all(|c| c.class == CellClass::BOnly));
        assert!(b_only.cells.iter().all(|c| c.left == CellValue::Empty));

        let a_only = &table.rows[2];
        assert!(a_only.cells.iter().all(|c| c.class == CellClass::AOnly));
        assert_eq!(a_only.cells[2].left, CellValue::from("Depot"));
    }

    #[test]
    fn test_header_labels() {
        let table = SideBySide {
            columns: vec!["Org".to_string(), "Name".to_string()],
            rows: vec![],
        };
        assert_eq!(
            table.header_labels("old.xlsx", "new.xlsx"),
            vec![
                "Org (old.xlsx)",
                "Org (new.xlsx)",
                "Name (old.xlsx)",
                "Name (new.xlsx)",
                "Status",
            ]
        );
    }

    #[test]
    fn test_both_empty_cells_are_same() {
        let a = make_table(vec![make_row(&[("Org", "X"), ("LocID", "L1"), ("Note", "")])]);
        let b = make_table(vec![make_row(&[("Org", "X"), ("LocID", "L1"), ("Note", "  ")])]);

        let records = align_rows(&a, &b, KEYS, Side::B);
        let table = render(&records, union_columns(&a, &b, Side::B));

        assert_eq!(table.rows[0].status, Status::Same);
        assert!(table.rows[0].cells.iter().all(|c| c.class == CellClass::Same));
    }
}
