//! In-memory sheet tables

use super::value::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// One data row: ordered column → value pairs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    /// Value for a column, `None` if the row has no such column
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Value for a column, treating an absent column as empty
    pub fn value(&self, column: &str) -> &CellValue {
        self.get(column).unwrap_or(&EMPTY)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// True when every cell is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_empty())
    }
}

/// Rows of one sheet plus its ordered column names
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl SheetTable {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::make_row;
    use super::*;

    #[test]
    fn test_missing_column_reads_as_empty() {
        let row = make_row(&[("Org", "X")]);
        assert!(row.get("Name").is_none());
        assert_eq!(row.value("Name"), &CellValue::Empty);
        assert_eq!(row.value("Org"), &CellValue::from("X"));
    }

    #[test]
    fn test_blank_row_detection() {
        assert!(make_row(&[("A", " "), ("B", "")]).is_blank());
        assert!(!make_row(&[("A", " "), ("B", "x")]).is_blank());
    }
}
