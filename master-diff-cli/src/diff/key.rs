//! Composite keys built from a sheet's key columns

use std::fmt;

use serde::Serialize;

use super::table::Row;

/// Trimmed key-column values in declared key order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CompositeKey(Vec<String>);

impl CompositeKey {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts().join(" | "))
    }
}

/// Build the composite key of a row.
///
/// Returns `None` when any key column is missing from the row or blank.
/// Only surrounding whitespace is trimmed; case is kept.
pub fn build_key(row: &Row, key_columns: &[&str]) -> Option<CompositeKey> {
    let mut parts = Vec::with_capacity(key_columns.len());
    for column in key_columns {
        let value = row.get(column)?;
        let text = value.normalized();
        if text.is_empty() {
            return None;
        }
        parts.push(text);
    }
    Some(CompositeKey::new(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::table::test_support::make_row;
    use crate::diff::value::CellValue;

    const KEYS: &[&str] = &["Organization Short Name", "NIC"];

    #[test]
    fn test_key_in_declared_order() {
        let row = make_row(&[("NIC", " 123V "), ("Organization Short Name", "ACME")]);
        let key = build_key(&row, KEYS).unwrap();
        assert_eq!(key.parts(), &["ACME".to_string(), "123V".to_string()]);
        assert_eq!(key.to_string(), "ACME | 123V");
    }

    #[test]
    fn test_blank_component_invalidates_key() {
        let row = make_row(&[("Organization Short Name", "  "), ("NIC", "123V")]);
        assert!(build_key(&row, KEYS).is_none());
    }

    #[test]
    fn test_missing_column_invalidates_key() {
        let row = make_row(&[("Organization Short Name", "ACME")]);
        assert!(build_key(&row, KEYS).is_none());
    }

    #[test]
    fn test_numbers_stringify() {
        let row = Row::new(vec![
            ("Organization Short Name".to_string(), CellValue::from("ACME")),
            ("NIC".to_string(), CellValue::Number(901.0)),
        ]);
        assert_eq!(build_key(&row, KEYS).unwrap().parts()[1], "901");
    }

    #[test]
    fn test_case_is_not_folded() {
        let upper = build_key(&make_row(&[("Organization Short Name", "ACME"), ("NIC", "1")]), KEYS);
        let lower = build_key(&make_row(&[("Organization Short Name", "acme"), ("NIC", "1")]), KEYS);
        assert_ne!(upper, lower);
    }
}
