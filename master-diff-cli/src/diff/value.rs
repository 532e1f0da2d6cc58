//! Cell values and the equality rule used when diffing

use std::fmt;

use serde::Serialize;

/// A single cell as read from a workbook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Dates keep the textual form the workbook reader produced
    DateTime(String),
}

impl CellValue {
    /// True for absent cells and for text that is blank after trimming
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) | CellValue::DateTime(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }

    /// Text form of the value, untrimmed
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) | CellValue::DateTime(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Trimmed text form; every empty surface form collapses to ""
    pub fn normalized(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => s.trim().to_string(),
            other => other.to_text(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Structural equality after trimming and empty normalisation.
///
/// Not type aware: the number `3` and the text `"3"` are equal, `"abc"` and
/// `"ABC"` are not.
pub fn values_equal(a: &CellValue, b: &CellValue) -> bool {
    a.normalized() == b.normalized()
}

/// Whole floats print without a decimal point so `3.0` and `"3"` line up
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_forms_are_equal() {
        let blanks = [
            CellValue::Empty,
            CellValue::from(""),
            CellValue::from("   "),
            CellValue::from("\t\n"),
            CellValue::DateTime(String::new()),
        ];
        for a in &blanks {
            for b in &blanks {
                assert!(values_equal(a, b), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_equality_is_symmetric() {
        let values = [
            CellValue::Empty,
            CellValue::from(" Depot "),
            CellValue::from("Depot"),
            CellValue::from("depot"),
            CellValue::Number(3.0),
            CellValue::from("3"),
            CellValue::Bool(true),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(values_equal(a, b), values_equal(b, a));
            }
        }
    }

    #[test]
    fn test_trimmed_text_compares_equal() {
        assert!(values_equal(&CellValue::from("  Yard"), &CellValue::from("Yard  ")));
        assert!(!values_equal(&CellValue::from("Yard"), &CellValue::from("Yard2")));
    }

    #[test]
    fn test_case_is_preserved() {
        assert!(!values_equal(&CellValue::from("abc"), &CellValue::from("ABC")));
    }

    #[test]
    fn test_empty_differs_from_value() {
        assert!(!values_equal(&CellValue::Empty, &CellValue::from("x")));
        assert!(!values_equal(&CellValue::Number(0.0), &CellValue::Empty));
    }

    #[test]
    fn test_whole_numbers_match_their_text() {
        assert!(values_equal(&CellValue::Number(42.0), &CellValue::from("42")));
        assert_eq!(CellValue::Number(1.5).to_text(), "1.5");
    }
}
