//! Per-sheet findings reported next to the side-by-side output
//!
//! This module handles:
//! - Header validation of one file against the reference file
//! - Duplicate key detection (reported only; alignment still pairs positionally)
//! - Key-set membership counts
//! - Per-column change details for CHANGED records

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::align::{AlignmentRecord, Status, changed_columns};
use super::key::{CompositeKey, build_key};
use super::table::SheetTable;

/// Result of checking a sheet's header against the reference sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HeaderCheck {
    Ok,
    OrderMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    MissingKeyColumns {
        missing: Vec<String>,
    },
    SheetNotFound,
    NoReference,
}

impl HeaderCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, HeaderCheck::Ok)
    }
}

/// Validate a sheet's columns.
///
/// Missing key columns are reported before order problems because they make
/// every row of the sheet keyless.
pub fn validate_headers(
    table: Option<&SheetTable>,
    reference: Option<&SheetTable>,
    key_columns: &[&str],
) -> HeaderCheck {
    let Some(table) = table else {
        return HeaderCheck::SheetNotFound;
    };

    let missing: Vec<String> = key_columns
        .iter()
        .filter(|k| !table.has_column(k))
        .map(|k| k.to_string())
        .collect();
    if !missing.is_empty() {
        return HeaderCheck::MissingKeyColumns { missing };
    }

    let Some(reference) = reference else {
        return HeaderCheck::NoReference;
    };

    if table.columns == reference.columns {
        HeaderCheck::Ok
    } else {
        HeaderCheck::OrderMismatch {
            expected: reference.columns.clone(),
            actual: table.columns.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub key: CompositeKey,
    pub occurrences: usize,
}

/// Keys occurring more than once, in order of first occurrence
pub fn find_duplicates(table: &SheetTable, key_columns: &[&str]) -> Vec<DuplicateKey> {
    let mut counts: HashMap<CompositeKey, usize> = HashMap::new();
    let mut order = Vec::new();

    for row in &table.rows {
        if let Some(key) = build_key(row, key_columns) {
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }
    }

    order
        .into_iter()
        .filter_map(|key| {
            let occurrences = counts[&key];
            (occurrences > 1).then_some(DuplicateKey { key, occurrences })
        })
        .collect()
}

/// Membership of distinct valid keys across the two files
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct KeySets {
    pub total_keys: usize,
    pub in_both: usize,
    /// First-occurrence order of file A
    pub only_a: Vec<CompositeKey>,
    /// First-occurrence order of file B
    pub only_b: Vec<CompositeKey>,
    pub keyless_a: usize,
    pub keyless_b: usize,
}

pub fn key_sets(a: &SheetTable, b: &SheetTable, key_columns: &[&str]) -> KeySets {
    let (keys_a, keyless_a) = distinct_keys(a, key_columns);
    let (keys_b, keyless_b) = distinct_keys(b, key_columns);

    let set_a: HashSet<&CompositeKey> = keys_a.iter().collect();
    let set_b: HashSet<&CompositeKey> = keys_b.iter().collect();

    let in_both = set_a.intersection(&set_b).count();
    let only_a: Vec<CompositeKey> = keys_a.iter().filter(|k| !set_b.contains(k)).cloned().collect();
    let only_b: Vec<CompositeKey> = keys_b.iter().filter(|k| !set_a.contains(k)).cloned().collect();

    KeySets {
        total_keys: in_both + only_a.len() + only_b.len(),
        in_both,
        only_a,
        only_b,
        keyless_a,
        keyless_b,
    }
}

fn distinct_keys(table: &SheetTable, key_columns: &[&str]) -> (Vec<CompositeKey>, usize) {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    let mut keyless = 0;

    for row in &table.rows {
        match build_key(row, key_columns) {
            Some(key) => {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
            None => keyless += 1,
        }
    }

    (keys, keyless)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub same: usize,
    pub changed: usize,
    pub a_only: usize,
    pub b_only: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[AlignmentRecord<'_>]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.status {
                Status::Same => counts.same += 1,
                Status::Changed => counts.changed += 1,
                Status::AOnly => counts.a_only += 1,
                Status::BOnly => counts.b_only += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.same + self.changed + self.a_only + self.b_only
    }

    pub fn has_differences(&self) -> bool {
        self.changed + self.a_only + self.b_only > 0
    }
}

/// One differing non-key value of a CHANGED record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeDetail {
    pub key: CompositeKey,
    pub column: String,
    pub value_a: String,
    pub value_b: String,
}

/// Change details of every CHANGED record, in record order
pub fn change_details(records: &[AlignmentRecord<'_>], key_columns: &[&str]) -> Vec<ChangeDetail> {
    let mut details = Vec::new();

    for record in records.iter().filter(|r| r.status == Status::Changed) {
        let (Some(key), Some(left), Some(right)) = (&record.key, record.left, record.right) else {
            continue;
        };
        for column in changed_columns(left, right, key_columns) {
            details.push(ChangeDetail {
                key: key.clone(),
                column: column.to_string(),
                value_a: left.value(column).to_text(),
                value_b: right.value(column).to_text(),
            });
        }
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::align::{Side, align_rows};
    use crate::diff::table::test_support::{make_row, make_table};

    const KEYS: &[&str] = &["Org", "NIC"];

    fn person(org: &str, nic: &str, name: &str) -> crate::diff::table::Row {
        make_row(&[("Org", org), ("NIC", nic), ("Name", name)])
    }

    #[test]
    fn test_header_validation() {
        let reference = make_table(vec![person("X", "1", "a")]);
        let same = make_table(vec![person("X", "1", "a")]);
        let reordered = make_table(vec![make_row(&[("NIC", "1"), ("Org", "X"), ("Name", "a")])]);
        let no_nic = make_table(vec![make_row(&[("Org", "X"), ("Name", "a")])]);

        assert_eq!(validate_headers(Some(&same), Some(&reference), KEYS), HeaderCheck::Ok);
        assert!(matches!(
            validate_headers(Some(&reordered), Some(&reference), KEYS),
            HeaderCheck::OrderMismatch { .. }
        ));
        assert_eq!(
            validate_headers(Some(&no_nic), Some(&reference), KEYS),
            HeaderCheck::MissingKeyColumns {
                missing: vec!["NIC".to_string()]
            }
        );
        assert_eq!(validate_headers(None, Some(&reference), KEYS), HeaderCheck::SheetNotFound);
        assert_eq!(validate_headers(Some(&same), None, KEYS), HeaderCheck::NoReference);
    }

    #[test]
    fn test_find_duplicates_in_first_occurrence_order() {
        let table = make_table(vec![
            person("X", "2", "a"),
            person("X", "1", "b"),
            person("X", "2", "c"),
            person("X", "1", "d"),
            person("X", "2", "e"),
            person("", "2", "keyless"),
            person("X", "3", "f"),
        ]);

        let dups = find_duplicates(&table, KEYS);
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].key.to_string(), "X | 2");
        assert_eq!(dups[0].occurrences, 3);
        assert_eq!(dups[1].key.to_string(), "X | 1");
        assert_eq!(dups[1].occurrences, 2);
    }

    #[test]
    fn test_key_sets() {
        let a = make_table(vec![
            person("X", "1", "a"),
            person("X", "2", "b"),
            person("X", "2", "b"),
            person("", "9", "keyless"),
        ]);
        let b = make_table(vec![person("X", "2", "b"), person("X", "3", "c")]);

        let sets = key_sets(&a, &b, KEYS);
        assert_eq!(sets.total_keys, 3);
        assert_eq!(sets.in_both, 1);
        assert_eq!(sets.only_a.len(), 1);
        assert_eq!(sets.only_a[0].to_string(), "X | 1");
        assert_eq!(sets.only_b[0].to_string(), "X | 3");
        assert_eq!(sets.keyless_a, 1);
        assert_eq!(sets.keyless_b, 0);
    }

    #[test]
    fn test_status_counts_and_change_details() {
        let a = make_table(vec![person("X", "1", "Ann"), person("X", "2", "Bob")]);
        let b = make_table(vec![person("X", "1", "Anne"), person("X", "3", "Cid")]);

        let records = align_rows(&a, &b, KEYS, Side::B);
        let counts = StatusCounts::from_records(&records);
        assert_eq!(
            counts,
            StatusCounts {
                same: 0,
                changed: 1,
                a_only: 1,
                b_only: 1
            }
        );
        assert_eq!(counts.total(), records.len());
        assert!(counts.has_differences());

        let details = change_details(&records, KEYS);
        assert_eq!(
            details,
            vec![ChangeDetail {
                key: CompositeKey::new(vec!["X".to_string(), "1".to_string()]),
                column: "Name".to_string(),
                value_a: "Ann".to_string(),
                value_b: "Anne".to_string(),
            }]
        );
    }
}
