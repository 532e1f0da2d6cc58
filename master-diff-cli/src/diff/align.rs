//! Key-based row alignment between two versions of a sheet
//!
//! Rows are bucketed by composite key. Output follows the reference side's
//! row order; keys that only the other side has are appended in that side's
//! order. Rows sharing a key pair up positionally, and any excess on one side
//! becomes a one-sided record. Rows without a valid key never pair.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::key::{CompositeKey, build_key};
use super::table::{Row, SheetTable};
use super::value::values_equal;

/// Which input file a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First file, left-hand columns
    #[serde(rename = "first")]
    A,
    /// Second file, right-hand columns
    #[serde(rename = "second")]
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "first"),
            Side::B => write!(f, "second"),
        }
    }
}

/// Classification of one alignment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    #[serde(rename = "SAME")]
    Same,
    #[serde(rename = "CHANGED")]
    Changed,
    #[serde(rename = "A-ONLY")]
    AOnly,
    #[serde(rename = "B-ONLY")]
    BOnly,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Same => "SAME",
            Status::Changed => "CHANGED",
            Status::AOnly => "A-ONLY",
            Status::BOnly => "B-ONLY",
        }
    }

    /// Status of a record holding a row from only one side
    pub fn only(side: Side) -> Status {
        match side {
            Side::A => Status::AOnly,
            Side::B => Status::BOnly,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One output line of the alignment: a row pair or a one-sided row
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord<'a> {
    /// `None` for rows whose key was invalid
    pub key: Option<CompositeKey>,
    pub left: Option<&'a Row>,
    pub right: Option<&'a Row>,
    pub status: Status,
}

impl<'a> AlignmentRecord<'a> {
    fn pair(key: CompositeKey, left: &'a Row, right: &'a Row, key_columns: &[&str]) -> Self {
        let status = if changed_columns(left, right, key_columns).is_empty() {
            Status::Same
        } else {
            Status::Changed
        };
        Self {
            key: Some(key),
            left: Some(left),
            right: Some(right),
            status,
        }
    }

    fn one_sided(key: Option<CompositeKey>, side: Side, row: &'a Row) -> Self {
        let (left, right) = match side {
            Side::A => (Some(row), None),
            Side::B => (None, Some(row)),
        };
        Self {
            key,
            left,
            right,
            status: Status::only(side),
        }
    }
}

/// Non-key columns whose values differ between two rows.
///
/// Columns are the union of both rows' columns, left row's order first.
pub fn changed_columns<'r>(left: &'r Row, right: &'r Row, key_columns: &[&str]) -> Vec<&'r str> {
    let mut columns: Vec<&str> = left.columns().collect();
    for column in right.columns() {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    columns
        .into_iter()
        .filter(|column| !key_columns.contains(column))
        .filter(|column| !values_equal(left.value(column), right.value(column)))
        .collect()
}

enum Entry<'a> {
    Keyed(CompositeKey),
    Keyless(&'a Row),
}

/// Rows of one side bucketed by key, plus the side's row sequence
struct KeyIndex<'a> {
    buckets: HashMap<CompositeKey, Vec<&'a Row>>,
    sequence: Vec<Entry<'a>>,
}

impl<'a> KeyIndex<'a> {
    fn build(table: &'a SheetTable, key_columns: &[&str]) -> Self {
        let mut buckets: HashMap<CompositeKey, Vec<&'a Row>> = HashMap::new();
        let mut sequence = Vec::with_capacity(table.rows.len());

        for row in &table.rows {
            match build_key(row, key_columns) {
                Some(key) => {
                    buckets.entry(key.clone()).or_default().push(row);
                    sequence.push(Entry::Keyed(key));
                }
                None => sequence.push(Entry::Keyless(row)),
            }
        }

        Self { buckets, sequence }
    }

    fn rows(&self, key: &CompositeKey) -> &[&'a Row] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Align the rows of two tables.
///
/// Every row of both tables appears in exactly one record. `reference`
/// names the side whose row order is preserved.
pub fn align_rows<'a>(
    left: &'a SheetTable,
    right: &'a SheetTable,
    key_columns: &[&str],
    reference: Side,
) -> Vec<AlignmentRecord<'a>> {
    let left_index = KeyIndex::build(left, key_columns);
    let right_index = KeyIndex::build(right, key_columns);

    let index_for = |side: Side| match side {
        Side::A => &left_index,
        Side::B => &right_index,
    };

    let mut records = Vec::with_capacity(left.len().max(right.len()));
    let mut emitted: HashSet<&CompositeKey> = HashSet::new();

    for side in [reference, reference.other()] {
        for entry in &index_for(side).sequence {
            match entry {
                Entry::Keyless(row) => {
                    records.push(AlignmentRecord::one_sided(None, side, *row));
                }
                Entry::Keyed(key) => {
                    if !emitted.insert(key) {
                        continue;
                    }
                    let lefts = left_index.rows(key);
                    let rights = right_index.rows(key);
                    for i in 0..lefts.len().max(rights.len()) {
                        let record = match (lefts.get(i), rights.get(i)) {
                            (Some(&l), Some(&r)) => {
                                AlignmentRecord::pair(key.clone(), l, r, key_columns)
                            }
                            (Some(&l), None) => {
                                AlignmentRecord::one_sided(Some(key.clone()), Side::A, l)
                            }
                            (None, Some(&r)) => {
                                AlignmentRecord::one_sided(Some(key.clone()), Side::B, r)
                            }
                            (None, None) => continue,
                        };
                        records.push(record);
                    }
                }
            }
        }
    }

    records
}
