//! Run summaries and the reports built from them
//!
//! - `console`: coloured per-sheet summary on stdout
//! - `markdown`: human-readable findings report
//! - `changes_csv`: flat list of every changed value
//!
//! [`RunSummary`] is also what `--json` prints.

pub mod changes_csv;
pub mod console;
pub mod markdown;

use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::diff::analysis::{HeaderCheck, KeySets, StatusCounts};
use crate::diff::{SheetOutcome, Side, SkipReason};

const FALLBACK_LABEL_A: &str = "1st file";
const FALLBACK_LABEL_B: &str = "2nd file";

/// Inputs and labels of one compare run
#[derive(Debug, Clone)]
pub struct RunContext {
    pub first_file: String,
    pub second_file: String,
    pub label_a: String,
    pub label_b: String,
    pub reference: Side,
    pub generated_at: DateTime<Local>,
}

impl RunContext {
    /// Labels default to the file names. Two defaulted file names that
    /// collide fall back to "1st file" / "2nd file"; an explicit label that
    /// collides with the other one is an error.
    pub fn new(
        first: &Path,
        second: &Path,
        first_label: Option<String>,
        second_label: Option<String>,
        reference: Side,
    ) -> Result<Self> {
        let first_file = file_name(first);
        let second_file = file_name(second);
        let explicit = first_label.is_some() || second_label.is_some();

        let mut label_a = first_label.unwrap_or_else(|| first_file.clone());
        let mut label_b = second_label.unwrap_or_else(|| second_file.clone());
        if label_a == label_b {
            if explicit {
                bail!(
                    "Both files would be labelled '{}'; pass distinct --first-label and --second-label values",
                    label_a
                );
            }
            log::warn!("Both files are named '{}', using positional labels", label_a);
            label_a = FALLBACK_LABEL_A.to_string();
            label_b = FALLBACK_LABEL_B.to_string();
        }

        Ok(Self {
            first_file,
            second_file,
            label_a,
            label_b,
            reference,
            generated_at: Local::now(),
        })
    }

    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.label_a,
            Side::B => &self.label_b,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub first_file: String,
    pub second_file: String,
    pub label_a: String,
    pub label_b: String,
    pub reference: Side,
    pub totals: StatusCounts,
    pub sheets: Vec<SheetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub sheet: &'static str,
    pub display_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub present_a: bool,
    pub present_b: bool,
    pub rows_a: usize,
    pub rows_b: usize,
    pub counts: StatusCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_a: Option<HeaderCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_b: Option<HeaderCheck>,
    pub duplicate_keys_a: usize,
    pub duplicate_keys_b: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<KeySets>,
    pub changed_values: usize,
}

impl SheetSummary {
    fn from_outcome(outcome: &SheetOutcome) -> Self {
        let sheet = outcome.sheet();
        match outcome {
            SheetOutcome::Compared(c) => Self {
                sheet: sheet.name,
                display_name: sheet.display_name,
                skipped: None,
                present_a: c.present_a,
                present_b: c.present_b,
                rows_a: c.rows_a,
                rows_b: c.rows_b,
                counts: c.counts,
                header_a: Some(c.header_a.clone()),
                header_b: Some(c.header_b.clone()),
                duplicate_keys_a: c.duplicates_a.len(),
                duplicate_keys_b: c.duplicates_b.len(),
                keys: Some(c.keys.clone()),
                changed_values: c.changes.len(),
            },
            SheetOutcome::Skipped {
                reason,
                present_a,
                present_b,
                ..
            } => Self {
                sheet: sheet.name,
                display_name: sheet.display_name,
                skipped: Some(*reason),
                present_a: *present_a,
                present_b: *present_b,
                rows_a: 0,
                rows_b: 0,
                counts: StatusCounts::default(),
                header_a: None,
                header_b: None,
                duplicate_keys_a: 0,
                duplicate_keys_b: 0,
                keys: None,
                changed_values: 0,
            },
        }
    }
}

impl RunSummary {
    pub fn build(context: &RunContext, outcomes: &[SheetOutcome]) -> Self {
        let sheets: Vec<SheetSummary> = outcomes.iter().map(SheetSummary::from_outcome).collect();

        let mut totals = StatusCounts::default();
        for sheet in &sheets {
            totals.same += sheet.counts.same;
            totals.changed += sheet.counts.changed;
            totals.a_only += sheet.counts.a_only;
            totals.b_only += sheet.counts.b_only;
        }

        Self {
            generated_at: context.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            first_file: context.first_file.clone(),
            second_file: context.second_file.clone(),
            label_a: context.label_a.clone(),
            label_b: context.label_b.clone(),
            reference: context.reference,
            totals,
            sheets,
        }
    }

    pub fn compared_sheets(&self) -> usize {
        self.sheets.iter().filter(|s| s.skipped.is_none()).count()
    }
}
