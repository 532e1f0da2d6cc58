//! Load master workbook sheets into tables

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{Data, ExcelDateTime, Reader, Sheets, open_workbook_auto};
use chrono::{NaiveDateTime, NaiveTime};

use crate::config::sheets::SheetSpec;
use crate::diff::header::table_from_grid;
use crate::diff::{CellValue, SheetTable};

/// An opened input workbook
pub struct WorkbookSource {
    path: PathBuf,
    sheet_names: Vec<String>,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Input file does not exist: {}", path.display());
        }

        let workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
        let sheet_names = workbook.sheet_names();

        log::debug!("Opened {} with sheets {:?}", path.display(), sheet_names);

        Ok(Self {
            path: path.to_path_buf(),
            sheet_names,
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|n| n == name)
    }

    /// Load one configured sheet.
    ///
    /// Returns `Ok(None)` when the workbook has no sheet of that name.
    pub fn load_sheet(&mut self, sheet: &SheetSpec, lookahead: usize) -> Result<Option<SheetTable>> {
        if !self.has_sheet(sheet.name) {
            log::warn!("Sheet '{}' not found in {}", sheet.name, self.path.display());
            return Ok(None);
        }

        let range = self.workbook.worksheet_range(sheet.name).with_context(|| {
            format!(
                "Failed to read sheet '{}' from {}",
                sheet.name,
                self.path.display()
            )
        })?;

        let grid: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_value).collect())
            .collect();

        let table = table_from_grid(&grid, sheet.key_columns, lookahead);
        log::debug!(
            "Loaded '{}' from {}: {} columns, {} rows",
            sheet.name,
            self.path.display(),
            table.columns.len(),
            table.len()
        );

        Ok(Some(table))
    }
}

pub fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => excel_datetime_to_value(dt),
        Data::DateTimeIso(s) => match NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            Ok(dt) => CellValue::DateTime(format_datetime(&dt)),
            Err(_) => CellValue::DateTime(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{e:?}")),
    }
}

/// Serial dates become `YYYY-MM-DD` (or `YYYY-MM-DD HH:MM:SS` when a time
/// is set); durations become `h:mm:ss` text.
fn excel_datetime_to_value(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        let secs = dt.as_duration().map(|d| d.num_seconds()).unwrap_or_default();
        return CellValue::Text(format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60));
    }
    match dt.as_datetime() {
        Some(datetime) => CellValue::DateTime(format_datetime(&datetime)),
        None => CellValue::Number(dt.as_f64()),
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
