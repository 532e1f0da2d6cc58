//! Write side-by-side comparisons to an xlsx workbook

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, ExcelDateTime, Format, Workbook, Worksheet};
use unicode_width::UnicodeWidthStr;

use crate::config::OutputConfig;
use crate::diff::render::CellPair;
use crate::diff::{CellClass, CellValue, SheetComparison, Status};

/// Excel's worksheet name limit
const MAX_SHEET_NAME_CHARS: usize = 31;

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

mod fills {
    pub const A_ONLY: u32 = 0x0070C0;
    pub const B_ONLY: u32 = 0x00B050;
    pub const CHANGED: u32 = 0xFF0000;
}

struct Formats {
    header: Format,
    a_only: Format,
    b_only: Format,
    changed: Format,
    highlight: bool,
}

impl Formats {
    fn new(highlight: bool) -> Self {
        Self {
            header: Format::new().set_bold(),
            a_only: Format::new().set_background_color(Color::RGB(fills::A_ONLY)),
            b_only: Format::new().set_background_color(Color::RGB(fills::B_ONLY)),
            changed: Format::new().set_background_color(Color::RGB(fills::CHANGED)),
            highlight,
        }
    }

    /// Fills for the (left, right) cells of a pair
    fn for_pair(&self, class: CellClass) -> (Option<&Format>, Option<&Format>) {
        if !self.highlight {
            return (None, None);
        }
        match class {
            CellClass::Same => (None, None),
            CellClass::Changed => (Some(&self.changed), Some(&self.changed)),
            CellClass::AOnly => (Some(&self.a_only), None),
            CellClass::BOnly => (None, Some(&self.b_only)),
        }
    }

    fn for_status(&self, status: Status) -> Option<&Format> {
        if !self.highlight {
            return None;
        }
        match status {
            Status::Same => None,
            Status::Changed => Some(&self.changed),
            Status::AOnly => Some(&self.a_only),
            Status::BOnly => Some(&self.b_only),
        }
    }
}

/// Write one worksheet per comparison.
///
/// The workbook is saved next to `path` under a temporary name and renamed
/// into place, so a failed run leaves no partial output.
pub fn write_comparison_workbook(
    path: &Path,
    comparisons: &[&SheetComparison],
    label_a: &str,
    label_b: &str,
    options: &OutputConfig,
) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;

    let mut workbook = Workbook::new();
    let formats = Formats::new(options.highlight);

    for comparison in comparisons {
        create_comparison_sheet(&mut workbook, comparison, label_a, label_b, options, &formats)
            .with_context(|| format!("Failed to write sheet '{}'", comparison.sheet.name))?;
    }

    let temp_path = parent.join(format!(".master-diff-{}.xlsx", uuid::Uuid::new_v4()));
    if let Err(e) = workbook.save(&temp_path) {
        fs::remove_file(&temp_path).ok();
        return Err(e).with_context(|| format!("Failed to save Excel file: {}", path.display()));
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        fs::remove_file(&temp_path).ok();
        return Err(e).with_context(|| format!("Failed to move output into place: {}", path.display()));
    }

    log::info!("Comparison workbook exported to: {}", path.display());
    Ok(())
}

fn create_comparison_sheet(
    workbook: &mut Workbook,
    comparison: &SheetComparison,
    label_a: &str,
    label_b: &str,
    options: &OutputConfig,
    formats: &Formats,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(worksheet_name(comparison.sheet.name))?;

    let headers = comparison.table.header_labels(label_a, label_b);
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, header, &formats.header)?;
        sheet.set_column_width(
            col,
            column_width(header, options.min_column_width, options.max_column_width),
        )?;
    }

    for (row_idx, rendered) in comparison.table.rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (pair_idx, CellPair { left, right, class }) in rendered.cells.iter().enumerate() {
            let col = (pair_idx * 2) as u16;
            let (left_format, right_format) = formats.for_pair(*class);
            write_value(sheet, row, col, left, left_format)?;
            write_value(sheet, row, col + 1, right, right_format)?;
        }

        let status_col = (rendered.cells.len() * 2) as u16;
        let label = rendered.status.label();
        match formats.for_status(rendered.status) {
            Some(format) => sheet.write_string_with_format(row, status_col, label, format)?,
            None => sheet.write_string(row, status_col, label)?,
        };
    }

    if options.freeze_header {
        sheet.set_freeze_panes(1, 0)?;
    }
    if options.autofilter && !headers.is_empty() {
        let last_row = comparison.table.rows.len() as u32;
        let last_col = (headers.len() - 1) as u16;
        sheet.autofilter(0, 0, last_row, last_col)?;
    }

    log::debug!(
        "Wrote sheet '{}' with {} rows",
        comparison.sheet.name,
        comparison.table.rows.len()
    );
    Ok(())
}

fn write_value(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<()> {
    match (value, format) {
        (CellValue::Empty, None) => {}
        (CellValue::Empty, Some(f)) => {
            ws.write_blank(row, col, f)?;
        }
        (CellValue::Number(n), None) => {
            ws.write_number(row, col, *n)?;
        }
        (CellValue::Number(n), Some(f)) => {
            ws.write_number_with_format(row, col, *n, f)?;
        }
        (CellValue::Bool(b), None) => {
            ws.write_boolean(row, col, *b)?;
        }
        (CellValue::Bool(b), Some(f)) => {
            ws.write_boolean_with_format(row, col, *b, f)?;
        }
        (CellValue::DateTime(s), f) => match parse_date(s) {
            Some(datetime) => {
                let date_format = f.cloned().unwrap_or_default().set_num_format(date_num_format(s));
                ws.write_datetime_with_format(row, col, &datetime, &date_format)?;
            }
            None => write_text(ws, row, col, s, f)?,
        },
        (CellValue::Text(s), f) => write_text(ws, row, col, s, f)?,
    }
    Ok(())
}

fn write_text(ws: &mut Worksheet, row: u32, col: u16, text: &str, format: Option<&Format>) -> Result<()> {
    match format {
        Some(f) => {
            ws.write_string_with_format(row, col, text, f)?;
        }
        None => {
            ws.write_string(row, col, text)?;
        }
    }
    Ok(())
}

/// Only full dates are written as Excel dates; anything else stays text
fn parse_date(text: &str) -> Option<ExcelDateTime> {
    if !text.contains('-') {
        return None;
    }
    ExcelDateTime::parse_from_str(text).ok()
}

/// Dates read as `YYYY-MM-DD` keep a date-only display
fn date_num_format(text: &str) -> &'static str {
    if text.trim().len() > 10 {
        DATETIME_NUM_FORMAT
    } else {
        DATE_NUM_FORMAT
    }
}

fn worksheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_CHARS).collect()
}

fn column_width(header: &str, min: f64, max: f64) -> f64 {
    (header.width() as f64 + 2.0).clamp(min, max)
}
