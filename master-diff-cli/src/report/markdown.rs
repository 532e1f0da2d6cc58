//! Markdown findings report
//!
//! Lists per-sheet presence, header validation, duplicate keys, key-set
//! counts and the first `detail_limit` changed values and one-sided keys.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::RunSummary;
use crate::diff::analysis::{DuplicateKey, HeaderCheck};
use crate::diff::key::CompositeKey;
use crate::diff::{SheetComparison, SheetOutcome};

pub fn render_markdown(summary: &RunSummary, outcomes: &[SheetOutcome], detail_limit: usize) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, summary, outcomes, detail_limit);
    out
}

pub fn write_markdown_report(
    path: &Path,
    summary: &RunSummary,
    outcomes: &[SheetOutcome],
    detail_limit: usize,
) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
    }

    let content = render_markdown(summary, outcomes, detail_limit);
    fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    log::info!("Markdown report exported to: {}", path.display());
    Ok(())
}

fn write_report(
    out: &mut String,
    summary: &RunSummary,
    outcomes: &[SheetOutcome],
    limit: usize,
) -> std::fmt::Result {
    writeln!(out, "# Master Comparison Report\n")?;
    writeln!(out, "**Generated:** {}\n", summary.generated_at)?;

    writeln!(out, "## Global Summary\n")?;
    writeln!(out, "- File A: {} ({})", summary.first_file, summary.label_a)?;
    writeln!(out, "- File B: {} ({})", summary.second_file, summary.label_b)?;
    writeln!(out, "- Row order reference: {} file", summary.reference)?;
    writeln!(
        out,
        "- Sheets compared: {} of {}",
        summary.compared_sheets(),
        summary.sheets.len()
    )?;
    let t = &summary.totals;
    writeln!(
        out,
        "- Rows: {} same, {} changed, {} A-only, {} B-only\n",
        t.same, t.changed, t.a_only, t.b_only
    )?;

    writeln!(out, "## Sheet-by-Sheet Analysis\n")?;
    for outcome in outcomes {
        let sheet = outcome.sheet();
        writeln!(out, "### {} ({})\n", sheet.display_name, sheet.name)?;
        match outcome {
            SheetOutcome::Skipped { reason, .. } => writeln!(out, "Skipped: {}.\n", reason)?,
            SheetOutcome::Compared(c) => write_sheet(out, summary, c, limit)?,
        }
        writeln!(out, "---\n")?;
    }

    writeln!(out, "## Legend\n")?;
    writeln!(out, "Cell fills in the comparison workbook:")?;
    writeln!(out, "- Blue: data only in file A")?;
    writeln!(out, "- Green: data only in file B")?;
    writeln!(out, "- Red: values changed between the files")?;
    Ok(())
}

fn write_sheet(
    out: &mut String,
    summary: &RunSummary,
    c: &SheetComparison,
    limit: usize,
) -> std::fmt::Result {
    let files = [
        (&summary.first_file, c.present_a, &c.header_a, &c.duplicates_a),
        (&summary.second_file, c.present_b, &c.header_b, &c.duplicates_b),
    ];

    writeln!(out, "**Sheet Presence:**")?;
    for (file, present, _, _) in &files {
        let mark = if *present { "✓ Yes" } else { "✗ No" };
        writeln!(out, "- {}: {}", file, mark)?;
    }
    writeln!(out)?;

    writeln!(out, "**Header Validation:**")?;
    for (file, _, check, _) in &files {
        writeln!(out, "- {}: {}", file, describe_header(check))?;
    }
    writeln!(out)?;

    writeln!(out, "**Duplicate Keys:**")?;
    for (file, _, _, duplicates) in &files {
        write_duplicates(out, file, duplicates, limit)?;
    }
    writeln!(out)?;

    let k = &c.keys;
    writeln!(out, "**Row Analysis:**")?;
    writeln!(out, "- Rows: {} in file A, {} in file B", c.rows_a, c.rows_b)?;
    writeln!(out, "- Total unique keys: {}", k.total_keys)?;
    writeln!(out, "- Keys in both files: {}", k.in_both)?;
    writeln!(out, "- Keys only in file A: {}", k.only_a.len())?;
    writeln!(out, "- Keys only in file B: {}", k.only_b.len())?;
    if k.keyless_a + k.keyless_b > 0 {
        writeln!(out, "- Rows without a key: {} in file A, {} in file B", k.keyless_a, k.keyless_b)?;
    }
    writeln!(
        out,
        "- Status: {} same, {} changed, {} A-only, {} B-only\n",
        c.counts.same, c.counts.changed, c.counts.a_only, c.counts.b_only
    )?;

    if !c.changes.is_empty() {
        writeln!(out, "**Changed Values:**")?;
        writeln!(out, "| Key | Column | {} | {} |", summary.label_a, summary.label_b)?;
        writeln!(out, "|-----|--------|-----|-----|")?;
        for change in c.changes.iter().take(limit) {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                escape_cell(&change.key.to_string()),
                escape_cell(&change.column),
                escape_cell(&change.value_a),
                escape_cell(&change.value_b)
            )?;
        }
        if c.changes.len() > limit {
            writeln!(out, "| *{} more changes* | | | |", c.changes.len() - limit)?;
        }
        writeln!(out)?;
    }

    write_key_list(out, "Keys only in file A", &k.only_a, limit)?;
    write_key_list(out, "Keys only in file B", &k.only_b, limit)?;
    Ok(())
}

fn describe_header(check: &HeaderCheck) -> String {
    match check {
        HeaderCheck::Ok => "✓ OK".to_string(),
        HeaderCheck::SheetNotFound => "✗ Sheet not found".to_string(),
        HeaderCheck::NoReference => "⚠ No reference available".to_string(),
        HeaderCheck::MissingKeyColumns { missing } => {
            format!("✗ Missing key column(s): {}", missing.join(", "))
        }
        HeaderCheck::OrderMismatch { expected, actual } => format!(
            "⚠ Column order differs (expected: {}; found: {})",
            expected.join(", "),
            actual.join(", ")
        ),
    }
}

fn write_duplicates(
    out: &mut String,
    file: &str,
    duplicates: &[DuplicateKey],
    limit: usize,
) -> std::fmt::Result {
    if duplicates.is_empty() {
        return writeln!(out, "- {}: ✓ No duplicates", file);
    }
    writeln!(out, "- {}: {} duplicate keys", file, duplicates.len())?;
    for dup in duplicates.iter().take(limit) {
        writeln!(out, "  - {} ({} rows)", dup.key, dup.occurrences)?;
    }
    if duplicates.len() > limit {
        writeln!(out, "  - ... and {} more", duplicates.len() - limit)?;
    }
    Ok(())
}

fn write_key_list(out: &mut String, title: &str, keys: &[CompositeKey], limit: usize) -> std::fmt::Result {
    if keys.is_empty() {
        return Ok(());
    }
    writeln!(out, "**{}:**", title)?;
    for key in keys.iter().take(limit) {
        writeln!(out, "- {}", key)?;
    }
    if keys.len() > limit {
        writeln!(out, "- ... and {} more", keys.len() - limit)?;
    }
    writeln!(out)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::{context, outcomes};

    #[test]
    fn test_report_sections() {
        let outcomes = outcomes();
        let summary = RunSummary::build(&context(), &outcomes);
        let md = render_markdown(&summary, &outcomes, 10);

        assert!(md.starts_with("# Master Comparison Report"));
        assert!(md.contains("### Vehicles (4 - Vehicles)"));
        assert!(md.contains("Skipped: sheet not found in either file."));
        assert!(md.contains("### Locations (5 - Locations)"));
        assert!(md.contains("- master_old.xlsx: ✓ OK"));
        assert!(md.contains("- Keys in both files: 1"));
        assert!(md.contains("| X \\| L2 | Location Name | Yard | Yard 2 |"));
        assert!(md.contains("**Keys only in file A:**\n- X | L1"));
        assert!(md.contains("**Keys only in file B:**\n- X | L3"));
    }

    #[test]
    fn test_detail_limit_truncates() {
        let outcomes = outcomes();
        let summary = RunSummary::build(&context(), &outcomes);
        let md = render_markdown(&summary, &outcomes, 0);

        assert!(md.contains("| *1 more changes* | | | |"));
        assert!(md.contains("- ... and 1 more"));
    }

    #[test]
    fn test_write_report_file() {
        let outcomes = outcomes();
        let summary = RunSummary::build(&context(), &outcomes);
        let dir = std::env::temp_dir().join(format!("master-diff-md-{}", uuid::Uuid::new_v4()));
        let path = dir.join("report.md");

        write_markdown_report(&path, &summary, &outcomes, 10).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Legend"));

        fs::remove_dir_all(&dir).ok();
    }
}
