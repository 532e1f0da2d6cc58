//! Compare command handler

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use is_terminal::IsTerminal;

use super::CompareCommands;
use crate::config::Config;
use crate::config::sheets::select_sheets;
use crate::diff::{SheetComparison, SheetOutcome, Side, compare_sheet};
use crate::excel::{WorkbookSource, write_comparison_workbook};
use crate::report::changes_csv::export_changes_csv;
use crate::report::markdown::write_markdown_report;
use crate::report::{RunContext, RunSummary, console};

/// Run a comparison and write every requested output
pub fn handle_compare_command(args: CompareCommands) -> Result<RunSummary> {
    if args.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    validate_paths(&args)?;

    let config = Config::load(args.config.as_deref())?;
    let reference = args.reference.map(Into::into).unwrap_or(config.reference);
    let sheets = select_sheets(&args.sheets)?;

    let mut source_a = WorkbookSource::open(&args.first)?;
    let mut source_b = WorkbookSource::open(&args.second)?;

    let mut outcomes = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let a = source_a.load_sheet(sheet, config.header_lookahead)?;
        let b = source_b.load_sheet(sheet, config.header_lookahead)?;
        let outcome = compare_sheet(sheet, a.as_ref(), b.as_ref(), reference);
        if let SheetOutcome::Skipped { reason, .. } = &outcome {
            log::warn!("Skipping sheet '{}': {}", sheet.name, reason);
        }
        outcomes.push(outcome);
    }

    let compared: Vec<&SheetComparison> =
        outcomes.iter().filter_map(SheetOutcome::comparison).collect();
    if compared.is_empty() {
        bail!(
            "No sheet could be compared: none of the configured sheets has data in {} or {}",
            source_a.path().display(),
            source_b.path().display()
        );
    }

    let context = RunContext::new(
        &args.first,
        &args.second,
        args.first_label.clone(),
        args.second_label.clone(),
        reference,
    )?;

    write_comparison_workbook(
        &args.output,
        &compared,
        context.label(Side::A),
        context.label(Side::B),
        &config.output,
    )?;

    let summary = RunSummary::build(&context, &outcomes);

    if let Some(path) = &args.report {
        write_markdown_report(path, &summary, &outcomes, config.report.detail_limit)?;
    }
    if let Some(path) = &args.changes_csv {
        export_changes_csv(path, &outcomes, context.label(Side::A), context.label(Side::B))?;
    }

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
        println!("{}", json);
    } else {
        console::print_summary(&summary);
        println!("\nOutput written to {}", args.output.display());
    }

    Ok(summary)
}

fn validate_paths(args: &CompareCommands) -> Result<()> {
    for input in [&args.first, &args.second] {
        if !input.exists() {
            bail!("Input file does not exist: {}", input.display());
        }
    }

    let is_xlsx = args
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        bail!("Output file must have an .xlsx extension: {}", args.output.display());
    }

    let output = absolute(&args.output)?;
    for input in [&args.first, &args.second] {
        if absolute(input)? == output {
            bail!("Output path would overwrite input file: {}", input.display());
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("Failed to resolve path: {}", path.display())),
    }
}
