//! Console summary of a compare run

use colored::*;

use super::{RunSummary, SheetSummary};
use crate::diff::analysis::HeaderCheck;

pub fn print_summary(summary: &RunSummary) {
    println!(
        "{} {} ({}) vs {} ({})",
        "Compared".bold(),
        summary.first_file.cyan(),
        summary.label_a,
        summary.second_file.cyan(),
        summary.label_b
    );
    println!("Row order follows the {} file", summary.reference);
    println!();

    for sheet in &summary.sheets {
        println!("{}", sheet_line(sheet));
        for warning in header_warnings(sheet) {
            println!("    {}", warning.yellow());
        }
    }

    println!();
    let totals = &summary.totals;
    let line = format!(
        "Total: {} rows, {} same, {} changed, {} A-only, {} B-only",
        totals.total(),
        totals.same,
        totals.changed,
        totals.a_only,
        totals.b_only
    );
    if totals.has_differences() {
        println!("{}", line.bold());
    } else {
        println!("{}", line.green().bold());
    }
}

fn sheet_line(sheet: &SheetSummary) -> String {
    if let Some(reason) = sheet.skipped {
        return format!("  {:<24} {}", sheet.display_name, format!("skipped ({})", reason).dimmed());
    }

    let c = &sheet.counts;
    format!(
        "  {:<24} {} same, {} changed, {} A-only, {} B-only",
        sheet.display_name,
        c.same,
        colorize(c.changed, Color::Red),
        colorize(c.a_only, Color::Blue),
        colorize(c.b_only, Color::Green)
    )
}

fn colorize(count: usize, color: Color) -> ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().color(color).bold()
    }
}

fn header_warnings(sheet: &SheetSummary) -> Vec<String> {
    let mut warnings = Vec::new();
    for (side, check) in [("first", &sheet.header_a), ("second", &sheet.header_b)] {
        let Some(check) = check.as_ref().filter(|c| !c.is_ok()) else {
            continue;
        };
        match check {
            HeaderCheck::MissingKeyColumns { missing } => {
                warnings.push(format!("{} file lacks key column(s): {}", side, missing.join(", ")));
            }
            HeaderCheck::OrderMismatch { .. } => {
                warnings.push(format!("{} file has a different column order", side));
            }
            HeaderCheck::SheetNotFound => {
                warnings.push(format!("sheet missing from the {} file", side));
            }
            HeaderCheck::Ok | HeaderCheck::NoReference => {}
        }
    }
    for (side, count) in [("first", sheet.duplicate_keys_a), ("second", sheet.duplicate_keys_b)] {
        if count > 0 {
            warnings.push(format!("{} duplicate key(s) in the {} file", count, side));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::{context, outcomes};

    #[test]
    fn test_sheet_lines() {
        let summary = RunSummary::build(&context(), &outcomes());

        let skipped = sheet_line(&summary.sheets[0]);
        assert!(skipped.contains("Vehicles"));
        assert!(skipped.contains("not found in either file"));

        let compared = sheet_line(&summary.sheets[1]);
        assert!(compared.contains("Locations"));
        assert!(compared.contains("changed"));
        assert!(header_warnings(&summary.sheets[1]).is_empty());
    }
}
