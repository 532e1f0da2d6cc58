//! CSV export of every changed value

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::diff::SheetOutcome;

/// Write one row per changed value: sheet, key, column, value A, value B
pub fn write_changes<W: Write>(
    wtr: &mut Writer<W>,
    outcomes: &[SheetOutcome],
    label_a: &str,
    label_b: &str,
) -> Result<usize> {
    wtr.write_record(["Sheet", "Key", "Column", label_a, label_b])
        .context("Failed to write CSV header")?;

    let mut written = 0;
    for comparison in outcomes.iter().filter_map(SheetOutcome::comparison) {
        for change in &comparison.changes {
            let key = change.key.to_string();
            wtr.write_record([
                comparison.sheet.name,
                key.as_str(),
                change.column.as_str(),
                change.value_a.as_str(),
                change.value_b.as_str(),
            ])
            .with_context(|| format!("Failed to write change for key: {}", key))?;
            written += 1;
        }
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(written)
}

pub fn export_changes_csv(
    path: &Path,
    outcomes: &[SheetOutcome],
    label_a: &str,
    label_b: &str,
) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create CSV directory: {}", dir.display()))?;
    }
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let written = write_changes(&mut wtr, outcomes, label_a, label_b)?;

    log::info!("{} changed values exported to: {}", written, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::outcomes;

    #[test]
    fn test_changes_csv_content() {
        let mut wtr = Writer::from_writer(Vec::new());
        let written = write_changes(&mut wtr, &outcomes(), "old", "new").unwrap();
        assert_eq!(written, 1);

        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Sheet,Key,Column,old,new");
        assert_eq!(lines[1], "5 - Locations,X | L2,Location Name,Yard,Yard 2");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_export_creates_missing_directories() {
        let root = std::env::temp_dir().join(format!("master-diff-csv-{}", uuid::Uuid::new_v4()));
        let path = root.join("nested").join("changes.csv");

        export_changes_csv(&path, &outcomes(), "old", "new").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Sheet,Key,Column,old,new"));
        assert!(text.contains("Yard 2"));

        fs::remove_dir_all(&root).ok();
    }
}
