//! `sheets` command: print the compiled sheet table

use anyhow::Result;
use colored::*;

use crate::config::sheets::SHEETS;

pub fn handle_sheets_command() -> Result<()> {
    println!("{}", "Compared sheets".bold());
    for sheet in SHEETS {
        println!(
            "  {} {:<22} keys: {}",
            format!("{:<26}", sheet.name).cyan(),
            sheet.display_name,
            sheet.key_columns.join(", ")
        );
    }
    Ok(())
}
