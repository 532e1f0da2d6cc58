//! Command-line interface

pub mod commands;

use clap::{ArgAction, Parser, Subcommand};

use commands::compare::CompareCommands;

#[derive(Parser)]
#[command(name = "master-diff")]
#[command(about = "Reconcile two master workbooks sheet by sheet on composite keys")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two workbooks and write a side-by-side workbook
    Compare(CompareCommands),
    /// List the compared sheets and their key columns
    Sheets,
}
