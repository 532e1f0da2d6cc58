//! `compare` command arguments

pub mod handler;

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::diff::Side;

pub use handler::handle_compare_command;

#[derive(Args, Debug, Clone)]
pub struct CompareCommands {
    /// First workbook (file A, left-hand columns)
    pub first: PathBuf,

    /// Second workbook (file B, right-hand columns)
    pub second: PathBuf,

    /// Output xlsx path
    pub output: PathBuf,

    /// File whose row order the output follows [default: second, or config]
    #[arg(long, value_enum)]
    pub reference: Option<ReferenceArg>,

    /// Only compare this sheet (name or display name); repeatable
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheets: Vec<String>,

    /// Column label for the first file [default: its file name]
    #[arg(long)]
    pub first_label: Option<String>,

    /// Column label for the second file [default: its file name]
    #[arg(long)]
    pub second_label: Option<String>,

    /// Write a Markdown findings report
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Write every changed value as CSV
    #[arg(long, value_name = "PATH")]
    pub changes_csv: Option<PathBuf>,

    /// Print the run summary as JSON instead of the console summary
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Config file [default: <config dir>/master-diff/config.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReferenceArg {
    First,
    Second,
}

impl From<ReferenceArg> for Side {
    fn from(arg: ReferenceArg) -> Self {
        match arg {
            ReferenceArg::First => Side::A,
            ReferenceArg::Second => Side::B,
        }
    }
}
