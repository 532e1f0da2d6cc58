mod cli;
mod config;
mod diff;
mod excel;
mod report;

use std::process::ExitCode;

use clap::Parser;
use colored::*;
use env_logger::Env;

use cli::commands::compare::handle_compare_command;
use cli::commands::sheets::handle_sheets_command;
use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare(args) => handle_compare_command(args).map(|_| ()),
        Commands::Sheets => handle_sheets_command(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
