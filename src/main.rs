use clap::Parser;
use foldersort::cli::{Cli, run_cli};
use foldersort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
