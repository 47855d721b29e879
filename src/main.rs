//! Roadmap CLI - Local-first product roadmap and milestone planning

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = roadmap_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
