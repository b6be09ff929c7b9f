//! oprun - Inspect and run targets with secrets from a reference file
//!
//! `run-lambda`, `run-tests` and `run-api` are the everyday entry points.
//! This tool answers "what would they do here?" and sets up config.

mod cli;

use clap::Parser;

use cli::Cli;

fn main() {
    oprun_core::logging::init();

    let cli = Cli::parse();

    let code = match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    };

    std::process::exit(code);
}
