//! Entry point for the dupelink CLI.

use clap::Parser;
use dupelink::{cli::Cli, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match dupelink::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
