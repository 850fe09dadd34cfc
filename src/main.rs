//! `hardval` — Hardening policy loader and validator

use clap::Parser;

use hardval::cli::args::Cli;
use hardval::cli::commands;
use hardval::error::{ExitCode, HardvalError};
use hardval::observability::init_logging;

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            match &e {
                HardvalError::Policy(policy_err) => {
                    eprintln!("error[{}]: {policy_err}", policy_err.kind());
                }
                other => eprintln!("error: {other}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}
