//! portsweep - a concurrent TCP port scanner.

use anyhow::Context;
use clap::Parser;
use portsweep::cli::Args;
use portsweep::logging::init_logging;
use portsweep::output::print_error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose, args.quiet) {
        print_error(&format!("{e:#}"));
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
    {
        Ok(rt) => rt,
        Err(e) => {
            print_error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(args.execute()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}
