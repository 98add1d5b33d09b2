//! Dump dispatch users and drivers from PostgreSQL, then describe relations.
//!
//! Connection settings come from `DB_*` environment variables, optionally
//! seeded from an env file.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dispatch_diagnostics::cli::CommonArgs;
use dispatch_diagnostics::commands::run_db_snapshot;
use dispatch_diagnostics::config::load_connection_params;
use dispatch_diagnostics::postgres_reporter;
use dispatch_diagnostics::telemetry::init_tracing;
use tracing::error;

const PROGRAM: &str = "db-snapshot";

/// `db-snapshot` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "db-snapshot",
    about = "Dump dispatch users and drivers and describe relations",
    version
)]
struct CliArgs {
    /// Env file read before `DB_*` settings. Defaults to `.env` when present.
    #[arg(long = "env-file", value_name = "path")]
    env_file: Option<PathBuf>,
    /// Relation to describe after the dump. May be repeated.
    #[arg(long = "describe", value_name = "relation")]
    describe: Vec<String>,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.common.log_format());

    let failures = run(&args, &mut io::stdout().lock()).unwrap_or_else(|err| {
        error!(error = %err, "failed to write output");
        1
    });
    args.common.exit_policy().exit_code(failures)
}

fn run(args: &CliArgs, out: &mut impl Write) -> io::Result<usize> {
    let params = match load_connection_params(PROGRAM, args.env_file.as_deref()) {
        Ok(params) => params,
        Err(err) => {
            error!(error = %err, "database settings rejected");
            writeln!(out, "ERROR: {err}")?;
            return Ok(1);
        }
    };
    run_db_snapshot(&postgres_reporter(params), &args.describe, out)
}
