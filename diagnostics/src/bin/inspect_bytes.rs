//! Show file sizes and the leading raw bytes of each file.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dispatch_diagnostics::cli::CommonArgs;
use dispatch_diagnostics::commands::run_inspect_bytes;
use dispatch_diagnostics::telemetry::init_tracing;
use text_probe::DEFAULT_PREFIX_LEN;
use tracing::error;

/// `inspect-bytes` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "inspect-bytes",
    about = "Print file sizes and leading raw bytes",
    version
)]
struct CliArgs {
    /// Number of leading bytes to show.
    #[arg(long = "prefix", value_name = "bytes", default_value_t = DEFAULT_PREFIX_LEN)]
    prefix: usize,
    /// Files to inspect.
    #[arg(value_name = "path", required = true)]
    paths: Vec<PathBuf>,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.common.log_format());

    let failures = run_inspect_bytes(&args.paths, args.prefix, &mut io::stdout().lock())
        .unwrap_or_else(|err| {
            error!(error = %err, "failed to write output");
            1
        });
    args.common.exit_policy().exit_code(failures)
}
