//! Rewrite a text file of uncertain encoding as UTF-8.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dispatch_diagnostics::cli::{CommonArgs, candidates_or, parse_encoding};
use dispatch_diagnostics::commands::run_transcode_text;
use dispatch_diagnostics::telemetry::init_tracing;
use text_probe::{BestEffortDecoder, CandidateList, TextEncoding};
use tracing::error;

/// `transcode-text` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "transcode-text",
    about = "Convert a text file to UTF-8",
    version
)]
struct CliArgs {
    /// Candidate encoding, tried in the order given. May be repeated.
    /// Defaults to `utf-16-le, utf-8`.
    #[arg(long = "encoding", value_name = "label", value_parser = parse_encoding)]
    encodings: Vec<TextEncoding>,
    /// Fail instead of writing UTF-8 with invalid bytes dropped.
    #[arg(long = "no-lossy")]
    no_lossy: bool,
    /// File to read.
    #[arg(value_name = "input")]
    input: PathBuf,
    /// File to write. Replaced atomically.
    #[arg(value_name = "output")]
    output: PathBuf,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.common.log_format());

    let candidates = candidates_or(args.encodings, CandidateList::utf16le_then_utf8());
    let decoder = BestEffortDecoder::new();
    let failures = run_transcode_text(
        &decoder,
        &args.input,
        &args.output,
        &candidates,
        !args.no_lossy,
        &mut io::stdout().lock(),
    )
    .unwrap_or_else(|err| {
        error!(error = %err, "failed to write output");
        1
    });
    args.common.exit_policy().exit_code(failures)
}
