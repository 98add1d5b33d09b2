//! Print text files decoded with the first candidate encoding that fits.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dispatch_diagnostics::cli::{CommonArgs, candidates_or, parse_encoding};
use dispatch_diagnostics::commands::run_decode_text;
use dispatch_diagnostics::telemetry::init_tracing;
use text_probe::{BestEffortDecoder, CandidateList, TextEncoding};
use tracing::error;

/// `decode-text` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "decode-text",
    about = "Decode text files by trying candidate encodings in order",
    long_about = "Decode text files by trying candidate encodings in order. \
        Printed text has CRLF and lone CR line endings shown as LF.",
    version
)]
struct CliArgs {
    /// Candidate encoding, tried in the order given. May be repeated.
    /// Defaults to `utf-8, utf-16, utf-16-le, cp1252`.
    #[arg(long = "encoding", value_name = "label", value_parser = parse_encoding)]
    encodings: Vec<TextEncoding>,
    /// Print undecodable files as UTF-8 with invalid bytes dropped.
    #[arg(long = "lossy-fallback")]
    lossy_fallback: bool,
    /// Files to decode.
    #[arg(value_name = "path", required = true)]
    paths: Vec<PathBuf>,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.common.log_format());

    let candidates = candidates_or(args.encodings, CandidateList::default());
    let decoder = BestEffortDecoder::new();
    let failures = run_decode_text(
        &decoder,
        &args.paths,
        &candidates,
        args.lossy_fallback,
        &mut io::stdout().lock(),
    )
    .unwrap_or_else(|err| {
        error!(error = %err, "failed to write output");
        1
    });
    args.common.exit_policy().exit_code(failures)
}
