//! Flags and exit handling shared by every diagnostic binary.
//!
//! Commands report failures on stdout and keep going. Whether a failure also
//! changes the process exit status is decided by the [`ExitPolicy`].

use std::process::ExitCode;

use clap::Args;
use text_probe::{CandidateList, TextEncoding};

use crate::telemetry::LogFormat;

/// How command failures map to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Always exit successfully; failures are only printed.
    #[default]
    Lenient,
    /// Exit with a failure status when any operation failed.
    Strict,
}

impl ExitPolicy {
    /// Whether `failures` failed operations should fail the process.
    #[must_use]
    pub const fn should_fail(self, failures: usize) -> bool {
        matches!(self, Self::Strict) && failures > 0
    }

    /// Exit status for a run with `failures` failed operations.
    #[must_use]
    pub const fn exit_code(self, failures: usize) -> ExitCode {
        if self.should_fail(failures) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Flags accepted by every diagnostic binary.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Exit with a failure status when any operation fails.
    #[arg(long)]
    pub strict: bool,
    /// Emit log events as JSON on stderr.
    #[arg(long = "log-json")]
    pub log_json: bool,
}

impl CommonArgs {
    /// Exit policy selected by `--strict`.
    #[must_use]
    pub const fn exit_policy(&self) -> ExitPolicy {
        if self.strict {
            ExitPolicy::Strict
        } else {
            ExitPolicy::Lenient
        }
    }

    /// Log format selected by `--log-json`.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Parse an `--encoding` value for clap.
///
/// # Errors
///
/// Returns the unsupported-label message when `raw` names no known encoding.
pub fn parse_encoding(raw: &str) -> Result<TextEncoding, String> {
    raw.parse().map_err(|err: text_probe::CandidateError| err.to_string())
}

/// Candidates given on the command line, or `fallback` when none were.
#[must_use]
pub fn candidates_or(encodings: Vec<TextEncoding>, fallback: CandidateList) -> CandidateList {
    CandidateList::new(encodings).unwrap_or(fallback)
}
