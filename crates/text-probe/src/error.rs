//! Error types for the text-probe crate.
//!
//! Every failure is a value with structured fields so command-line callers
//! can print one diagnostic line and tests can match on the failure kind.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::encoding::TextEncoding;

/// Errors raised while building a candidate encoding list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// The list contained no encodings.
    #[error("candidate encoding list must not be empty")]
    Empty,

    /// A label did not name a supported encoding.
    #[error("unsupported encoding label: '{label}'")]
    UnknownLabel {
        /// The label as supplied by the caller.
        label: String,
    },
}

/// Why a single candidate encoding was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The file could not be read for this attempt.
    Io {
        /// Description of the I/O error.
        message: String,
    },
    /// The bytes are not valid in the candidate encoding.
    Malformed,
    /// The bytes decoded cleanly but produced no text.
    Empty,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { message } => write!(f, "read failed: {message}"),
            Self::Malformed => f.write_str("malformed input"),
            Self::Empty => f.write_str("decoded to empty text"),
        }
    }
}

/// One rejected candidate, kept in the order it was tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Encoding that was tried.
    pub encoding: TextEncoding,
    /// Reason the encoding was rejected.
    pub failure: AttemptFailure,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.encoding, self.failure)
    }
}

/// Errors returned by the best-effort decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No candidate produced non-empty text.
    #[error("no candidate encoding could decode '{path}' ({})", join_attempts(.attempts))]
    NoMatchingEncoding {
        /// File that was decoded.
        path: PathBuf,
        /// Every rejected candidate in trial order.
        attempts: Vec<Attempt>,
    },

    /// The lossy fallback could not read the file.
    #[error("failed to read '{path}' for lossy decoding: {message}")]
    Read {
        /// File that was decoded.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Errors returned by the raw byte inspector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    /// The file could not be read.
    #[error("failed to read '{path}': {message}")]
    Read {
        /// File that was inspected.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Errors returned while transcoding a file to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The input could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The output could not be written.
    #[error("failed to write '{path}': {message}")]
    Write {
        /// Target path of the write.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

fn join_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
