//! Best-effort text decoding and raw byte inspection for diagnostic files.
//!
//! Log and dump files captured while debugging often arrive in whatever
//! encoding the producing shell preferred. This crate recovers their text by
//! trying an ordered list of candidate encodings, and shows the raw bytes
//! when nothing fits.
//!
//! # Overview
//!
//! - [`TextEncoding`]: the supported encodings and their strict decoders
//! - [`CandidateList`]: a non-empty, ordered preference list
//! - [`decode_file`]: first non-empty strict decode wins
//! - [`decode_file_or_lossy`]: the same, with a lossy UTF-8 fallback
//! - [`inspect`]: file size and leading bytes
//! - [`transcode_to_utf8`]: decode and atomically rewrite as UTF-8
//!
//! # Example
//!
//! ```
//! use text_probe::{CandidateList, TextEncoding, decode_file};
//!
//! let dir = tempfile::tempdir().expect("temp dir");
//! let path = dir.path().join("fix-out.txt");
//! std::fs::write(&path, b"\xff\xfeH\x00i\x00").expect("write fixture");
//!
//! let decoded = decode_file(&path, &CandidateList::default()).expect("decodes");
//!
//! assert_eq!(decoded.text, "Hi");
//! assert_eq!(decoded.encoding, TextEncoding::Utf16);
//! ```

mod atomic_io;
mod candidates;
mod decoder;
mod encoding;
mod error;
mod fs_access;
mod inspector;
mod transcode;

pub use candidates::CandidateList;
pub use decoder::{
    AmbientFileSource, BestEffortDecoder, ByteSource, DecodeQuality, Decoded, decode_file,
    decode_file_or_lossy, decode_utf8_lossy,
};
pub use encoding::TextEncoding;
pub use error::{Attempt, AttemptFailure, CandidateError, DecodeError, InspectError, TranscodeError};
pub use inspector::{ByteReport, DEFAULT_PREFIX_LEN, bytes_literal, inspect};
pub use transcode::{transcode_to_utf8, transcode_with};
