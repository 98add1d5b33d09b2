//! Best-effort decoding of a file with an ordered list of candidate encodings.
//!
//! Each candidate gets a fresh read of the file. The first candidate that
//! decodes strictly to non-empty text wins; read failures, malformed input,
//! and empty text all move on to the next candidate. When every candidate is
//! rejected the caller receives [`DecodeError::NoMatchingEncoding`] with one
//! [`Attempt`] per candidate.

use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::candidates::CandidateList;
use crate::encoding::TextEncoding;
use crate::error::{Attempt, AttemptFailure, DecodeError};
use crate::fs_access;

/// Source of raw file bytes for the decoder.
pub trait ByteSource {
    /// Read the entire content of `path`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while opening or reading the file.
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads files from the local filesystem through `cap-std` directory handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientFileSource;

impl ByteSource for AmbientFileSource {
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs_access::read_bytes(path)
    }
}

/// How faithfully the text reflects the file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeQuality {
    /// Every byte was decoded by the reported encoding.
    Exact,
    /// Invalid UTF-8 sequences were dropped.
    Lossy,
}

/// Text recovered from a file and the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded text.
    pub text: String,
    /// Encoding that produced `text`.
    pub encoding: TextEncoding,
    /// Whether the decode was strict or lossy.
    pub quality: DecodeQuality,
}

/// Tries candidate encodings in order and keeps the first non-empty success.
#[derive(Debug, Clone, Default)]
pub struct BestEffortDecoder<S = AmbientFileSource> {
    source: S,
}

impl BestEffortDecoder<AmbientFileSource> {
    /// Decoder reading from the local filesystem.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source: AmbientFileSource,
        }
    }
}

impl<S: ByteSource> BestEffortDecoder<S> {
    /// Decoder reading through a custom byte source.
    pub const fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Decode `path` with the first candidate that yields non-empty text.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NoMatchingEncoding`] when every candidate
    /// fails to read, fails to decode, or decodes to empty text.
    pub fn decode(&self, path: &Path, candidates: &CandidateList) -> Result<Decoded, DecodeError> {
        let mut attempts = Vec::with_capacity(candidates.len());
        for encoding in candidates.iter() {
            match self.attempt(path, encoding) {
                Ok(text) => {
                    info!(path = %path.display(), %encoding, "decoded file");
                    return Ok(Decoded {
                        text,
                        encoding,
                        quality: DecodeQuality::Exact,
                    });
                }
                Err(failure) => {
                    debug!(path = %path.display(), %encoding, %failure, "candidate rejected");
                    attempts.push(Attempt { encoding, failure });
                }
            }
        }

        warn!(path = %path.display(), %candidates, "no candidate encoding matched");
        Err(DecodeError::NoMatchingEncoding {
            path: path.to_path_buf(),
            attempts,
        })
    }

    /// Decode strictly, falling back to UTF-8 with invalid sequences dropped.
    ///
    /// The fallback accepts any bytes, so an empty file yields empty lossy
    /// text rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Read`] when the fallback cannot read the file.
    pub fn decode_or_lossy(
        &self,
        path: &Path,
        candidates: &CandidateList,
    ) -> Result<Decoded, DecodeError> {
        if let Ok(decoded) = self.decode(path, candidates) {
            return Ok(decoded);
        }

        let bytes = self
            .source
            .read_bytes(path)
            .map_err(|error| DecodeError::Read {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        info!(path = %path.display(), "decoded file with lossy utf-8 fallback");
        Ok(Decoded {
            text: decode_utf8_lossy(&bytes),
            encoding: TextEncoding::Utf8,
            quality: DecodeQuality::Lossy,
        })
    }

    fn attempt(&self, path: &Path, encoding: TextEncoding) -> Result<String, AttemptFailure> {
        let bytes = self
            .source
            .read_bytes(path)
            .map_err(|error| AttemptFailure::Io {
                message: error.to_string(),
            })?;
        let text = encoding.decode(&bytes).ok_or(AttemptFailure::Malformed)?;
        if text.is_empty() {
            return Err(AttemptFailure::Empty);
        }
        Ok(text.into_owned())
    }
}

/// Decode `bytes` as UTF-8, dropping every invalid sequence.
///
/// # Examples
///
/// ```
/// use text_probe::decode_utf8_lossy;
///
/// assert_eq!(decode_utf8_lossy(b"ok\xff\xfe!"), "ok!");
/// ```
#[must_use]
pub fn decode_utf8_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Decode the file at `path` from the local filesystem.
///
/// # Errors
///
/// See [`BestEffortDecoder::decode`].
pub fn decode_file(path: &Path, candidates: &CandidateList) -> Result<Decoded, DecodeError> {
    BestEffortDecoder::new().decode(path, candidates)
}

/// Decode the file at `path`, falling back to lossy UTF-8.
///
/// # Errors
///
/// See [`BestEffortDecoder::decode_or_lossy`].
pub fn decode_file_or_lossy(
    path: &Path,
    candidates: &CandidateList,
) -> Result<Decoded, DecodeError> {
    BestEffortDecoder::new().decode_or_lossy(path, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Replays one scripted read result per call.
    struct ScriptedSource {
        reads: RefCell<VecDeque<io::Result<Vec<u8>>>>,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn new(reads: impl IntoIterator<Item = io::Result<Vec<u8>>>) -> Self {
            Self {
                reads: RefCell::new(reads.into_iter().collect()),
                calls: Cell::new(0),
            }
        }
    }

    impl ByteSource for ScriptedSource {
        fn read_bytes(&self, _path: &Path) -> io::Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            self.reads
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::other("script exhausted")))
        }
    }

    #[fixture]
    fn path() -> PathBuf {
        PathBuf::from("check-out.txt")
    }

    fn constant(bytes: &[u8], times: usize) -> ScriptedSource {
        ScriptedSource::new((0..times).map(|_| Ok(bytes.to_vec())))
    }

    #[rstest]
    fn first_clean_candidate_wins(path: PathBuf) {
        let decoder = BestEffortDecoder::with_source(constant(b"plain ascii", 4));

        let decoded = decoder
            .decode(&path, &CandidateList::default())
            .expect("utf-8 decodes ascii");

        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "plain ascii");
        assert_eq!(decoded.quality, DecodeQuality::Exact);
        assert_eq!(decoder.source.calls.get(), 1);
    }

    #[rstest]
    fn utf16_bom_file_falls_through_to_utf16(path: PathBuf) {
        let decoder = BestEffortDecoder::with_source(constant(b"\xff\xfeH\x00i\x00", 4));

        let decoded = decoder
            .decode(&path, &CandidateList::default())
            .expect("utf-16 decodes");

        assert_eq!(decoded.encoding, TextEncoding::Utf16);
        assert_eq!(decoded.text, "Hi");
        assert_eq!(decoder.source.calls.get(), 2);
    }

    #[rstest]
    fn read_failure_moves_to_next_candidate(path: PathBuf) {
        let source = ScriptedSource::new([
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")),
            Ok(b"second read".to_vec()),
        ]);
        let decoder = BestEffortDecoder::with_source(source);
        let candidates =
            CandidateList::new([TextEncoding::Utf8, TextEncoding::Latin1]).expect("non-empty");

        let decoded = decoder.decode(&path, &candidates).expect("second attempt");

        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text, "second read");
    }

    #[rstest]
    fn empty_text_is_not_a_match(path: PathBuf) {
        let decoder = BestEffortDecoder::with_source(constant(b"", 4));

        let err = decoder
            .decode(&path, &CandidateList::default())
            .expect_err("empty file never matches");

        let DecodeError::NoMatchingEncoding { attempts, .. } = err else {
            panic!("expected no matching encoding");
        };
        assert_eq!(attempts.len(), 4);
        assert!(attempts.iter().all(|attempt| attempt.failure == AttemptFailure::Empty));
    }

    #[rstest]
    fn exhausted_candidates_record_every_attempt(path: PathBuf) {
        let decoder = BestEffortDecoder::with_source(constant(b"a\x81b", 2));
        let candidates =
            CandidateList::new([TextEncoding::Utf8, TextEncoding::Cp1252]).expect("non-empty");

        let err = decoder.decode(&path, &candidates).expect_err("undecodable");

        assert_eq!(
            err,
            DecodeError::NoMatchingEncoding {
                path,
                attempts: vec![
                    Attempt {
                        encoding: TextEncoding::Utf8,
                        failure: AttemptFailure::Malformed,
                    },
                    Attempt {
                        encoding: TextEncoding::Cp1252,
                        failure: AttemptFailure::Malformed,
                    },
                ],
            }
        );
    }

    #[rstest]
    fn lossy_fallback_drops_invalid_bytes(path: PathBuf) {
        let decoder = BestEffortDecoder::with_source(constant(b"ok\xffdone", 2));
        let candidates = CandidateList::new([TextEncoding::Utf8]).expect("non-empty");

        let decoded = decoder
            .decode_or_lossy(&path, &candidates)
            .expect("lossy always decodes");

        assert_eq!(decoded.text, "okdone");
        assert_eq!(decoded.quality, DecodeQuality::Lossy);
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
    }

    #[rstest]
    fn lossy_fallback_surfaces_read_failures(path: PathBuf) {
        let decoder = BestEffortDecoder::with_source(ScriptedSource::new([]));
        let candidates = CandidateList::new([TextEncoding::Utf8]).expect("non-empty");

        let err = decoder
            .decode_or_lossy(&path, &candidates)
            .expect_err("nothing readable");

        assert!(matches!(err, DecodeError::Read { .. }));
    }

    #[test]
    fn lossy_decoding_keeps_valid_multibyte_text() {
        assert_eq!(decode_utf8_lossy("żółw".as_bytes()), "żółw");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_decodes_from_its_target() {
        let root = tempfile::tempdir().expect("temp dir");
        let target = root.path().join("backend-log.txt");
        std::fs::write(&target, b"hello").expect("write target");
        std::fs::create_dir(root.path().join("links")).expect("links dir");
        let link = root.path().join("links").join("log.txt");
        std::os::unix::fs::symlink(&target, &link).expect("create symlink");

        let decoded = decode_file(&link, &CandidateList::default()).expect("decodes via link");

        assert_eq!(decoded.text, "hello");
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
    }
}
