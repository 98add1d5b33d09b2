//! Rewrite a file in another encoding as UTF-8.

use std::path::Path;

use tracing::info;

use crate::atomic_io::write_atomic;
use crate::candidates::CandidateList;
use crate::decoder::{BestEffortDecoder, ByteSource, Decoded};
use crate::error::TranscodeError;

/// Decode `input` and write its text to `output` as UTF-8.
///
/// With `allow_lossy`, input that no candidate accepts is decoded as UTF-8
/// with invalid sequences dropped. The output is replaced atomically, so an
/// existing file is either left untouched or fully rewritten.
///
/// # Errors
///
/// Returns [`TranscodeError::Decode`] when the input cannot be decoded and
/// [`TranscodeError::Write`] when the output cannot be written.
pub fn transcode_to_utf8(
    input: &Path,
    output: &Path,
    candidates: &CandidateList,
    allow_lossy: bool,
) -> Result<Decoded, TranscodeError> {
    transcode_with(&BestEffortDecoder::new(), input, output, candidates, allow_lossy)
}

/// [`transcode_to_utf8`] reading through a caller-supplied decoder.
///
/// # Errors
///
/// See [`transcode_to_utf8`].
pub fn transcode_with<S: ByteSource>(
    decoder: &BestEffortDecoder<S>,
    input: &Path,
    output: &Path,
    candidates: &CandidateList,
    allow_lossy: bool,
) -> Result<Decoded, TranscodeError> {
    let decoded = if allow_lossy {
        decoder.decode_or_lossy(input, candidates)?
    } else {
        decoder.decode(input, candidates)?
    };

    write_atomic(output, decoded.text.as_bytes())?;
    info!(
        input = %input.display(),
        output = %output.display(),
        encoding = %decoded.encoding,
        "transcoded file to utf-8"
    );
    Ok(decoded)
}
