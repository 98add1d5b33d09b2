//! `transcode-text`: rewrite a file as UTF-8.

use std::io::{self, Write};
use std::path::Path;

use text_probe::{BestEffortDecoder, ByteSource, CandidateList, transcode_with};
use tracing::warn;

use super::quality_marker;

/// Convert `input` to UTF-8 at `output`, reporting the encoding used.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub fn run_transcode_text<S: ByteSource>(
    decoder: &BestEffortDecoder<S>,
    input: &Path,
    output: &Path,
    candidates: &CandidateList,
    allow_lossy: bool,
    out: &mut impl Write,
) -> io::Result<usize> {
    match transcode_with(decoder, input, output, candidates, allow_lossy) {
        Ok(decoded) => {
            let marker = quality_marker(decoded.quality);
            writeln!(
                out,
                "Converted {} -> {} (encoding: {}{marker})",
                input.display(),
                output.display(),
                decoded.encoding
            )?;
            Ok(0)
        }
        Err(err) => {
            warn!(error = %err, "transcode failed");
            writeln!(out, "Error: {err}")?;
            Ok(1)
        }
    }
}
