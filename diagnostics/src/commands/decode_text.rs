//! `decode-text`: print files decoded with the first matching encoding.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;

use text_probe::{BestEffortDecoder, ByteSource, CandidateList, DecodeError};
use tracing::warn;

use super::quality_marker;

/// Decode each path in turn and print its text under an encoding banner.
///
/// Printed text has `\r\n` and lone `\r` line endings translated to `\n`.
/// With `lossy_fallback`, files no candidate accepts are printed as UTF-8
/// with invalid sequences dropped.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub fn run_decode_text<S: ByteSource>(
    decoder: &BestEffortDecoder<S>,
    paths: &[PathBuf],
    candidates: &CandidateList,
    lossy_fallback: bool,
    out: &mut impl Write,
) -> io::Result<usize> {
    let mut failures = 0;

    for path in paths {
        let result = if lossy_fallback {
            decoder.decode_or_lossy(path, candidates)
        } else {
            decoder.decode(path, candidates)
        };

        match result {
            Ok(decoded) => {
                let marker = quality_marker(decoded.quality);
                writeln!(
                    out,
                    "--- Content (encoding: {}{marker}) ---",
                    decoded.encoding
                )?;
                writeln!(out, "{}", universal_newlines(&decoded.text))?;
            }
            Err(err @ DecodeError::NoMatchingEncoding { .. }) => {
                warn!(error = %err, "decode failed");
                writeln!(
                    out,
                    "Could not read {} with any common encoding.",
                    path.display()
                )?;
                failures += 1;
            }
            Err(err) => {
                writeln!(out, "Error: {err}")?;
                failures += 1;
            }
        }
    }

    Ok(failures)
}

/// Translate `\r\n` and lone `\r` line endings to `\n`.
fn universal_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
