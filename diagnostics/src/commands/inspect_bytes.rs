//! `inspect-bytes`: print file sizes and leading raw bytes.

use std::io::{self, Write};
use std::path::PathBuf;

use text_probe::inspect;
use tracing::warn;

/// Inspect each path in turn, showing at most `prefix_len` leading bytes.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub fn run_inspect_bytes(
    paths: &[PathBuf],
    prefix_len: usize,
    out: &mut impl Write,
) -> io::Result<usize> {
    let mut failures = 0;

    for path in paths {
        match inspect(path, prefix_len) {
            Ok(report) => writeln!(out, "{report}")?,
            Err(err) => {
                warn!(error = %err, "inspection failed");
                writeln!(out, "Error: {err}")?;
                failures += 1;
            }
        }
    }

    Ok(failures)
}
