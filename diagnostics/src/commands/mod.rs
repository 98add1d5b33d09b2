//! Command runners behind the diagnostic binaries.
//!
//! Each runner writes human-readable output to the supplied writer, reports
//! failures inline, continues with the next independent input, and returns
//! how many operations failed. Only a failure to write output is returned as
//! an error. Binaries pass stdout; tests pass a buffer.

mod db_snapshot;
mod decode_text;
mod inspect_bytes;
mod transcode_text;

use text_probe::DecodeQuality;

pub use db_snapshot::run_db_snapshot;
pub use decode_text::run_decode_text;
pub use inspect_bytes::run_inspect_bytes;
pub use transcode_text::run_transcode_text;

/// Suffix appended to the encoding label in command output.
const fn quality_marker(quality: DecodeQuality) -> &'static str {
    match quality {
        DecodeQuality::Exact => "",
        DecodeQuality::Lossy => ", lossy",
    }
}
