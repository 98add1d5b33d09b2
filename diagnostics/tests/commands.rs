//! End-to-end tests for the file-based command runners.
//!
//! Each test writes fixtures to a scratch directory, runs a command into a
//! buffer, and checks both the printed report and the failure count.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::fs;
use std::path::{Path, PathBuf};

use dispatch_diagnostics::commands::{run_decode_text, run_inspect_bytes, run_transcode_text};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use text_probe::{BestEffortDecoder, CandidateList};

#[fixture]
fn scratch() -> TempDir {
    tempfile::tempdir().expect("create scratch dir")
}

fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn output_of(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("command output is utf-8")
}

#[rstest]
fn decode_text_prints_banner_then_content(scratch: TempDir) {
    let path = write(scratch.path(), "notes.txt", b"dispatch log");
    let mut buffer = Vec::new();

    let failures = run_decode_text(
        &BestEffortDecoder::new(),
        &[path],
        &CandidateList::default(),
        false,
        &mut buffer,
    )
    .expect("write to buffer");

    assert_eq!(failures, 0);
    assert_eq!(
        output_of(buffer),
        "--- Content (encoding: utf-8) ---\ndispatch log\n"
    );
}

#[rstest]
fn decode_text_reports_each_undecodable_file_and_continues(scratch: TempDir) {
    let empty = write(scratch.path(), "empty.txt", b"");
    let missing = scratch.path().join("missing.txt");
    let good = write(scratch.path(), "good.txt", b"ok");
    let mut buffer = Vec::new();

    let failures = run_decode_text(
        &BestEffortDecoder::new(),
        &[empty.clone(), missing.clone(), good],
        &CandidateList::default(),
        false,
        &mut buffer,
    )
    .expect("write to buffer");

    assert_eq!(failures, 2);
    let output = output_of(buffer);
    assert!(output.contains(&format!(
        "Could not read {} with any common encoding.",
        empty.display()
    )));
    assert!(output.contains(&format!(
        "Could not read {} with any common encoding.",
        missing.display()
    )));
    assert!(output.ends_with("--- Content (encoding: utf-8) ---\nok\n"));
}

#[rstest]
fn decode_text_lossy_fallback_marks_output(scratch: TempDir) {
    let path = write(scratch.path(), "broken.txt", b"ok\xff!");
    let candidates = CandidateList::parse(["utf-8"]).expect("known label");
    let mut buffer = Vec::new();

    let failures = run_decode_text(
        &BestEffortDecoder::new(),
        &[path],
        &candidates,
        true,
        &mut buffer,
    )
    .expect("write to buffer");

    assert_eq!(failures, 0);
    assert_eq!(
        output_of(buffer),
        "--- Content (encoding: utf-8, lossy) ---\nok!\n"
    );
}

#[rstest]
fn inspect_bytes_prints_size_and_prefix(scratch: TempDir) {
    let path = write(scratch.path(), "bom.txt", b"\xff\xfeH\x00i\x00");
    let mut buffer = Vec::new();

    let failures = run_inspect_bytes(&[path], 4, &mut buffer).expect("write to buffer");

    assert_eq!(failures, 0);
    assert_eq!(
        output_of(buffer),
        "File size: 6\nRaw bytes (first 4): b'\\xff\\xfeH\\x00'\n"
    );
}

#[rstest]
fn inspect_bytes_reports_missing_file(scratch: TempDir) {
    let missing = scratch.path().join("missing.bin");
    let present = write(scratch.path(), "present.bin", b"abc");
    let mut buffer = Vec::new();

    let failures =
        run_inspect_bytes(&[missing, present], 100, &mut buffer).expect("write to buffer");

    assert_eq!(failures, 1);
    let output = output_of(buffer);
    assert!(output.starts_with("Error: failed to read "));
    assert!(output.ends_with("File size: 3\nRaw bytes (first 100): b'abc'\n"));
}

#[rstest]
fn transcode_text_writes_utf8_output(scratch: TempDir) {
    let input = write(scratch.path(), "wide.txt", b"H\x00i\x00");
    let output = scratch.path().join("narrow.txt");
    let mut buffer = Vec::new();

    let failures = run_transcode_text(
        &BestEffortDecoder::new(),
        &input,
        &output,
        &CandidateList::utf16le_then_utf8(),
        true,
        &mut buffer,
    )
    .expect("write to buffer");

    assert_eq!(failures, 0);
    assert_eq!(fs::read(&output).expect("read output"), b"Hi");
    assert_eq!(
        output_of(buffer),
        format!(
            "Converted {} -> {} (encoding: utf-16-le)\n",
            input.display(),
            output.display()
        )
    );
}

#[rstest]
fn transcode_text_without_lossy_leaves_no_output(scratch: TempDir) {
    let input = write(scratch.path(), "empty.txt", b"");
    let output = scratch.path().join("out.txt");
    let mut buffer = Vec::new();

    let failures = run_transcode_text(
        &BestEffortDecoder::new(),
        &input,
        &output,
        &CandidateList::utf16le_then_utf8(),
        false,
        &mut buffer,
    )
    .expect("write to buffer");

    assert_eq!(failures, 1);
    assert!(output_of(buffer).starts_with("Error: no candidate encoding could decode"));
    assert!(!output.exists());
}

#[cfg(unix)]
#[rstest]
fn file_commands_follow_symlinks_to_other_directories(scratch: TempDir) {
    let captures = scratch.path().join("captures");
    let links = scratch.path().join("links");
    fs::create_dir(&captures).expect("captures dir");
    fs::create_dir(&links).expect("links dir");
    let target = write(&captures, "backend-log.txt", b"hello");
    let link = links.join("log.txt");
    std::os::unix::fs::symlink(&target, &link).expect("create symlink");
    let paths = [link];

    let mut decoded = Vec::new();
    let decode_failures = run_decode_text(
        &BestEffortDecoder::new(),
        &paths,
        &CandidateList::default(),
        false,
        &mut decoded,
    )
    .expect("write to buffer");
    let mut inspected = Vec::new();
    let inspect_failures =
        run_inspect_bytes(&paths, 100, &mut inspected).expect("write to buffer");

    assert_eq!(decode_failures, 0);
    assert_eq!(output_of(decoded), "--- Content (encoding: utf-8) ---\nhello\n");
    assert_eq!(inspect_failures, 0);
    assert_eq!(
        output_of(inspected),
        "File size: 5\nRaw bytes (first 100): b'hello'\n"
    );
}

#[rstest]
fn decode_text_prints_crlf_captures_with_plain_newlines(scratch: TempDir) {
    let path = write(scratch.path(), "check-out.txt", b"\xff\xfea\x00\r\x00\n\x00");
    let mut buffer = Vec::new();

    let failures = run_decode_text(
        &BestEffortDecoder::new(),
        &[path],
        &CandidateList::default(),
        false,
        &mut buffer,
    )
    .expect("write to buffer");

    assert_eq!(failures, 0);
    assert_eq!(
        output_of(buffer),
        "--- Content (encoding: utf-16) ---\na\n\n"
    );
}
