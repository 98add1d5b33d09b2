//! Raw byte inspection for files that do not decode cleanly.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::InspectError;
use crate::fs_access;

/// Default number of leading bytes shown by [`inspect`].
pub const DEFAULT_PREFIX_LEN: usize = 100;

/// Size and leading bytes of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteReport {
    path: PathBuf,
    size: usize,
    prefix_len: usize,
    prefix: Vec<u8>,
}

impl ByteReport {
    /// File that was inspected.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total file length in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Leading bytes, at most the requested prefix length.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }
}

impl fmt::Display for ByteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File size: {}", self.size)?;
        write!(
            f,
            "Raw bytes (first {}): {}",
            self.prefix_len,
            bytes_literal(&self.prefix)
        )
    }
}

/// Read `path` as uninterpreted bytes and keep the first `prefix_len`.
///
/// # Errors
///
/// Returns [`InspectError::Read`] when the file cannot be opened or read.
pub fn inspect(path: &Path, prefix_len: usize) -> Result<ByteReport, InspectError> {
    let mut prefix = fs_access::read_bytes(path).map_err(|error| InspectError::Read {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let size = prefix.len();
    prefix.truncate(prefix_len);
    info!(path = %path.display(), size, "inspected file bytes");

    Ok(ByteReport {
        path: path.to_path_buf(),
        size,
        prefix_len,
        prefix,
    })
}

/// Render bytes as a bytes literal, quotes included.
///
/// Single quotes delimit the literal unless the bytes contain `'` and no
/// `"`, in which case double quotes are used and `'` is left bare. Only the
/// delimiter and backslash are escaped among printable ASCII.
///
/// # Examples
///
/// ```
/// use text_probe::bytes_literal;
///
/// assert_eq!(bytes_literal(b"\xff\xfeH\x00"), r"b'\xff\xfeH\x00'");
/// assert_eq!(bytes_literal(b"it's\r\n"), r#"b"it's\r\n""#);
/// assert_eq!(bytes_literal(b"'\""), r#"b'\'"'"#);
/// ```
#[must_use]
pub fn bytes_literal(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut literal = String::with_capacity(bytes.len() + 3);
    literal.push('b');
    literal.push(char::from(quote));
    for &byte in bytes {
        match byte {
            b'\\' => literal.push_str(r"\\"),
            b'\n' => literal.push_str(r"\n"),
            b'\r' => literal.push_str(r"\r"),
            b'\t' => literal.push_str(r"\t"),
            _ if byte == quote => {
                literal.push('\\');
                literal.push(char::from(byte));
            }
            0x20..=0x7e => literal.push(char::from(byte)),
            _ => literal.push_str(&format!(r"\x{byte:02x}")),
        }
    }
    literal.push(char::from(quote));
    literal
}
