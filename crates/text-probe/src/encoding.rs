//! Supported text encodings and their strict decoders.
//!
//! Decoding here never substitutes replacement characters: a byte sequence
//! that is not valid in the encoding yields `None` so the caller can move on
//! to the next candidate.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};

use crate::error::CandidateError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16_LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16_BE_BOM: &[u8] = b"\xFE\xFF";

/// Bytes the Windows-1252 code page leaves unassigned.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// A text encoding the decoder can try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8; a leading byte order mark is kept as `U+FEFF`.
    Utf8,
    /// UTF-8 with a leading byte order mark stripped when present.
    Utf8Sig,
    /// UTF-16 with byte order taken from the BOM, little-endian without one.
    Utf16,
    /// UTF-16 little-endian without BOM handling.
    Utf16Le,
    /// UTF-16 big-endian without BOM handling.
    Utf16Be,
    /// Windows code page 1252.
    Cp1252,
    /// ISO-8859-1, where every byte maps to the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Every supported encoding, in label order.
    pub const ALL: [Self; 7] = [
        Self::Utf8,
        Self::Utf8Sig,
        Self::Utf16,
        Self::Utf16Le,
        Self::Utf16Be,
        Self::Cp1252,
        Self::Latin1,
    ];

    /// Canonical label used in output and accepted by [`Self::from_label`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Sig => "utf-8-sig",
            Self::Utf16 => "utf-16",
            Self::Utf16Le => "utf-16-le",
            Self::Utf16Be => "utf-16-be",
            Self::Cp1252 => "cp1252",
            Self::Latin1 => "latin-1",
        }
    }

    /// Resolve a label or common alias, ignoring case and `_`/`-` spelling.
    ///
    /// # Examples
    ///
    /// ```
    /// use text_probe::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::from_label("UTF16LE"), Some(TextEncoding::Utf16Le));
    /// assert_eq!(TextEncoding::from_label("windows-1252"), Some(TextEncoding::Cp1252));
    /// assert_eq!(TextEncoding::from_label("ebcdic"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        let encoding = match normalized.as_str() {
            "utf-8" | "utf8" | "u8" => Self::Utf8,
            "utf-8-sig" | "utf8-sig" => Self::Utf8Sig,
            "utf-16" | "utf16" | "u16" => Self::Utf16,
            "utf-16-le" | "utf-16le" | "utf16-le" | "utf16le" => Self::Utf16Le,
            "utf-16-be" | "utf-16be" | "utf16-be" | "utf16be" => Self::Utf16Be,
            "cp1252" | "windows-1252" | "windows1252" | "1252" => Self::Cp1252,
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Self::Latin1,
            _ => return None,
        };
        Some(encoding)
    }

    /// Strictly decode `bytes`, returning `None` when they are malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use text_probe::TextEncoding;
    ///
    /// let bytes = b"\xff\xfeH\x00i\x00";
    /// assert_eq!(TextEncoding::Utf8.decode(bytes), None);
    /// assert_eq!(TextEncoding::Utf16.decode(bytes).as_deref(), Some("Hi"));
    /// assert_eq!(TextEncoding::Utf16Le.decode(bytes).as_deref(), Some("\u{feff}Hi"));
    /// ```
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Utf8 => without_replacement(UTF_8, bytes),
            Self::Utf8Sig => {
                without_replacement(UTF_8, bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
            }
            Self::Utf16 => decode_utf16_with_bom(bytes),
            Self::Utf16Le => without_replacement(UTF_16LE, bytes),
            Self::Utf16Be => without_replacement(UTF_16BE, bytes),
            Self::Cp1252 => {
                if bytes.iter().any(|byte| CP1252_UNDEFINED.contains(byte)) {
                    return None;
                }
                without_replacement(WINDOWS_1252, bytes)
            }
            Self::Latin1 => Some(Cow::Owned(bytes.iter().copied().map(char::from).collect())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = CandidateError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::from_label(label).ok_or_else(|| CandidateError::UnknownLabel {
            label: label.to_owned(),
        })
    }
}

fn without_replacement<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

fn decode_utf16_with_bom(bytes: &[u8]) -> Option<Cow<'_, str>> {
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return without_replacement(UTF_16LE, rest);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return without_replacement(UTF_16BE, rest);
    }
    without_replacement(UTF_16LE, bytes)
}
