//! Ordered candidate encoding lists.

use std::fmt;

use crate::encoding::TextEncoding;
use crate::error::CandidateError;

/// A non-empty, ordered list of encodings to try.
///
/// ## Invariants
/// - The list always holds at least one encoding.
/// - Order is preserved exactly as supplied; earlier entries win ties.
///
/// # Examples
///
/// ```
/// use text_probe::{CandidateList, TextEncoding};
///
/// let candidates = CandidateList::parse(["utf-16-le", "utf-8"]).expect("known labels");
/// let order: Vec<_> = candidates.iter().collect();
/// assert_eq!(order, [TextEncoding::Utf16Le, TextEncoding::Utf8]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    encodings: Vec<TextEncoding>,
}

impl CandidateList {
    /// Build a list from encodings in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::Empty`] when no encodings are supplied.
    pub fn new(encodings: impl IntoIterator<Item = TextEncoding>) -> Result<Self, CandidateError> {
        let collected: Vec<_> = encodings.into_iter().collect();
        if collected.is_empty() {
            return Err(CandidateError::Empty);
        }
        Ok(Self {
            encodings: collected,
        })
    }

    /// Build a list from encoding labels in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError::UnknownLabel`] for the first unsupported
    /// label, or [`CandidateError::Empty`] when no labels are supplied.
    pub fn parse<I, S>(labels: I) -> Result<Self, CandidateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let encodings = labels
            .into_iter()
            .map(|label| label.as_ref().parse::<TextEncoding>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(encodings)
    }

    /// Candidates used by the conversion helper: UTF-16LE first, then UTF-8.
    #[must_use]
    pub fn utf16le_then_utf8() -> Self {
        Self {
            encodings: vec![TextEncoding::Utf16Le, TextEncoding::Utf8],
        }
    }

    /// Iterate the encodings in priority order.
    pub fn iter(&self) -> impl Iterator<Item = TextEncoding> + '_ {
        self.encodings.iter().copied()
    }

    /// Number of candidates in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.encodings.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encodings.is_empty()
    }
}

impl Default for CandidateList {
    /// `utf-8`, `utf-16`, `utf-16-le`, `cp1252`.
    fn default() -> Self {
        Self {
            encodings: vec![
                TextEncoding::Utf8,
                TextEncoding::Utf16,
                TextEncoding::Utf16Le,
                TextEncoding::Cp1252,
            ],
        }
    }
}

impl fmt::Display for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<_> = self.iter().map(TextEncoding::label).collect();
        f.write_str(&labels.join(", "))
    }
}
