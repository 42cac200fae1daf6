//! Error types for markup and stylesheet parsing.

use std::str::Utf8Error;

/// Result type alias for parse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the parsers.
///
/// Only two conditions are errors. Everything else malformed (unterminated
/// tags, a declaration without `:`, a missing `}`) is parsed leniently up to
/// the end of input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input was not text.
    #[error("{what} input is not valid UTF-8: {source}")]
    InvalidInput {
        what: &'static str,
        #[source]
        source: Utf8Error,
    },

    /// A closing tag did not match the most recently opened tag.
    #[error("The end tag </{found}> does not match the start tag <{expected}>")]
    MismatchedTag { expected: String, found: String },
}

impl Error {
    pub fn invalid_input(what: &'static str, source: Utf8Error) -> Self {
        Self::InvalidInput { what, source }
    }

    pub fn mismatched_tag(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::MismatchedTag {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
