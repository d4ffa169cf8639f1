//! Error types for parsing.
//!
//! Parse errors carry the 0-based line and column of the offending input
//! byte and render as `"(line, column): message"`. Value coercions on the
//! document tree never produce an [`Error`]; they report failure through
//! `Option` returns instead.

use std::io;

/// Errors that can occur while reading or parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input contained no bytes at all.
    #[error("Input string is empty")]
    EmptyInput,

    /// A file could not be opened for parsing.
    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The underlying reader failed mid-parse.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A byte that no rule accepts in the current state.
    #[error("({line}, {column}): Unexpected char '{symbol}'")]
    UnexpectedChar { symbol: char, line: u32, column: u32 },

    /// A numeric token that does not form a valid number.
    #[error("({line}, {column}): Invalid number value")]
    InvalidNumber { line: u32, column: u32 },

    /// A backslash followed by a character outside the legal escape set.
    #[error("({line}, {column}): Invalid escape char '{symbol}'")]
    InvalidEscape { symbol: char, line: u32, column: u32 },

    /// A `\u` escape with bad hex digits, a surrogate half, or an
    /// out-of-range code point.
    #[error("({line}, {column}): Invalid unicode escape")]
    InvalidUnicodeEscape { line: u32, column: u32 },

    /// A malformed or truncated UTF-8 sequence inside a string or token.
    #[error("({line}, {column}): Invalid UTF-8 sequence")]
    InvalidUtf8 { line: u32, column: u32 },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
