//! Error types for the PerfettoSQL front end

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParserError>;

/// Errors produced while splitting statements and parsing the extension
/// grammar. Every message starts with a rendered source location (line, col,
/// offending line, caret) followed by what was expected at that point.
///
/// An error is terminal for the parser instance that produced it: the
/// remaining input is not scanned and later calls return the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// A statement form the engine refuses outright (trigger creation).
    #[error("{0}")]
    Unsupported(String),

    /// A CREATE PERFETTO FUNCTION declaration deviating from the fixed
    /// `name(params) RETURNS type AS body` grammar.
    #[error("{0}")]
    MalformedFunction(String),
}
