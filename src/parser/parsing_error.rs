//! Error types for Newick parsing.
//!
//! [ParsingError] pairs a [ParsingErrorType] with the byte position where
//! parsing stopped and a short excerpt of the input that follows it.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use thiserror::Error;

/// Number of input bytes quoted in an error message
const CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// What went wrong while reading a tree.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    /// Reading the input failed
    #[error("IO error - {0}")]
    IoError(String),
    /// Input ended in the middle of a tree
    #[error("Unexpected end of input")]
    UnexpectedEOF,
    /// A `[` comment was never closed
    #[error("Unclosed comment")]
    UnclosedComment,
    /// A single-quoted label was never closed
    #[error("Unclosed quoted label")]
    UnclosedQuote,
    /// Input does not follow the Newick grammar
    #[error("Invalid newick string: {0}")]
    InvalidNewickString(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error located in the input.
#[derive(Error, Debug)]
#[error("{kind}{}", location(.kind, .position, .context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Creates an error of the given kind at the current parser position.
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(CONTEXT_LENGTH),
        }
    }

    pub fn unexpected_eof<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEOF, parser)
    }

    pub fn unclosed_comment<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedComment, parser)
    }

    pub fn unclosed_quote<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedQuote, parser)
    }

    pub fn invalid_newick_string<S: ByteSource>(parser: &ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNewickString(msg), parser)
    }

    /// What went wrong.
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Byte offset in the input where parsing stopped.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Position and input excerpt appended to the message; IO errors have neither.
fn location(kind: &ParsingErrorType, position: &usize, context: &str) -> String {
    match kind {
        ParsingErrorType::IoError(_) => String::new(),
        _ if context.is_empty() => format!(" at position {position}"),
        _ => format!(
            " at position {position}\n  Context (next {} bytes): {context}",
            context.len()
        ),
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError {
            kind: ParsingErrorType::IoError(err.to_string()),
            position: 0,
            context: String::new(),
        }
    }
}
