//! Error types for the skill tree parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while parsing the brace-delimited format.

use crate::parser::tokenizer::Token;
use thiserror::Error;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur during parsing.
#[derive(PartialEq, Eq, Debug, Clone, Error)]
pub enum ParsingErrorType {
    /// Reading the input failed
    #[error("IO error - {0}")]
    Io(String),

    /// Input ended before a tree was complete (or contained no tree at all)
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// A `{` appeared where a node identifier was expected
    #[error("Missing node identifier before child list")]
    MissingIdentifier,

    /// A token in type position is not one of human, robot, mixed
    #[error("Illegal skill type '{0}' (expected human, robot or mixed)")]
    IllegalType(String),

    /// A `}` closed nothing, or child lists were left open
    #[error("Unbalanced braces - {0}")]
    UnbalancedBraces(String),

    /// Further nodes after the root was closed
    #[error("Trailing input after root - '{0}'")]
    TrailingInput(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and offending token).
#[derive(PartialEq, Eq, Debug, Clone, Error)]
#[error("{kind} at position {position}{}", context_suffix(.token))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    token: Option<String>,
}

fn context_suffix(token: &Option<String>) -> String {
    match token {
        Some(token) => format!(" (token '{token}')"),
        None => String::new(),
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and the token it occurred at.
    pub fn at_token(kind: ParsingErrorType, token: &Token) -> Self {
        Self {
            kind,
            position: token.position(),
            token: Some(token.text().to_string()),
        }
    }

    /// Create a ParsingError at a position without a token, e.g. at end of input.
    pub fn at_position(kind: ParsingErrorType, position: usize) -> Self {
        Self {
            kind,
            position,
            token: None,
        }
    }

    /// Convenience constructor for MissingIdentifier
    pub fn missing_identifier(token: &Token) -> Self {
        Self::at_token(ParsingErrorType::MissingIdentifier, token)
    }

    /// Convenience constructor for IllegalType
    pub fn illegal_type(token: &Token) -> Self {
        Self::at_token(ParsingErrorType::IllegalType(token.text().to_string()), token)
    }

    /// Convenience constructor for UnbalancedBraces
    pub fn unbalanced_braces(position: usize, msg: String) -> Self {
        Self::at_position(ParsingErrorType::UnbalancedBraces(msg), position)
    }

    /// Convenience constructor for TrailingInput
    pub fn trailing_input(token: &Token) -> Self {
        Self::at_token(ParsingErrorType::TrailingInput(token.text().to_string()), token)
    }

    /// Convenience constructor for Io, with the number of bytes read before
    /// the failure
    pub fn io(err: std::io::Error, position: usize) -> Self {
        Self::at_position(ParsingErrorType::Io(err.to_string()), position)
    }

    /// Convenience constructor for UnexpectedEof
    pub fn unexpected_eof(position: usize) -> Self {
        Self::at_position(ParsingErrorType::UnexpectedEof, position)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the byte position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the offending token, if the error occurred at one
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl From<std::io::Error> for ParsingError {
    /// For failures before any input was read, e.g. opening a file.
    fn from(err: std::io::Error) -> Self {
        Self::io(err, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_token() {
        let token = Token::word("banana".to_string(), 12);
        let err = ParsingError::illegal_type(&token);
        assert_eq!(
            err.to_string(),
            "Illegal skill type 'banana' (expected human, robot or mixed) at position 12 (token 'banana')"
        );
    }

    #[test]
    fn test_display_without_token() {
        let err = ParsingError::unexpected_eof(7);
        assert_eq!(err.to_string(), "Unexpected end of input at position 7");
        assert_eq!(err.token(), None);
    }
}
