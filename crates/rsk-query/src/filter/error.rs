//! Error types for the filter DSL.

use thiserror::Error;

use super::ast::{BoolOp, CompOp};
use super::lexer::{Tag, Token};

/// A specialized Result type for filter scanning and parsing.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while scanning or parsing a filter expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The expression is empty or contains only whitespace.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// A character that cannot start any token.
    #[error("unknown entity '{character}' at position {position}")]
    UnknownEntity {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// A string literal with no closing quote.
    #[error("unterminated string starting at position {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A regexp literal with no closing slash.
    #[error("unterminated regexp starting at position {position}")]
    UnterminatedRegexp {
        /// Byte offset of the opening slash.
        position: usize,
    },

    /// A token that is not valid at this point in the grammar.
    #[error("expected one of [{}], found {found} ('{lexeme}') at position {position}", join_tags(.expected))]
    UnexpectedToken {
        /// Tag of the token that was found.
        found: Tag,
        /// Source text of the token that was found.
        lexeme: String,
        /// Byte offset of the token.
        position: usize,
        /// Tags that would have been accepted.
        expected: Vec<Tag>,
    },

    /// A token in value position that is not a literal.
    #[error("unexpected value {found} ('{lexeme}') at position {position}")]
    UnexpectedValue {
        /// Tag of the token that was found.
        found: Tag,
        /// Source text of the token that was found.
        lexeme: String,
        /// Byte offset of the token.
        position: usize,
    },

    /// A boolean operator with nothing after it.
    #[error("missing right hand side of '{operator}' at position {position}")]
    MissingRightHandSide {
        /// The dangling operator.
        operator: BoolOp,
        /// Byte offset where the right hand side was expected.
        position: usize,
    },

    /// The input ended in the middle of an expression.
    #[error("unexpected end of expression at position {position}")]
    UnexpectedEof {
        /// Byte offset of the end of input.
        position: usize,
    },

    /// A literal token whose text cannot be converted to its value type.
    #[error("invalid literal '{lexeme}' at position {position}")]
    InvalidLiteral {
        /// The literal text.
        lexeme: String,
        /// Byte offset of the literal.
        position: usize,
    },

    /// A comparison operator that the field's kind does not support.
    #[error("operator '{op}' is not supported for field '{field}'")]
    UnsupportedOperator {
        /// The field being compared.
        field: String,
        /// The rejected operator.
        op: CompOp,
    },

    /// A field with no known metadata.
    #[error("unknown field '{field}'{}", suggestion_suffix(.suggestion))]
    UnknownField {
        /// The requested field name.
        field: String,
        /// The closest known field name, if any is close enough.
        suggestion: Option<String>,
    },
}

impl FilterError {
    /// Creates an unexpected token error for `token`.
    pub fn unexpected_token(token: &Token, expected: &[Tag]) -> Self {
        FilterError::UnexpectedToken {
            found: token.tag,
            lexeme: token.lexeme.clone(),
            position: token.start,
            expected: expected.to_vec(),
        }
    }

    /// Creates an unexpected value error for `token`.
    pub fn unexpected_value(token: &Token) -> Self {
        FilterError::UnexpectedValue {
            found: token.tag,
            lexeme: token.lexeme.clone(),
            position: token.start,
        }
    }

    /// Creates an invalid literal error for `token`.
    pub fn invalid_literal(token: &Token) -> Self {
        FilterError::InvalidLiteral {
            lexeme: token.lexeme.clone(),
            position: token.start,
        }
    }

    /// Returns the byte offset the error refers to, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            FilterError::UnknownEntity { position, .. }
            | FilterError::UnterminatedString { position }
            | FilterError::UnterminatedRegexp { position }
            | FilterError::UnexpectedToken { position, .. }
            | FilterError::UnexpectedValue { position, .. }
            | FilterError::MissingRightHandSide { position, .. }
            | FilterError::UnexpectedEof { position }
            | FilterError::InvalidLiteral { position, .. } => Some(*position),
            FilterError::EmptyExpression
            | FilterError::UnsupportedOperator { .. }
            | FilterError::UnknownField { .. } => None,
        }
    }
}

fn join_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{name}'?)"),
        None => String::new(),
    }
}

/// A fatal error raised by the concrete syntax tree parser.
///
/// Unlike [`FilterError`], a parse error always carries the token that caused
/// it so an editor can position a message relative to the caret. When the
/// cause is the end of input the query is merely incomplete, which callers
/// usually render as a soft notice rather than a syntax error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ParseError {
    /// What went wrong.
    pub reason: FilterError,
    /// The token at which parsing stopped.
    pub cause: Token,
}

impl ParseError {
    /// Creates a parse error caused by `cause`.
    pub fn new(reason: FilterError, cause: Token) -> Self {
        Self { reason, cause }
    }

    /// Returns true if parsing stopped because the input ended early.
    pub fn is_incomplete(&self) -> bool {
        self.cause.tag == Tag::Eof
    }

    /// Byte offset of the offending token.
    pub fn position(&self) -> usize {
        self.cause.start
    }
}
