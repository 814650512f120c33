//! Error types for the human search syntax.

use thiserror::Error;

use super::lexer::{Tag, Token};

/// A specialized Result type for search-term parsing.
pub type TermResult<T> = Result<T, TermError>;

/// Errors that can occur while parsing search terms.
///
/// The scanner never fails, so every error is structural.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TermError {
    /// A token that cannot appear at this point.
    #[error("expected one of [{}], found {found} ('{lexeme}') at position {position}", join_tags(.expected))]
    UnexpectedToken {
        found: Tag,
        lexeme: String,
        position: usize,
        expected: Vec<Tag>,
    },
}

impl TermError {
    pub fn unexpected_token(token: &Token, expected: &[Tag]) -> Self {
        TermError::UnexpectedToken {
            found: token.tag,
            lexeme: token.lexeme.clone(),
            position: token.start,
            expected: expected.to_vec(),
        }
    }

    /// Byte offset of the offending token.
    pub fn position(&self) -> usize {
        match self {
            TermError::UnexpectedToken { position, .. } => *position,
        }
    }
}

fn join_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
