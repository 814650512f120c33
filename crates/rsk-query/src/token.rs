//! Tokens shared by the DSL and search-term scanners.

use serde::Serialize;

/// A half-open `[start, end)` byte range into the scanned input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if the span covers no input.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns the smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A scanned lexeme.
///
/// `T` is the tag enumeration of the grammar that produced the token
/// ([`crate::filter::Tag`] or [`crate::terms::Tag`]). The lexeme is the exact
/// source text, so quoted strings keep their quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<T> {
    /// The token class.
    pub tag: T,
    /// The source text covered by the token.
    pub lexeme: String,
    /// Byte offset where the token starts.
    pub start: usize,
    /// Byte offset one past the end of the token.
    pub end: usize,
}

impl<T> Token<T> {
    /// Creates a token.
    pub fn new(tag: T, lexeme: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            tag,
            lexeme: lexeme.into(),
            start,
            end,
        }
    }

    /// Returns the span covered by this token.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
