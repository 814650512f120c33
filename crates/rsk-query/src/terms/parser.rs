//! Parser turning human search text into [`Term`]s.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::error::{TermError, TermResult};
use super::lexer::{Lexer, Tag, Token};
use crate::filter::{CompOp, Filter, Value};
use crate::token::Span;

/// The fields a search term can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermField {
    /// Transcript text. Bare words and quoted phrases.
    Content,
    /// A speaker, written `@name`.
    Actor,
    /// A publication, written `~name`.
    Publication,
}

impl TermField {
    /// Returns the filter field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TermField::Content => "content",
            TermField::Actor => "actor",
            TermField::Publication => "publication",
        }
    }

    /// Looks up a term field by filter field name.
    pub fn from_name(name: &str) -> Option<TermField> {
        match name {
            "content" => Some(TermField::Content),
            "actor" => Some(TermField::Actor),
            "publication" => Some(TermField::Publication),
            _ => None,
        }
    }
}

impl fmt::Display for TermField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of human search input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    /// Source range, including any whitespace the term absorbed.
    pub span: Span,
    pub field: TermField,
    /// The term text without quotes, slashes or sigil.
    pub value: String,
    /// [`CompOp::FuzzyLike`] for bare words, [`CompOp::Like`] for patterns
    /// and [`CompOp::Eq`] otherwise.
    pub op: CompOp,
    /// Tag of the token the value came from; decides how the term prints.
    pub tag: Tag,
}

impl Term {
    /// Creates a term with an empty span.
    pub fn new(field: TermField, value: impl Into<String>, op: CompOp, tag: Tag) -> Self {
        Self {
            span: Span::default(),
            field,
            value: value.into(),
            op,
            tag,
        }
    }

    /// Converts the term into a comparison filter.
    ///
    /// Double quotes are removed from the value. Pattern terms produce a
    /// regexp value, everything else a string.
    pub fn to_filter(&self) -> Filter {
        let text = self.value.replace('"', "");
        let value = match self.tag {
            Tag::Regexp => Value::regexp(text),
            _ => Value::string(text),
        };
        Filter::comp(self.field.as_str(), self.op, value)
    }
}

/// Tags that can start a term.
const TERM_START: [Tag; 7] = [
    Tag::QuotedString,
    Tag::Word,
    Tag::Regexp,
    Tag::Mention,
    Tag::Publication,
    Tag::Whitespace,
    Tag::Eof,
];

/// Tags accepted after a `@` or `~` sigil.
const SIGIL_TEXT: [Tag; 3] = [Tag::QuotedString, Tag::Word, Tag::Eof];

/// Parser for the human search syntax.
///
/// # Grammar
///
/// ```text
/// terms ::= term* EOF
/// term  ::= (words | QUOTED_STRING | REGEXP | sigil | WHITESPACE) WHITESPACE?
/// words ::= WHITESPACE? WORD (WHITESPACE WORD)*
/// sigil ::= ("@" | "~") (QUOTED_STRING | WORD | EOF)
/// ```
///
/// Adjacent bare words form a single fuzzy phrase; a quote or sigil ends the
/// phrase. Whitespace after a term is absorbed into its span, so only
/// whitespace with no term before it becomes a term of its own.
pub struct TermParser {
    /// Scanned tokens, always ending with [`Tag::Eof`].
    tokens: Vec<Token>,
    position: usize,
}

impl TermParser {
    /// Parses search text into terms, in source order.
    ///
    /// # Errors
    ///
    /// Returns `TermError::UnexpectedToken` for whitespace or a sigil directly
    /// after a sigil, and for unscannable control characters.
    pub fn parse(input: &str) -> TermResult<Vec<Term>> {
        let mut parser = Self {
            tokens: Lexer::new(input).tokenize(),
            position: 0,
        };

        let mut terms = Vec::new();
        while let Some(term) = parser.parse_inner()? {
            terms.push(term);
        }

        debug!(input, terms = terms.len(), "parsed search terms");
        Ok(terms)
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.position + ahead).min(last)]
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.tag != Tag::Eof {
            self.position += 1;
        }
        token
    }

    fn require(&mut self, expected: &[Tag]) -> TermResult<Token> {
        let token = self.advance();
        if expected.contains(&token.tag) {
            Ok(token)
        } else {
            Err(TermError::unexpected_token(&token, expected))
        }
    }

    fn parse_inner(&mut self) -> TermResult<Option<Term>> {
        let token = self.advance();
        let mut term = match token.tag {
            Tag::Eof => return Ok(None),
            Tag::QuotedString => Term {
                span: token.span(),
                ..Term::new(
                    TermField::Content,
                    strip_delimiters(&token.lexeme, '"'),
                    CompOp::Eq,
                    token.tag,
                )
            },
            Tag::Regexp => Term {
                span: token.span(),
                ..Term::new(
                    TermField::Content,
                    strip_delimiters(&token.lexeme, '/'),
                    CompOp::Like,
                    token.tag,
                )
            },
            Tag::Word => self.parse_words(token),
            Tag::Whitespace if self.peek().tag == Tag::Word => {
                let first = self.advance();
                let mut term = self.parse_words(first);
                term.span.start = token.start;
                term
            }
            Tag::Whitespace => Term {
                span: token.span(),
                ..Term::new(TermField::Content, token.lexeme, CompOp::FuzzyLike, Tag::Whitespace)
            },
            Tag::Mention => self.parse_sigil(token, TermField::Actor)?,
            Tag::Publication => self.parse_sigil(token, TermField::Publication)?,
            Tag::Error => return Err(TermError::unexpected_token(&token, &TERM_START)),
        };

        if self.peek().tag == Tag::Whitespace {
            let trailing = self.advance();
            term.span.end = trailing.end;
        }
        Ok(Some(term))
    }

    /// Groups `first` with every following `WHITESPACE WORD` pair.
    fn parse_words(&mut self, first: Token) -> Term {
        let mut span = first.span();
        let mut words = vec![first.lexeme];
        while self.peek().tag == Tag::Whitespace && self.peek_at(1).tag == Tag::Word {
            self.advance();
            let word = self.advance();
            span = span.merge(word.span());
            words.push(word.lexeme);
        }
        Term {
            span,
            ..Term::new(TermField::Content, words.join(" "), CompOp::FuzzyLike, Tag::Word)
        }
    }

    fn parse_sigil(&mut self, sigil: Token, field: TermField) -> TermResult<Term> {
        let text = self.require(&SIGIL_TEXT)?;
        Ok(Term {
            span: sigil.span().merge(text.span()),
            ..Term::new(
                field,
                strip_delimiters(&text.lexeme, '"'),
                CompOp::Eq,
                text.tag,
            )
        })
    }
}

/// Removes a leading and, if present, a trailing `delimiter`.
fn strip_delimiters(lexeme: &str, delimiter: char) -> String {
    let inner = lexeme.strip_prefix(delimiter).unwrap_or(lexeme);
    inner.strip_suffix(delimiter).unwrap_or(inner).to_string()
}

/// Parses human search text into terms.
pub fn parse_terms(input: &str) -> TermResult<Vec<Term>> {
    TermParser::parse(input)
}
