//! Lexer (scanner) for the filter DSL.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;

use super::error::{FilterError, FilterResult};

/// A token produced by the DSL [`Lexer`].
pub type Token = crate::token::Token<Tag>;

/// Token classes of the filter DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    /// End of input. Always the last token.
    #[serde(rename = "EOF")]
    Eof,
    /// `(`
    #[serde(rename = "(")]
    LParen,
    /// `)`
    #[serde(rename = ")")]
    RParen,
    /// The `and` keyword.
    #[serde(rename = "AND")]
    And,
    /// The `or` keyword.
    #[serde(rename = "OR")]
    Or,
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Neq,
    /// `~=`
    #[serde(rename = "~=")]
    Like,
    /// `~`
    #[serde(rename = "~")]
    FuzzyLike,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// A run of whitespace.
    #[serde(rename = "WHITESPACE")]
    Whitespace,
    /// An identifier that is not a keyword.
    #[serde(rename = "FIELD")]
    Field,
    /// An integer literal.
    #[serde(rename = "INT")]
    Int,
    /// A decimal literal.
    #[serde(rename = "FLOAT")]
    Float,
    /// `true` or `false`.
    #[serde(rename = "BOOL")]
    Bool,
    /// A double quoted string, quotes included in the lexeme.
    #[serde(rename = "STRING")]
    String,
    /// A slash delimited regexp, slashes included in the lexeme.
    #[serde(rename = "REGEXP")]
    Regexp,
    /// The `null` keyword.
    #[serde(rename = "NULL")]
    Null,
    /// Input that could not be scanned (lenient scanning only).
    #[serde(rename = "ERROR")]
    Error,
}

impl Tag {
    /// The comparison operator tags, in the order parsers report them.
    pub const COMPARISONS: [Tag; 8] = [
        Tag::Eq,
        Tag::Neq,
        Tag::Like,
        Tag::FuzzyLike,
        Tag::Gt,
        Tag::Ge,
        Tag::Le,
        Tag::Lt,
    ];

    /// Returns the tag as it appears in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Eof => "EOF",
            Tag::LParen => "(",
            Tag::RParen => ")",
            Tag::And => "AND",
            Tag::Or => "OR",
            Tag::Eq => "=",
            Tag::Neq => "!=",
            Tag::Like => "~=",
            Tag::FuzzyLike => "~",
            Tag::Gt => ">",
            Tag::Ge => ">=",
            Tag::Le => "<=",
            Tag::Lt => "<",
            Tag::Whitespace => "WHITESPACE",
            Tag::Field => "FIELD",
            Tag::Int => "INT",
            Tag::Float => "FLOAT",
            Tag::Bool => "BOOL",
            Tag::String => "STRING",
            Tag::Regexp => "REGEXP",
            Tag::Null => "NULL",
            Tag::Error => "ERROR",
        }
    }

    /// Returns true for the comparison operators.
    pub fn is_comparison(&self) -> bool {
        Self::COMPARISONS.contains(self)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps reserved words to their tags. Matching is case sensitive.
fn keyword(lexeme: &str) -> Option<Tag> {
    match lexeme {
        "and" => Some(Tag::And),
        "or" => Some(Tag::Or),
        "true" | "false" => Some(Tag::Bool),
        "null" => Some(Tag::Null),
        _ => None,
    }
}

/// Result of scanning without failing on malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// All tokens, including an [`Tag::Error`] token for each scan error.
    pub tokens: Vec<Token>,
    /// One error per [`Tag::Error`] token, in the same order.
    pub errors: Vec<FilterError>,
}

impl LexerResult {
    /// Returns the scan error reported for the error token starting at `position`.
    pub fn error_at(&self, position: usize) -> Option<&FilterError> {
        self.errors
            .iter()
            .find(|err| err.position() == Some(position))
    }
}

/// Character level scanner for the filter DSL.
///
/// Every call to [`Lexer::next_token`] returns the next token, finishing with
/// an endless sequence of [`Tag::Eof`]. Whitespace runs are returned as
/// [`Tag::Whitespace`] tokens; parsers that do not care about layout drop them.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    /// Byte offset of the next unread character.
    position: usize,
    /// Byte offset where the token being scanned starts.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            offset: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    /// Consumes the next character if it is `expected`.
    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next_char();
            true
        } else {
            false
        }
    }

    /// Captures `[offset, position)` as a token and starts the next one.
    fn emit(&mut self, tag: Tag) -> Token {
        let token = Token::new(
            tag,
            &self.input[self.offset..self.position],
            self.offset,
            self.position,
        );
        self.offset = self.position;
        token
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownEntity` for a character that cannot start
    /// a token, and `FilterError::UnterminatedString` or
    /// `FilterError::UnterminatedRegexp` when the input ends inside a literal.
    /// The offending text is consumed either way, so scanning can resume.
    pub fn next_token(&mut self) -> FilterResult<Token> {
        let Some(c) = self.next_char() else {
            return Ok(self.emit(Tag::Eof));
        };

        match c {
            '(' => Ok(self.emit(Tag::LParen)),
            ')' => Ok(self.emit(Tag::RParen)),
            '=' => Ok(self.emit(Tag::Eq)),
            '!' => {
                if self.match_next('=') {
                    Ok(self.emit(Tag::Neq))
                } else {
                    Err(self.unknown_entity(c))
                }
            }
            '~' => {
                if self.match_next('=') {
                    Ok(self.emit(Tag::Like))
                } else {
                    Ok(self.emit(Tag::FuzzyLike))
                }
            }
            '>' => {
                if self.match_next('=') {
                    Ok(self.emit(Tag::Ge))
                } else {
                    Ok(self.emit(Tag::Gt))
                }
            }
            '<' => {
                if self.match_next('=') {
                    Ok(self.emit(Tag::Le))
                } else {
                    Ok(self.emit(Tag::Lt))
                }
            }
            '"' => self.scan_delimited('"', Tag::String),
            '/' => self.scan_delimited('/', Tag::Regexp),
            _ if c.is_whitespace() => Ok(self.scan_whitespace()),
            _ if is_field_start(c) => Ok(self.scan_field()),
            _ if is_number_start(c) => Ok(self.scan_number()),
            _ => Err(self.unknown_entity(c)),
        }
    }

    fn unknown_entity(&self, character: char) -> FilterError {
        FilterError::UnknownEntity {
            character,
            position: self.offset,
        }
    }

    fn scan_whitespace(&mut self) -> Token {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
        self.emit(Tag::Whitespace)
    }

    fn scan_field(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| is_field_start(c) || c.is_ascii_digit())
        {
            self.next_char();
        }
        let mut token = self.emit(Tag::Field);
        if let Some(tag) = keyword(&token.lexeme) {
            token.tag = tag;
        }
        token
    }

    /// Scans digits with at most one decimal point. A second `.` ends the
    /// number and is left for the next token.
    fn scan_number(&mut self) -> Token {
        let mut has_decimal = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.next_char();
            } else if c == '.' && !has_decimal {
                has_decimal = true;
                self.next_char();
            } else {
                break;
            }
        }
        if has_decimal {
            self.emit(Tag::Float)
        } else {
            self.emit(Tag::Int)
        }
    }

    /// Scans up to and including the closing `delimiter`. The opening one has
    /// already been consumed.
    fn scan_delimited(&mut self, delimiter: char, tag: Tag) -> FilterResult<Token> {
        loop {
            match self.next_char() {
                Some(c) if c == delimiter => return Ok(self.emit(tag)),
                Some(_) => {}
                None if tag == Tag::Regexp => {
                    return Err(FilterError::UnterminatedRegexp {
                        position: self.offset,
                    })
                }
                None => {
                    return Err(FilterError::UnterminatedString {
                        position: self.offset,
                    })
                }
            }
        }
    }

    /// Scans the whole input, failing on the first scan error.
    ///
    /// The returned tokens include whitespace and end with [`Tag::Eof`].
    pub fn tokenize(mut self) -> FilterResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let at_end = token.tag == Tag::Eof;
            tokens.push(token);
            if at_end {
                return Ok(tokens);
            }
        }
    }

    /// Scans the whole input without failing.
    ///
    /// Text that cannot be scanned becomes a [`Tag::Error`] token covering the
    /// consumed characters, and the error is recorded in
    /// [`LexerResult::errors`]. Concatenating the lexemes of all tokens
    /// reproduces the input.
    pub fn tokenize_lenient(mut self) -> LexerResult {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let at_end = token.tag == Tag::Eof;
                    tokens.push(token);
                    if at_end {
                        break;
                    }
                }
                Err(err) => {
                    tokens.push(self.emit(Tag::Error));
                    errors.push(err);
                }
            }
        }
        LexerResult { tokens, errors }
    }
}

fn is_field_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

/// Scans `input` into tokens, failing on the first scan error.
pub fn scan(input: &str) -> FilterResult<Vec<Token>> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(input: &str) -> Vec<Tag> {
        scan(input)
            .unwrap()
            .into_iter()
            .filter(|t| t.tag != Tag::Whitespace)
            .map(|t| t.tag)
            .collect()
    }

    #[test]
    fn test_tokenize_comparison() {
        let tokens = scan(r#"actor = "ricky""#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(Tag::Field, "actor", 0, 5),
                Token::new(Tag::Whitespace, " ", 5, 6),
                Token::new(Tag::Eq, "=", 6, 7),
                Token::new(Tag::Whitespace, " ", 7, 8),
                Token::new(Tag::String, r#""ricky""#, 8, 15),
                Token::new(Tag::Eof, "", 15, 15),
            ]
        );
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            tags("a = b != c ~= d ~ e > f >= g < h <= i"),
            vec![
                Tag::Field,
                Tag::Eq,
                Tag::Field,
                Tag::Neq,
                Tag::Field,
                Tag::Like,
                Tag::Field,
                Tag::FuzzyLike,
                Tag::Field,
                Tag::Gt,
                Tag::Field,
                Tag::Ge,
                Tag::Field,
                Tag::Lt,
                Tag::Field,
                Tag::Le,
                Tag::Field,
                Tag::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            tags("and or true false null andy"),
            vec![
                Tag::And,
                Tag::Or,
                Tag::Bool,
                Tag::Bool,
                Tag::Null,
                Tag::Field,
                Tag::Eof
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(tags("AND"), vec![Tag::Field, Tag::Eof]);
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = scan("1 -2 3.5 -0.25").unwrap();
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.tag != Tag::Whitespace && t.tag != Tag::Eof)
            .map(|t| (t.tag, t.lexeme.as_str()))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (Tag::Int, "1"),
                (Tag::Int, "-2"),
                (Tag::Float, "3.5"),
                (Tag::Float, "-0.25")
            ]
        );
    }

    #[test]
    fn test_second_decimal_point_ends_number() {
        let err = scan("1.2.3").unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownEntity {
                character: '.',
                position: 3
            }
        );
    }

    #[test]
    fn test_field_may_contain_digits_and_underscores() {
        let tokens = scan("_episode_2").unwrap();
        assert_eq!(tokens[0], Token::new(Tag::Field, "_episode_2", 0, 10));
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        let tokens = scan("a  \t b").unwrap();
        assert_eq!(tokens[1], Token::new(Tag::Whitespace, "  \t ", 1, 5));
    }

    #[test]
    fn test_regexp_literal() {
        let tokens = scan("content = /fo+/").unwrap();
        assert_eq!(tokens[4], Token::new(Tag::Regexp, "/fo+/", 10, 15));
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert_eq!(
            scan(r#"a = "abc"#).unwrap_err(),
            FilterError::UnterminatedString { position: 4 }
        );
    }

    #[test]
    fn test_unterminated_regexp_fails() {
        assert_eq!(
            scan("a = /abc").unwrap_err(),
            FilterError::UnterminatedRegexp { position: 4 }
        );
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(
            scan("field@1").unwrap_err(),
            FilterError::UnknownEntity {
                character: '@',
                position: 5
            }
        );
    }

    #[test]
    fn test_bang_without_equals_is_unknown() {
        assert_eq!(
            scan("a ! 1").unwrap_err(),
            FilterError::UnknownEntity {
                character: '!',
                position: 2
            }
        );
    }

    #[test]
    fn test_non_ascii_offsets_are_bytes() {
        let result = Lexer::new("é=1").tokenize_lenient();
        assert_eq!(result.tokens[0], Token::new(Tag::Error, "é", 0, 2));
        assert_eq!(result.tokens[1], Token::new(Tag::Eq, "=", 2, 3));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().unwrap().tag, Tag::Eof);
        assert_eq!(lexer.next_token().unwrap().tag, Tag::Eof);
    }

    #[test]
    fn test_lenient_scan_reproduces_input() {
        let input = r#"a@ = "open"#;
        let result = Lexer::new(input).tokenize_lenient();
        let text: String = result.tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(text, input);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(
            result.error_at(1),
            Some(&FilterError::UnknownEntity {
                character: '@',
                position: 1
            })
        );
        assert_eq!(
            result.error_at(5),
            Some(&FilterError::UnterminatedString { position: 5 })
        );
        let last_two: Vec<_> = result.tokens.iter().rev().take(2).map(|t| t.tag).collect();
        assert_eq!(last_two, vec![Tag::Eof, Tag::Error]);
    }
}
