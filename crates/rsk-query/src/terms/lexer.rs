//! Scanner for the human search syntax.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;

/// A token produced by the search-term [`Lexer`].
pub type Token = crate::token::Token<Tag>;

/// Token classes of the human search syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    #[serde(rename = "EOF")]
    Eof,
    /// `@`, introducing an actor.
    #[serde(rename = "@")]
    Mention,
    /// `~`, introducing a publication.
    #[serde(rename = "~")]
    Publication,
    /// A double quoted phrase. The closing quote may be missing.
    #[serde(rename = "QUOTED_STRING")]
    QuotedString,
    /// A bare word.
    #[serde(rename = "WORD")]
    Word,
    /// A slash delimited pattern. The closing slash may be missing.
    #[serde(rename = "REGEXP")]
    Regexp,
    #[serde(rename = "WHITESPACE")]
    Whitespace,
    /// Input that cannot start any token.
    #[serde(rename = "ERROR")]
    Error,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Eof => "EOF",
            Tag::Mention => "@",
            Tag::Publication => "~",
            Tag::QuotedString => "QUOTED_STRING",
            Tag::Word => "WORD",
            Tag::Regexp => "REGEXP",
            Tag::Whitespace => "WHITESPACE",
            Tag::Error => "ERROR",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissive scanner for the human search syntax.
///
/// Scanning never fails. Quoted phrases and patterns that are still open at
/// the end of input close implicitly, so text can be scanned while it is
/// being typed. A control character becomes an [`Tag::Error`] token and the
/// parser decides what to do with it.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
    /// Byte offset of the next unread character.
    position: usize,
    /// Byte offset where the token being scanned starts.
    offset: usize,
}

impl<'a> Lexer<'a> {
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

    /// Scans the next token. Returns [`Tag::Eof`] forever once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        let Some(c) = self.next_char() else {
            return self.emit(Tag::Eof);
        };

        match c {
            '@' => self.emit(Tag::Mention),
            '~' => self.emit(Tag::Publication),
            '"' => self.scan_delimited('"', Tag::QuotedString),
            '/' => self.scan_delimited('/', Tag::Regexp),
            _ if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.next_char();
                }
                self.emit(Tag::Whitespace)
            }
            _ if c.is_control() => self.emit(Tag::Error),
            _ => {
                while self.peek().is_some_and(is_word_char) {
                    self.next_char();
                }
                self.emit(Tag::Word)
            }
        }
    }

    /// Scans up to and including `delimiter`, or to the end of input.
    fn scan_delimited(&mut self, delimiter: char, tag: Tag) -> Token {
        while let Some(c) = self.next_char() {
            if c == delimiter {
                break;
            }
        }
        self.emit(tag)
    }

    /// Scans the whole input. The last token is always [`Tag::Eof`].
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let at_end = token.tag == Tag::Eof;
            tokens.push(token);
            if at_end {
                return tokens;
            }
        }
    }
}

/// `/` is only special at the start of a token, so `and/or` is one word.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && !matches!(c, '@' | '~' | '"')
}

/// Scans `input` into tokens.
pub fn scan(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}
