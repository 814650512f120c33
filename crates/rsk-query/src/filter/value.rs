//! Typed literal values compared against fields.

use std::fmt;

use serde::Serialize;

use super::lexer::Token;

/// The type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Regexp,
    Null,
    /// Text that failed to scan or convert. Only produced by the CST parser.
    Invalid,
}

/// The native payload of a [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A pattern, without the enclosing slashes.
    Regexp(String),
    Null,
    /// The raw source text of a malformed value.
    Invalid(String),
}

/// A typed literal, optionally remembering the token it was parsed from.
///
/// Equality compares literals only, so two values parsed from differently
/// laid out sources are equal when they denote the same literal.
#[derive(Debug, Clone, Serialize)]
pub struct Value {
    #[serde(flatten)]
    literal: Literal,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<Token>,
}

impl Value {
    fn new(literal: Literal) -> Self {
        Self {
            literal,
            token: None,
        }
    }

    /// Creates a string value.
    ///
    /// The DSL has no escapes, so embedded `"` characters are dropped when
    /// the value is printed.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Literal::String(value.into()))
    }

    /// Creates an integer value.
    pub fn int(value: i64) -> Self {
        Self::new(Literal::Int(value))
    }

    /// Creates a floating point value.
    ///
    /// `NaN` and the infinities have no DSL spelling; they print as Rust
    /// formats them and do not parse back.
    pub fn float(value: f64) -> Self {
        Self::new(Literal::Float(value))
    }

    /// Creates a boolean value.
    pub fn bool(value: bool) -> Self {
        Self::new(Literal::Bool(value))
    }

    /// Creates a regexp value from a pattern without slashes.
    pub fn regexp(pattern: impl Into<String>) -> Self {
        Self::new(Literal::Regexp(pattern.into()))
    }

    /// Creates the null value.
    pub fn null() -> Self {
        Self::new(Literal::Null)
    }

    /// Creates an invalid value holding the raw text that failed to parse.
    pub fn invalid(raw: impl Into<String>) -> Self {
        Self::new(Literal::Invalid(raw.into()))
    }

    /// Attaches the token this value was parsed from.
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns the literal payload.
    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Returns the token this value was parsed from, if known.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Returns the type of this value.
    pub fn kind(&self) -> ValueKind {
        match self.literal {
            Literal::String(_) => ValueKind::String,
            Literal::Int(_) => ValueKind::Int,
            Literal::Float(_) => ValueKind::Float,
            Literal::Bool(_) => ValueKind::Bool,
            Literal::Regexp(_) => ValueKind::Regexp,
            Literal::Null => ValueKind::Null,
            Literal::Invalid(_) => ValueKind::Invalid,
        }
    }

    /// Returns false for [`ValueKind::Invalid`].
    pub fn is_valid(&self) -> bool {
        self.kind() != ValueKind::Invalid
    }

    /// Returns the string payload of a string or regexp value.
    pub fn as_str(&self) -> Option<&str> {
        match &self.literal {
            Literal::String(s) | Literal::Regexp(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        Self::new(literal)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

/// Formats the value as DSL source text: strings in double quotes with any
/// inner `"` removed, regexps in slashes, everything else in its native form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Literal::String(s) => write!(f, "\"{}\"", s.replace('"', "")),
            Literal::Regexp(s) => write!(f, "/{s}/"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(v) => {
                // keep a decimal point so the value scans back as a float
                let text = v.to_string();
                if v.is_finite() && !text.contains('.') {
                    write!(f, "{text}.0")
                } else {
                    f.write_str(&text)
                }
            }
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
            Literal::Invalid(raw) => f.write_str(raw),
        }
    }
}
