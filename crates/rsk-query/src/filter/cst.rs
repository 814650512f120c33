//! Concrete syntax tree for live editing.
//!
//! The CST parser accepts the same grammar as [`super::FilterParser`] but
//! keeps every character of the input: whitespace, parentheses and malformed
//! values all become leaves, so concatenating the leaves reproduces the
//! source exactly. Editors use it to highlight a query as it is typed.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::error::{FilterError, ParseError};
use super::lexer::{Lexer, LexerResult, Tag, Token};
use super::parser::{bool_op_for, value_from_token};
use super::value::Value;
use crate::token::Span;

/// The grammatical role of a [`CstNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    BoolFilter,
    BoolOp,
    CompFilter,
    CompOp,
    Field,
    Value,
    Whitespace,
    /// A parenthesised sub-expression, parentheses included.
    Group,
    /// A `(` or `)` leaf.
    Paren,
    /// The root of a tree built from raw tokens after a failed parse.
    ParseError,
    /// Text that could not be classified.
    Unknown,
}

/// A node of the concrete syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum CstNode {
    /// An interior node.
    Inner {
        kind: NodeKind,
        children: Vec<CstNode>,
    },
    /// A leaf wrapping one token.
    Token { kind: NodeKind, token: Token },
    /// A leaf wrapping a value and, through it, its source token.
    Value { value: Value },
}

impl CstNode {
    fn inner(kind: NodeKind, children: Vec<CstNode>) -> Self {
        CstNode::Inner { kind, children }
    }

    fn token(kind: NodeKind, token: Token) -> Self {
        CstNode::Token { kind, token }
    }

    /// Returns the node's grammatical role.
    pub fn kind(&self) -> NodeKind {
        match self {
            CstNode::Inner { kind, .. } | CstNode::Token { kind, .. } => *kind,
            CstNode::Value { .. } => NodeKind::Value,
        }
    }

    /// Returns the node's children; leaves have none.
    pub fn children(&self) -> &[CstNode] {
        match self {
            CstNode::Inner { children, .. } => children,
            CstNode::Token { .. } | CstNode::Value { .. } => &[],
        }
    }

    /// Returns the source range covered by the node, or `None` for an
    /// interior node without leaves.
    pub fn span(&self) -> Option<Span> {
        match self {
            CstNode::Inner { children, .. } => children
                .iter()
                .filter_map(CstNode::span)
                .reduce(Span::merge),
            CstNode::Token { token, .. } => Some(token.span()),
            CstNode::Value { value } => value.token().map(Token::span),
        }
    }

    /// Returns false for malformed leaves: invalid values and unscannable text.
    pub fn is_valid(&self) -> bool {
        match self {
            CstNode::Inner { .. } => true,
            CstNode::Token { token, .. } => token.tag != Tag::Error,
            CstNode::Value { value } => value.is_valid(),
        }
    }

    /// Calls `f` on every leaf, left to right.
    pub fn walk<F: FnMut(&CstNode)>(&self, f: &mut F) {
        match self {
            CstNode::Inner { children, .. } => {
                for child in children {
                    child.walk(f);
                }
            }
            CstNode::Token { .. } | CstNode::Value { .. } => f(self),
        }
    }

    /// Returns every leaf, left to right.
    pub fn leaves(&self) -> Vec<&CstNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a CstNode>) {
        match self {
            CstNode::Inner { children, .. } => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
            CstNode::Token { .. } | CstNode::Value { .. } => leaves.push(self),
        }
    }

    /// Returns the source text covered by the node.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

/// Writes the concatenated lexemes of all leaves.
impl fmt::Display for CstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CstNode::Inner { children, .. } => {
                for child in children {
                    write!(f, "{child}")?;
                }
                Ok(())
            }
            CstNode::Token { token, .. } => f.write_str(&token.lexeme),
            CstNode::Value { value } => match value.token() {
                Some(token) => f.write_str(&token.lexeme),
                None => write!(f, "{value}"),
            },
        }
    }
}

/// Tolerant, position aware parser producing a [`CstNode`] tree.
///
/// Scanning never fails: unscannable text becomes an `ERROR` token. In value
/// position such a token (or a literal that does not convert) becomes an
/// [`crate::filter::ValueKind::Invalid`] value so the rest of the tree still
/// builds. Anywhere else it is fatal, as is any syntax error; the resulting
/// [`ParseError`] names the token at which parsing stopped.
pub struct CstParser {
    scanned: LexerResult,
    position: usize,
}

impl CstParser {
    /// Parses `input` into a concrete syntax tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] whose cause is the `EOF` token when the input
    /// is merely incomplete (`field=`, `a=1 and`, `(a=1`), and the offending
    /// token otherwise.
    pub fn parse(input: &str) -> Result<CstNode, ParseError> {
        let mut parser = Self {
            scanned: Lexer::new(input).tokenize_lenient(),
            position: 0,
        };
        let result = parser.parse_root();
        if let Err(err) = &result {
            debug!(
                input,
                incomplete = err.is_incomplete(),
                position = err.position(),
                "cst parse stopped"
            );
        }
        result
    }

    fn parse_root(&mut self) -> Result<CstNode, ParseError> {
        let mut root = self.parse_outer(1)?;

        let mut trailing = Vec::new();
        self.eat_whitespace(&mut trailing);
        let end = self.advance();
        if end.tag != Tag::Eof {
            return Err(self.fail(end, &[Tag::Eof]));
        }
        if let CstNode::Inner { children, .. } = &mut root {
            children.extend(trailing);
        }
        Ok(root)
    }

    fn peek(&self) -> &Token {
        let tokens = &self.scanned.tokens;
        &tokens[self.position.min(tokens.len().saturating_sub(1))]
    }

    /// Returns the next token that is not whitespace, without consuming anything.
    fn peek_significant(&self) -> &Token {
        self.scanned.tokens[self.position..]
            .iter()
            .find(|t| t.tag != Tag::Whitespace)
            .unwrap_or_else(|| self.peek())
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.tag != Tag::Eof {
            self.position += 1;
        }
        token
    }

    /// Moves any whitespace tokens at the cursor into `children`.
    fn eat_whitespace(&mut self, children: &mut Vec<CstNode>) {
        while self.peek().tag == Tag::Whitespace {
            let token = self.advance();
            children.push(CstNode::token(NodeKind::Whitespace, token));
        }
    }

    /// Builds the error for an unexpected `token`.
    fn fail(&self, token: Token, expected: &[Tag]) -> ParseError {
        let reason = match token.tag {
            Tag::Eof => FilterError::UnexpectedEof {
                position: token.start,
            },
            Tag::Error => self
                .scanned
                .error_at(token.start)
                .cloned()
                .unwrap_or_else(|| FilterError::unexpected_token(&token, expected)),
            _ => FilterError::unexpected_token(&token, expected),
        };
        ParseError::new(reason, token)
    }

    fn parse_outer(&mut self, min_precedence: u8) -> Result<CstNode, ParseError> {
        let mut lhs = self.parse_inner()?;

        loop {
            let Some(op) = bool_op_for(self.peek_significant().tag) else {
                break;
            };
            if op.precedence() < min_precedence {
                break;
            }

            let mut children = vec![lhs];
            self.eat_whitespace(&mut children);
            let op_token = self.advance();
            children.push(CstNode::token(NodeKind::BoolOp, op_token));
            self.eat_whitespace(&mut children);

            if self.peek().tag == Tag::Eof {
                let eof = self.peek().clone();
                let reason = FilterError::MissingRightHandSide {
                    operator: op,
                    position: eof.start,
                };
                return Err(ParseError::new(reason, eof));
            }
            children.push(self.parse_outer(op.precedence() + 1)?);
            lhs = CstNode::inner(NodeKind::BoolFilter, children);
        }

        Ok(lhs)
    }

    fn parse_inner(&mut self) -> Result<CstNode, ParseError> {
        let mut children = Vec::new();
        self.eat_whitespace(&mut children);

        let token = self.advance();
        match token.tag {
            Tag::LParen => {
                children.push(CstNode::token(NodeKind::Paren, token));
                children.push(self.parse_outer(0)?);
                self.eat_whitespace(&mut children);
                let close = self.advance();
                if close.tag != Tag::RParen {
                    return Err(self.fail(close, &[Tag::RParen]));
                }
                children.push(CstNode::token(NodeKind::Paren, close));
                Ok(CstNode::inner(NodeKind::Group, children))
            }
            Tag::Field => {
                children.push(CstNode::token(NodeKind::Field, token));
                self.eat_whitespace(&mut children);

                let op = self.advance();
                if !op.tag.is_comparison() {
                    return Err(self.fail(op, &Tag::COMPARISONS));
                }
                children.push(CstNode::token(NodeKind::CompOp, op));
                self.eat_whitespace(&mut children);

                let value_token = self.advance();
                children.push(self.parse_value(value_token)?);
                Ok(CstNode::inner(NodeKind::CompFilter, children))
            }
            _ => Err(self.fail(token, &[Tag::LParen, Tag::Field])),
        }
    }

    /// Malformed literals and unscannable text are absorbed as invalid values.
    fn parse_value(&self, token: Token) -> Result<CstNode, ParseError> {
        match value_from_token(&token) {
            Ok(value) => Ok(CstNode::Value { value }),
            Err(FilterError::InvalidLiteral { .. }) => Ok(invalid_value(token)),
            Err(_) if token.tag == Tag::Error => Ok(invalid_value(token)),
            Err(reason) => Err(ParseError::new(reason, token)),
        }
    }
}

/// Parses `input` into a concrete syntax tree.
pub fn parse_cst(input: &str) -> Result<CstNode, ParseError> {
    CstParser::parse(input)
}

/// Parses `input`, falling back to a flat tree of classified tokens on error.
///
/// On success the tree is the one [`parse_cst`] returns and the error is
/// `None`. Otherwise the root has kind [`NodeKind::ParseError`] and one leaf
/// per scanned token, so every character can still be rendered.
pub fn parse_cst_lossy(input: &str) -> (CstNode, Option<ParseError>) {
    match CstParser::parse(input) {
        Ok(root) => (root, None),
        Err(err) => {
            let leaves = Lexer::new(input)
                .tokenize_lenient()
                .tokens
                .into_iter()
                .filter(|t| t.tag != Tag::Eof)
                .map(|t| CstNode::token(kind_for_tag(t.tag), t))
                .collect();
            (CstNode::inner(NodeKind::ParseError, leaves), Some(err))
        }
    }
}

fn invalid_value(token: Token) -> CstNode {
    let value = Value::invalid(token.lexeme.clone()).with_token(token);
    CstNode::Value { value }
}

fn kind_for_tag(tag: Tag) -> NodeKind {
    match tag {
        Tag::Whitespace => NodeKind::Whitespace,
        Tag::Field => NodeKind::Field,
        Tag::And | Tag::Or => NodeKind::BoolOp,
        Tag::LParen | Tag::RParen => NodeKind::Paren,
        Tag::Int | Tag::Float | Tag::Bool | Tag::String | Tag::Regexp | Tag::Null => {
            NodeKind::Value
        }
        _ if tag.is_comparison() => NodeKind::CompOp,
        _ => NodeKind::Unknown,
    }
}
