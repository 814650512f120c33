//! Precedence climbing parser for filter expressions.

use tracing::debug;

use super::ast::{BoolOp, CompOp, Filter};
use super::error::{FilterError, FilterResult};
use super::lexer::{Lexer, Tag, Token};
use super::value::{Literal, Value};

/// Strict parser for the filter DSL.
///
/// This is the parser used for submitted queries: the first scan or syntax
/// error aborts the parse. Whitespace is insignificant.
///
/// # Grammar
///
/// ```text
/// outer(min) ::= inner (bool_op outer(prec(bool_op) + 1))*   -- while prec(bool_op) >= min
/// inner      ::= "(" outer(0) ")" | FIELD comp_op value
/// value      ::= NULL | INT | FLOAT | BOOL | STRING | REGEXP
/// bool_op    ::= "and" | "or"
/// comp_op    ::= "=" | "!=" | "~=" | "~" | "<" | "<=" | ">" | ">="
/// ```
///
/// `and` (precedence 2) binds tighter than `or` (precedence 1); operators of
/// equal precedence associate to the left.
///
/// # Example
///
/// ```
/// use rsk_query_rs::filter::{Filter, FilterParser, Value};
///
/// let filter = FilterParser::parse("a=1 or b=2 and c=3").unwrap();
/// assert_eq!(
///     filter,
///     Filter::or(
///         Filter::eq("a", Value::int(1)),
///         Filter::and(Filter::eq("b", Value::int(2)), Filter::eq("c", Value::int(3))),
///     )
/// );
/// ```
pub struct FilterParser {
    /// Significant tokens, always ending with [`Tag::Eof`].
    tokens: Vec<Token>,
    position: usize,
}

impl FilterParser {
    /// Parses a filter expression string into a Filter AST.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` if the input contains only
    /// whitespace, any scan error from the [`Lexer`], and the syntax errors
    /// `UnexpectedToken`, `UnexpectedValue`, `MissingRightHandSide`,
    /// `UnexpectedEof` and `InvalidLiteral`.
    pub fn parse(input: &str) -> FilterResult<Filter> {
        let tokens: Vec<Token> = Lexer::new(input)
            .tokenize()?
            .into_iter()
            .filter(|t| t.tag != Tag::Whitespace)
            .collect();
        if tokens.iter().all(|t| t.tag == Tag::Eof) {
            return Err(FilterError::EmptyExpression);
        }

        let mut parser = Self {
            tokens,
            position: 0,
        };
        let filter = parser.parse_outer(1)?;
        parser.require(&[Tag::Eof])?;

        debug!(input, "parsed filter");
        Ok(filter)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    /// Consumes and returns the current token. The final EOF is never consumed.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.tag != Tag::Eof {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token, failing unless its tag is one of `expected`.
    fn require(&mut self, expected: &[Tag]) -> FilterResult<Token> {
        let token = self.advance();
        if expected.contains(&token.tag) {
            Ok(token)
        } else if token.tag == Tag::Eof {
            Err(FilterError::UnexpectedEof {
                position: token.start,
            })
        } else {
            Err(FilterError::unexpected_token(&token, expected))
        }
    }

    fn parse_outer(&mut self, min_precedence: u8) -> FilterResult<Filter> {
        let mut filter = self.parse_inner()?;

        loop {
            let next = self.peek();
            let Some(op) = bool_op_for(next.tag) else {
                break;
            };
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();

            if self.peek().tag == Tag::Eof {
                return Err(FilterError::MissingRightHandSide {
                    operator: op,
                    position: self.peek().start,
                });
            }
            let rhs = self.parse_outer(op.precedence() + 1)?;
            filter = Filter::boolean(filter, op, rhs);
        }

        Ok(filter)
    }

    fn parse_inner(&mut self) -> FilterResult<Filter> {
        let token = self.advance();
        match token.tag {
            Tag::Eof => Err(FilterError::UnexpectedEof {
                position: token.start,
            }),
            Tag::LParen => {
                let inner = self.parse_outer(0)?;
                self.require(&[Tag::RParen])?;
                Ok(inner)
            }
            Tag::Field => {
                let op_token = self.require(&Tag::COMPARISONS)?;
                let op = comp_op_for(op_token.tag)
                    .ok_or_else(|| FilterError::unexpected_token(&op_token, &Tag::COMPARISONS))?;
                let value_token = self.advance();
                let value = value_from_token(&value_token)?;
                Ok(Filter::comp(token.lexeme, op, value))
            }
            _ => Err(FilterError::unexpected_token(
                &token,
                &[Tag::LParen, Tag::Field],
            )),
        }
    }
}

/// Maps a boolean operator tag to its operator.
pub(super) fn bool_op_for(tag: Tag) -> Option<BoolOp> {
    match tag {
        Tag::And => Some(BoolOp::And),
        Tag::Or => Some(BoolOp::Or),
        _ => None,
    }
}

/// Maps a comparison tag to its operator.
pub(super) fn comp_op_for(tag: Tag) -> Option<CompOp> {
    match tag {
        Tag::Eq => Some(CompOp::Eq),
        Tag::Neq => Some(CompOp::Neq),
        Tag::Like => Some(CompOp::Like),
        Tag::FuzzyLike => Some(CompOp::FuzzyLike),
        Tag::Lt => Some(CompOp::Lt),
        Tag::Le => Some(CompOp::Le),
        Tag::Gt => Some(CompOp::Gt),
        Tag::Ge => Some(CompOp::Ge),
        _ => None,
    }
}

/// Converts a literal token into a [`Value`] carrying that token.
///
/// # Errors
///
/// Returns `FilterError::UnexpectedEof` at the end of input,
/// `FilterError::UnexpectedValue` for tokens that are not literals and
/// `FilterError::InvalidLiteral` for literals whose text does not convert
/// (a lone `-`, an out of range integer, a malformed boolean).
pub(super) fn value_from_token(token: &Token) -> FilterResult<Value> {
    let literal = match token.tag {
        Tag::Null => Literal::Null,
        Tag::Int => token
            .lexeme
            .parse()
            .map(Literal::Int)
            .map_err(|_| FilterError::invalid_literal(token))?,
        Tag::Float => token
            .lexeme
            .parse()
            .map(Literal::Float)
            .map_err(|_| FilterError::invalid_literal(token))?,
        Tag::Bool => match token.lexeme.as_str() {
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            _ => return Err(FilterError::invalid_literal(token)),
        },
        Tag::String => Literal::String(token.lexeme.trim_matches('"').to_string()),
        Tag::Regexp => Literal::Regexp(token.lexeme.trim_matches('/').to_string()),
        Tag::Eof => {
            return Err(FilterError::UnexpectedEof {
                position: token.start,
            })
        }
        _ => return Err(FilterError::unexpected_value(token)),
    };

    Ok(Value::from(literal).with_token(token.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_token_rejects_malformed_bool() {
        let token = Token::new(Tag::Bool, "yes", 2, 5);
        assert_eq!(
            value_from_token(&token),
            Err(FilterError::InvalidLiteral {
                lexeme: "yes".to_string(),
                position: 2,
            })
        );
    }

    #[test]
    fn test_value_from_token_bool() {
        let token = Token::new(Tag::Bool, "false", 0, 5);
        assert_eq!(value_from_token(&token), Ok(Value::bool(false)));
    }
}
