//! Filter DSL: scanner, parsers and printer.
//!
//! A filter is a boolean combination of field comparisons that the search
//! backend evaluates against episode metadata.
//!
//! # Syntax
//!
//! ## Comparisons
//! - `field = value`, `field != value`
//! - `field ~= value` - pattern match
//! - `field ~ value` - approximate match
//! - `field < value`, `<=`, `>`, `>=`
//!
//! ## Values
//! - `"double quoted strings"`
//! - `42`, `-7` - integers
//! - `3.5`, `-0.25` - floats
//! - `true`, `false`
//! - `null`
//! - `/regexp/`
//!
//! ## Boolean Operators
//! - `and` - binds tighter than `or`
//! - `or`
//! - `()` - Grouping
//!
//! Keywords are lowercase; `AND` is a field name.
//!
//! # Example
//!
//! ```
//! use rsk_query_rs::filter::{self, Filter, Value};
//!
//! let filter = filter::parse(r#"actor = "ricky" and (episode > 3 or publication = "xfm")"#).unwrap();
//! assert_eq!(
//!     filter::print(&filter),
//!     r#"actor="ricky" and (episode>3 or publication="xfm")"#
//! );
//!
//! let cst = filter::parse_cst("actor = \"ricky\"  ").unwrap();
//! assert_eq!(cst.text(), "actor = \"ricky\"  ");
//! ```

mod ast;
mod cst;
mod error;
mod lexer;
mod parser;
mod printer;
mod value;

pub use ast::{BoolFilter, BoolOp, CompFilter, CompOp, Filter};
pub use cst::{parse_cst, parse_cst_lossy, CstNode, CstParser, NodeKind};
pub use error::{FilterError, FilterResult, ParseError};
pub use lexer::{scan, Lexer, LexerResult, Tag, Token};
pub use parser::FilterParser;
pub use printer::print;
pub use value::{Literal, Value, ValueKind};

/// Parses a filter expression, failing on the first scan or syntax error.
///
/// Shorthand for [`FilterParser::parse`].
pub fn parse(input: &str) -> FilterResult<Filter> {
    FilterParser::parse(input)
}
