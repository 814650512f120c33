//! Human search syntax.
//!
//! This is the syntax typed into the search box. It is never sent to the
//! backend directly: terms are folded into a [`crate::filter::Filter`] with
//! [`terms_to_filter`] and printed as canonical DSL text first.
//!
//! # Syntax
//!
//! - `hello world` - bare words, matched approximately against content;
//!   adjacent words form one phrase
//! - `"exact phrase"` - matched exactly against content
//! - `/pattern/` - matched as a pattern against content
//! - `@actor` or `@"two words"` - an actor
//! - `~publication` - a publication
//!
//! Quotes and slashes still open at the end of input close implicitly, so
//! half typed text always scans.
//!
//! # Example
//!
//! ```
//! use rsk_query_rs::terms::{parse_terms, print_filter_string};
//!
//! let terms = parse_terms(r#"hello world @ricky "exact phrase""#).unwrap();
//! assert_eq!(terms.len(), 3);
//! assert_eq!(
//!     print_filter_string(&terms),
//!     r#"content~"hello world" and actor="ricky" and content="exact phrase""#
//! );
//! ```

mod error;
mod lexer;
mod parser;
mod printer;

pub use error::{TermError, TermResult};
pub use lexer::{scan, Lexer, Tag, Token};
pub use parser::{parse_terms, Term, TermField, TermParser};
pub use printer::{print_filter_string, print_plaintext, terms_from_filter, terms_to_filter};
