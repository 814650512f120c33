//! Query language engine for rsk search.
//!
//! Two surface syntaxes compile to one canonical [`filter::Filter`] tree:
//!
//! - the filter DSL (`actor = "ricky" and (episode > 3 or publication = "xfm")`),
//!   parsed strictly by [`filter::parse`] or tolerantly, with whitespace and
//!   spans retained, by [`filter::parse_cst`];
//! - the human search syntax (`hello world @ricky ~xfm "exact phrase"`),
//!   parsed by [`terms::parse_terms`] and folded into a filter with
//!   [`terms::terms_to_filter`].
//!
//! [`filter::print`] renders a filter back to canonical DSL text, which is
//! what the search backend consumes.
//!
//! # Example
//!
//! ```
//! use rsk_query_rs::filter::{self, Filter, Value};
//! use rsk_query_rs::terms;
//!
//! let parsed = filter::parse("a=1 or b=2 and c=3").unwrap();
//! assert_eq!(filter::print(&parsed), "a=1 or b=2 and c=3");
//!
//! let terms = terms::parse_terms("hello world @ricky").unwrap();
//! let combined = terms::terms_to_filter(&terms).unwrap();
//! assert_eq!(
//!     combined,
//!     Filter::and(
//!         Filter::fuzzy_like("content", Value::string("hello world")),
//!         Filter::eq("actor", Value::string("ricky")),
//!     )
//! );
//! ```

pub mod filter;
pub mod meta;
pub mod terms;
pub mod token;

pub use token::{Span, Token};
