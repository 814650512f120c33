//! Output formatting utilities for the rsq CLI.
//!
//! Formatters return strings so commands decide where they go.
//!
//! - [`query`] - filter queries (parse, check)
//! - [`terms`] - human search terms

mod query;
mod terms;

pub use query::{format_caret, format_check_json, format_cst, format_filter_json, invalid_values};
pub use terms::{format_terms_json, format_terms_table};
