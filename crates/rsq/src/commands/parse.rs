//! Parse command implementation.
//!
//! Parses a filter query strictly and prints it in canonical form.

use rsk_query_rs::filter;
use tracing::debug;

use super::{CommandContext, Result};
use crate::output::format_filter_json;

/// Executes the parse command.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let filter = filter::parse(query)?;
    debug!(leaves = filter.comp_filters().len(), "parsed query");

    if ctx.json_output {
        println!("{}", format_filter_json(&filter)?);
    } else if !ctx.quiet {
        println!("{filter}");
    }

    Ok(())
}
