//! Terms command implementation.
//!
//! Splits human search text into terms, or compiles it into a filter query.

use rsk_query_rs::terms::{parse_terms, print_filter_string};

use super::{CommandContext, Result};
use crate::output::{format_terms_json, format_terms_table};

/// Options for the terms command.
pub struct TermsOptions {
    /// Search text as typed.
    pub text: String,
    /// Print the equivalent filter query instead of the terms.
    pub as_filter: bool,
}

/// Executes the terms command.
pub fn execute(ctx: &CommandContext, opts: &TermsOptions) -> Result<()> {
    let terms = parse_terms(&opts.text)?;

    if opts.as_filter {
        let query = print_filter_string(&terms);
        if ctx.json_output {
            let output = serde_json::json!({ "query": query });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if !ctx.quiet {
            println!("{query}");
        }
    } else if ctx.json_output {
        println!("{}", format_terms_json(&terms)?);
    } else if !ctx.quiet {
        print!("{}", format_terms_table(&terms, ctx.use_colors));
    }

    Ok(())
}
