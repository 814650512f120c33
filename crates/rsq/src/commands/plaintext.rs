//! Plaintext command implementation.
//!
//! Turns a canonical filter query back into the human search syntax.

use rsk_query_rs::filter;
use rsk_query_rs::terms::{print_plaintext, terms_from_filter};

use super::{CommandContext, Result};

/// Executes the plaintext command.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let filter = filter::parse(query)?;
    let terms = terms_from_filter(&filter);
    let text = print_plaintext(&terms);
    let skipped = filter.comp_filters().len() - terms.len();

    if ctx.json_output {
        let output = serde_json::json!({
            "text": text,
            "terms": terms,
            "skipped": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{text}");
    }

    Ok(())
}
