//! Search term output formatting.

use owo_colors::OwoColorize;

use rsk_query_rs::terms::Term;

/// Formats terms as a table.
pub fn format_terms_table(terms: &[Term], use_colors: bool) -> String {
    if terms.is_empty() {
        return "No terms.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<12} {:<4} {:<10} {}", "Field", "Op", "Span", "Value");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for term in terms {
        let span = format!("{}..{}", term.span.start, term.span.end);
        let line = format!(
            "{:<12} {:<4} {:<10} {}",
            term.field.as_str(),
            term.op.as_str(),
            span,
            term.value
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Formats terms as JSON.
pub fn format_terms_json(terms: &[Term]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(terms)
}
