//! Check command implementation.
//!
//! Checks a query the way a search box does while it is being typed: every
//! character is shown, malformed values are flagged and an unfinished query
//! is not an error.

use rsk_query_rs::filter::{self, ParseError};

use super::{CommandContext, CommandError, Result};
use crate::output::{format_caret, format_check_json, format_cst, invalid_values};

/// Executes the check command.
///
/// Incomplete queries succeed with a notice. Any other syntax error is shown
/// under the offending character and returned.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let (tree, error) = filter::parse_cst_lossy(query);

    if ctx.json_output {
        println!("{}", format_check_json(&tree, error.as_ref())?);
    } else if !ctx.quiet {
        if ctx.verbose {
            for leaf in tree.leaves() {
                eprintln!("{:?} {:?}", leaf.kind(), leaf.text());
            }
        }
        match &error {
            Some(err) if !err.is_incomplete() => {
                println!("{}", format_caret(query, err.position()));
            }
            _ => println!("{}", format_cst(&tree, ctx.use_colors)),
        }
        for invalid in invalid_values(&tree) {
            println!("malformed '{}' at {}", invalid.text, invalid.position);
        }
        if error.as_ref().is_some_and(ParseError::is_incomplete) {
            println!("incomplete query");
        }
    }

    match error {
        Some(err) if !err.is_incomplete() => Err(CommandError::Syntax(err)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_complete_query_succeeds() {
        assert!(execute(&quiet(), r#"actor = "karl" and episode > 3"#).is_ok());
    }

    #[test]
    fn test_incomplete_query_succeeds() {
        assert!(execute(&quiet(), "actor = \"karl\" and").is_ok());
        assert!(execute(&quiet(), "(episode >").is_ok());
        assert!(execute(&quiet(), "field=").is_ok());
    }

    #[test]
    fn test_malformed_value_is_not_an_error() {
        assert!(execute(&quiet(), "episode = -").is_ok());
    }

    #[test]
    fn test_hard_error_fails_with_position() {
        let err = execute(&quiet(), "field@1").unwrap_err();
        match err {
            CommandError::Syntax(parse_err) => assert_eq!(parse_err.position(), 5),
            other => panic!("Expected syntax error, got {other:?}"),
        }
        assert!(matches!(
            execute(&quiet(), "a=1)"),
            Err(CommandError::Syntax(_))
        ));
    }
}
