//! Compose command implementation.
//!
//! Builds one comparison from a field name, an operator and a raw value,
//! checked against the configured field metadata.

use rsk_query_rs::filter::CompOp;
use rsk_query_rs::meta::compose;

use super::config::Config;
use super::{CommandContext, Result};

/// Options for the compose command.
pub struct ComposeOptions {
    /// Field name.
    pub field: String,
    /// Comparison operator.
    pub op: CompOp,
    /// Raw value as typed.
    pub value: String,
}

/// Executes the compose command.
pub fn execute(ctx: &CommandContext, config: &Config, opts: &ComposeOptions) -> Result<()> {
    let fields = config.field_meta();
    let filter = compose(&fields, &opts.field, opts.op, &opts.value)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "query": filter.to_string(),
            "filter": filter,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{filter}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use rsk_query_rs::filter::FilterError;
    use rsk_query_rs::meta::{FieldMeta, FieldMetaKind};

    fn quiet() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    fn opts(field: &str, op: CompOp, value: &str) -> ComposeOptions {
        ComposeOptions {
            field: field.to_string(),
            op,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_compose_with_builtin_fields() {
        let config = Config::default();
        assert!(execute(&quiet(), &config, &opts("episode", CompOp::Ge, "3")).is_ok());
        assert!(matches!(
            execute(&quiet(), &config, &opts("episode", CompOp::Like, "3")),
            Err(CommandError::Filter(FilterError::UnsupportedOperator { .. }))
        ));
    }

    #[test]
    fn test_compose_with_configured_fields() {
        let config = Config {
            fields: vec![FieldMeta::new("guest", FieldMetaKind::Keyword)],
            ..Config::default()
        };
        assert!(execute(&quiet(), &config, &opts("guest", CompOp::Eq, "stephen")).is_ok());
        assert!(matches!(
            execute(&quiet(), &config, &opts("actor", CompOp::Eq, "karl")),
            Err(CommandError::Filter(FilterError::UnknownField { .. }))
        ));
    }
}
