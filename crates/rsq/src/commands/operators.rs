//! Operators command implementation.
//!
//! Lists the comparison operators a field kind supports.

use rsk_query_rs::filter::CompOp;
use rsk_query_rs::meta::{lookup_field, operators_for_field_kind, FieldMetaKind};

use super::config::Config;
use super::{CommandContext, Result};

/// What to list operators for.
pub enum OperatorsTarget<'a> {
    /// A field kind given directly.
    Kind(FieldMetaKind),
    /// A configured field, looked up by name.
    Field(&'a str),
}

/// Resolves the target to a field kind.
fn resolve_kind(config: &Config, target: &OperatorsTarget<'_>) -> Result<FieldMetaKind> {
    match target {
        OperatorsTarget::Kind(kind) => Ok(*kind),
        OperatorsTarget::Field(name) => {
            let fields = config.field_meta();
            Ok(lookup_field(&fields, name)?.kind)
        }
    }
}

/// Executes the operators command.
pub fn execute(ctx: &CommandContext, config: &Config, target: &OperatorsTarget<'_>) -> Result<()> {
    let kind = resolve_kind(config, target)?;
    let operators: Vec<&str> = operators_for_field_kind(kind)
        .iter()
        .map(CompOp::as_str)
        .collect();

    if ctx.json_output {
        let output = serde_json::json!({
            "kind": kind,
            "operators": operators,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{}", operators.join(" "));
    }

    Ok(())
}
