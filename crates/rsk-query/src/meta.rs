//! Field metadata: which fields exist, how their values are typed and which
//! comparisons they support.
//!
//! Metadata comes from outside the engine (the search API or a config file).
//! The engine only needs it to type raw input values and to decide which
//! operators a query builder may offer for a field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

use crate::filter::{CompOp, Filter, FilterError, FilterResult, Value};

/// Maximum edit distance for "did you mean" field suggestions.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// How a field is indexed by the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldMetaKind {
    /// Unique, non analysed keyword.
    Identifier,
    /// Non analysed keyword.
    Keyword,
    /// A list of keywords.
    KeywordList,
    /// RFC 3339 timestamp.
    Date,
    /// Analysed free text.
    Text,
    Int,
    Float,
    Unknown,
}

impl FieldMetaKind {
    pub const ALL: [FieldMetaKind; 8] = [
        FieldMetaKind::Identifier,
        FieldMetaKind::Keyword,
        FieldMetaKind::KeywordList,
        FieldMetaKind::Date,
        FieldMetaKind::Text,
        FieldMetaKind::Int,
        FieldMetaKind::Float,
        FieldMetaKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldMetaKind::Identifier => "IDENTIFIER",
            FieldMetaKind::Keyword => "KEYWORD",
            FieldMetaKind::KeywordList => "KEYWORD_LIST",
            FieldMetaKind::Date => "DATE",
            FieldMetaKind::Text => "TEXT",
            FieldMetaKind::Int => "INT",
            FieldMetaKind::Float => "FLOAT",
            FieldMetaKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FieldMetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a field kind name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown field kind '{0}'")]
pub struct ParseFieldKindError(pub String);

/// Parses a kind name, ignoring case (`keyword_list`, `KEYWORD_LIST`).
impl FromStr for FieldMetaKind {
    type Err = ParseFieldKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseFieldKindError(s.to_string()))
    }
}

/// A named field and its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub kind: FieldMetaKind,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, kind: FieldMetaKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The fields of the transcript search index.
pub fn default_fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::new("id", FieldMetaKind::Identifier),
        FieldMeta::new("publication", FieldMetaKind::Keyword),
        FieldMeta::new("series", FieldMetaKind::Int),
        FieldMeta::new("episode", FieldMetaKind::Int),
        FieldMeta::new("actor", FieldMetaKind::Keyword),
        FieldMeta::new("content", FieldMetaKind::Text),
        FieldMeta::new("type", FieldMetaKind::Keyword),
        FieldMeta::new("tags", FieldMetaKind::KeywordList),
    ]
}

/// Returns the comparison operators a field of `kind` supports.
pub fn operators_for_field_kind(kind: FieldMetaKind) -> &'static [CompOp] {
    match kind {
        FieldMetaKind::Identifier
        | FieldMetaKind::Keyword
        | FieldMetaKind::KeywordList
        | FieldMetaKind::Date => &[CompOp::Eq, CompOp::Neq],
        FieldMetaKind::Text => &[CompOp::Eq, CompOp::Neq, CompOp::Like],
        FieldMetaKind::Int | FieldMetaKind::Float => &[
            CompOp::Eq,
            CompOp::Neq,
            CompOp::Gt,
            CompOp::Ge,
            CompOp::Lt,
            CompOp::Le,
        ],
        FieldMetaKind::Unknown => &[],
    }
}

/// Types a raw input value according to the field's kind.
///
/// Numeric kinds parse `raw` as a number; every other kind keeps it as a
/// string. This never fails: a number that does not parse becomes an
/// invalid value.
pub fn value_from_field_meta(meta: &FieldMeta, raw: &str) -> Value {
    match meta.kind {
        FieldMetaKind::Int => raw.trim().parse().map(Value::int).unwrap_or_else(|_| {
            warn!(field = %meta.name, raw, "value is not an integer");
            Value::invalid(raw)
        }),
        FieldMetaKind::Float => raw.trim().parse().map(Value::float).unwrap_or_else(|_| {
            warn!(field = %meta.name, raw, "value is not a number");
            Value::invalid(raw)
        }),
        FieldMetaKind::KeywordList => {
            warn!(field = %meta.name, "keyword lists are not implemented, using a single keyword");
            Value::string(raw)
        }
        FieldMetaKind::Unknown => {
            warn!(field = %meta.name, "unknown field kind, assuming text");
            Value::string(raw)
        }
        FieldMetaKind::Identifier
        | FieldMetaKind::Keyword
        | FieldMetaKind::Date
        | FieldMetaKind::Text => Value::string(raw),
    }
}

/// A provider of field metadata.
pub trait FieldMetaSource {
    /// Returns every known field.
    fn fields(&self) -> &[FieldMeta];

    /// Looks up a field by exact name.
    fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields().iter().find(|meta| meta.name == name)
    }

    /// Returns the operators supported by fields of `kind`.
    fn operators(&self, kind: FieldMetaKind) -> &'static [CompOp] {
        operators_for_field_kind(kind)
    }
}

impl FieldMetaSource for [FieldMeta] {
    fn fields(&self) -> &[FieldMeta] {
        self
    }
}

impl FieldMetaSource for Vec<FieldMeta> {
    fn fields(&self) -> &[FieldMeta] {
        self
    }
}

/// Builds a comparison on a known field from raw input.
///
/// # Errors
///
/// Returns `FilterError::UnknownField` (with the closest field name as a
/// suggestion) when `source` has no such field, `FilterError::UnsupportedOperator`
/// when the field's kind does not support `op`, and `FilterError::InvalidLiteral`
/// when `raw` cannot be typed for the field.
///
/// # Example
///
/// ```
/// use rsk_query_rs::filter::{print, CompOp};
/// use rsk_query_rs::meta::{compose, default_fields};
///
/// let fields = default_fields();
/// let filter = compose(&fields, "episode", CompOp::Ge, "3").unwrap();
/// assert_eq!(print(&filter), "episode>=3");
/// assert!(compose(&fields, "actor", CompOp::Gt, "karl").is_err());
/// ```
pub fn compose<S>(source: &S, field: &str, op: CompOp, raw: &str) -> FilterResult<Filter>
where
    S: FieldMetaSource + ?Sized,
{
    let meta = lookup_field(source, field)?;
    if !source.operators(meta.kind).contains(&op) {
        return Err(FilterError::UnsupportedOperator {
            field: meta.name.clone(),
            op,
        });
    }

    let value = value_from_field_meta(meta, raw);
    if !value.is_valid() {
        return Err(FilterError::InvalidLiteral {
            lexeme: raw.to_string(),
            position: 0,
        });
    }
    Ok(Filter::comp(meta.name.clone(), op, value))
}

/// Looks up a field by name.
///
/// # Errors
///
/// Returns `FilterError::UnknownField` when `source` has no such field. The
/// error names the closest known field, if one is near enough.
pub fn lookup_field<'a, S>(source: &'a S, field: &str) -> FilterResult<&'a FieldMeta>
where
    S: FieldMetaSource + ?Sized,
{
    source.field(field).ok_or_else(|| {
        let names = source.fields().iter().map(|meta| meta.name.as_str());
        FilterError::UnknownField {
            field: field.to_string(),
            suggestion: find_similar_name(field, names),
        }
    })
}

/// Finds the candidate closest to `query`, if it is within
/// [`MAX_SUGGESTION_DISTANCE`] edits.
fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(query, name)))
        .min_by_key(|(_, distance)| *distance)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_for_field_kind() {
        assert_eq!(
            operators_for_field_kind(FieldMetaKind::Keyword),
            &[CompOp::Eq, CompOp::Neq]
        );
        assert_eq!(
            operators_for_field_kind(FieldMetaKind::Date),
            &[CompOp::Eq, CompOp::Neq]
        );
        assert_eq!(
            operators_for_field_kind(FieldMetaKind::Text),
            &[CompOp::Eq, CompOp::Neq, CompOp::Like]
        );
        assert_eq!(operators_for_field_kind(FieldMetaKind::Float).len(), 6);
        assert!(operators_for_field_kind(FieldMetaKind::Unknown).is_empty());
    }

    #[test]
    fn test_value_from_field_meta() {
        let int = FieldMeta::new("episode", FieldMetaKind::Int);
        assert_eq!(value_from_field_meta(&int, "12"), Value::int(12));
        assert_eq!(value_from_field_meta(&int, "twelve"), Value::invalid("twelve"));

        let float = FieldMeta::new("score", FieldMetaKind::Float);
        assert_eq!(value_from_field_meta(&float, "1.5"), Value::float(1.5));

        for kind in [
            FieldMetaKind::Identifier,
            FieldMetaKind::Keyword,
            FieldMetaKind::KeywordList,
            FieldMetaKind::Date,
            FieldMetaKind::Text,
            FieldMetaKind::Unknown,
        ] {
            let meta = FieldMeta::new("f", kind);
            assert_eq!(value_from_field_meta(&meta, "12"), Value::string("12"));
        }
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("keyword_list".parse::<FieldMetaKind>(), Ok(FieldMetaKind::KeywordList));
        assert_eq!("INT".parse::<FieldMetaKind>(), Ok(FieldMetaKind::Int));
        assert_eq!(
            "number".parse::<FieldMetaKind>(),
            Err(ParseFieldKindError("number".to_string()))
        );
    }

    #[test]
    fn test_kind_deserializes_from_screaming_case() {
        let meta: FieldMeta =
            serde_json::from_str(r#"{"name": "tags", "kind": "KEYWORD_LIST"}"#).unwrap();
        assert_eq!(meta, FieldMeta::new("tags", FieldMetaKind::KeywordList));
    }

    #[test]
    fn test_compose() {
        let fields = default_fields();
        let filter = compose(&fields, "actor", CompOp::Eq, "ricky").unwrap();
        assert_eq!(filter, Filter::eq("actor", Value::string("ricky")));

        let filter = compose(&fields, "series", CompOp::Lt, " 3 ").unwrap();
        assert_eq!(filter, Filter::lt("series", Value::int(3)));
    }

    #[test]
    fn test_compose_unknown_field_suggests() {
        let fields = default_fields();
        assert_eq!(
            compose(&fields, "actr", CompOp::Eq, "karl"),
            Err(FilterError::UnknownField {
                field: "actr".to_string(),
                suggestion: Some("actor".to_string()),
            })
        );
        assert_eq!(
            compose(&fields, "transcript_title", CompOp::Eq, "x"),
            Err(FilterError::UnknownField {
                field: "transcript_title".to_string(),
                suggestion: None,
            })
        );
    }

    #[test]
    fn test_lookup_field() {
        let fields = default_fields();
        assert_eq!(
            lookup_field(&fields, "episode").map(|meta| meta.kind),
            Ok(FieldMetaKind::Int)
        );
        assert!(matches!(
            lookup_field(&fields, "sereis"),
            Err(FilterError::UnknownField { suggestion: Some(ref s), .. }) if s == "series"
        ));
    }

    #[test]
    fn test_compose_rejects_unsupported_operator() {
        let fields = default_fields();
        assert_eq!(
            compose(&fields, "content", CompOp::Gt, "x"),
            Err(FilterError::UnsupportedOperator {
                field: "content".to_string(),
                op: CompOp::Gt,
            })
        );
    }

    #[test]
    fn test_compose_rejects_untyped_value() {
        let fields = default_fields();
        assert!(matches!(
            compose(&fields, "episode", CompOp::Eq, "first"),
            Err(FilterError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_custom_source() {
        struct Fixed(Vec<FieldMeta>);

        impl FieldMetaSource for Fixed {
            fn fields(&self) -> &[FieldMeta] {
                &self.0
            }

            fn operators(&self, _kind: FieldMetaKind) -> &'static [CompOp] {
                &[CompOp::FuzzyLike]
            }
        }

        let source = Fixed(vec![FieldMeta::new("content", FieldMetaKind::Text)]);
        let filter = compose(&source, "content", CompOp::FuzzyLike, "monkey").unwrap();
        assert_eq!(filter, Filter::fuzzy_like("content", Value::string("monkey")));
    }
}
