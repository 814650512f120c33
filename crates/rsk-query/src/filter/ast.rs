//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use serde::Serialize;

use super::value::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompOp {
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Neq,
    /// `~=`
    #[serde(rename = "~=")]
    Like,
    /// `~`, an approximate match.
    #[serde(rename = "~")]
    FuzzyLike,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
}

impl CompOp {
    /// Every comparison operator.
    pub const ALL: [CompOp; 8] = [
        CompOp::Eq,
        CompOp::Neq,
        CompOp::Like,
        CompOp::FuzzyLike,
        CompOp::Lt,
        CompOp::Le,
        CompOp::Gt,
        CompOp::Ge,
    ];

    /// Returns the operator's DSL spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompOp::Eq => "=",
            CompOp::Neq => "!=",
            CompOp::Like => "~=",
            CompOp::FuzzyLike => "~",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        }
    }

    /// Parses an operator from its DSL spelling.
    pub fn from_symbol(symbol: &str) -> Option<CompOp> {
        Self::ALL.into_iter().find(|op| op.as_str() == symbol)
    }

    /// Comparisons bind tighter than any boolean operator.
    pub fn precedence(&self) -> u8 {
        3
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    /// Returns the operator's DSL keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }

    /// `and` binds tighter than `or`.
    pub fn precedence(&self) -> u8 {
        match self {
            BoolOp::And => 2,
            BoolOp::Or => 1,
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field op value` comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompFilter {
    /// The field being compared. Never empty in parsed filters.
    pub field: String,
    /// The comparison operator.
    pub op: CompOp,
    /// The value compared against.
    pub value: Value,
}

/// Two filters joined by a boolean operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolFilter {
    /// The left operand.
    pub lhs: Box<Filter>,
    /// The connective.
    pub op: BoolOp,
    /// The right operand.
    pub rhs: Box<Filter>,
}

/// A parsed filter expression.
///
/// Grouping is structural: there are no parenthesis nodes, and a printer
/// decides where parentheses are needed from [`Filter::precedence`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    /// A comparison leaf.
    Comp(CompFilter),
    /// A boolean combination of two filters.
    Bool(BoolFilter),
}

impl Filter {
    /// Creates a comparison filter.
    pub fn comp(field: impl Into<String>, op: CompOp, value: Value) -> Self {
        Filter::Comp(CompFilter {
            field: field.into(),
            op,
            value,
        })
    }

    /// Creates a boolean filter.
    pub fn boolean(lhs: Filter, op: BoolOp, rhs: Filter) -> Self {
        Filter::Bool(BoolFilter {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    /// Creates an AND filter from two filters.
    ///
    /// # Example
    ///
    /// ```
    /// use rsk_query_rs::filter::{Filter, Value};
    ///
    /// let filter = Filter::and(
    ///     Filter::eq("actor", Value::string("karl")),
    ///     Filter::gt("episode", Value::int(3)),
    /// );
    /// assert_eq!(filter.precedence(), 2);
    /// ```
    pub fn and(lhs: Filter, rhs: Filter) -> Self {
        Self::boolean(lhs, BoolOp::And, rhs)
    }

    /// Creates an OR filter from two filters.
    pub fn or(lhs: Filter, rhs: Filter) -> Self {
        Self::boolean(lhs, BoolOp::Or, rhs)
    }

    /// Folds filters left to right into a chain of ANDs.
    ///
    /// Returns `None` if `filters` is empty and the single filter unchanged if
    /// there is only one.
    pub fn and_all(filters: impl IntoIterator<Item = Filter>) -> Option<Self> {
        filters.into_iter().reduce(Filter::and)
    }

    /// Folds filters left to right into a chain of ORs.
    pub fn or_all(filters: impl IntoIterator<Item = Filter>) -> Option<Self> {
        filters.into_iter().reduce(Filter::or)
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Neq, value)
    }

    pub fn like(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Like, value)
    }

    pub fn fuzzy_like(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::FuzzyLike, value)
    }

    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Le, value)
    }

    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: Value) -> Self {
        Self::comp(field, CompOp::Ge, value)
    }

    /// Binding strength of the root node: 3 for comparisons, 2 for AND and
    /// 1 for OR. Only meaningful relative to the parent node.
    pub fn precedence(&self) -> u8 {
        match self {
            Filter::Comp(comp) => comp.op.precedence(),
            Filter::Bool(b) => b.op.precedence(),
        }
    }

    /// Returns every comparison leaf, left to right.
    pub fn comp_filters(&self) -> Vec<&CompFilter> {
        let mut leaves = Vec::new();
        self.collect_comp_filters(&mut leaves);
        leaves
    }

    fn collect_comp_filters<'a>(&'a self, leaves: &mut Vec<&'a CompFilter>) {
        match self {
            Filter::Comp(comp) => leaves.push(comp),
            Filter::Bool(b) => {
                b.lhs.collect_comp_filters(leaves);
                b.rhs.collect_comp_filters(leaves);
            }
        }
    }

    /// Returns the comparison leaves on `field`, left to right.
    pub fn extract(&self, field: &str) -> Vec<&CompFilter> {
        self.comp_filters()
            .into_iter()
            .filter(|comp| comp.field == field)
            .collect()
    }
}

impl From<CompFilter> for Filter {
    fn from(comp: CompFilter) -> Self {
        Filter::Comp(comp)
    }
}
