//! Canonical text rendering of filters.

use std::fmt::{self, Write};

use super::ast::{BoolFilter, CompFilter, Filter};

/// Renders a filter as canonical DSL text.
///
/// Comparisons print without spaces (`field=value`), boolean operators are
/// surrounded by single spaces, and a child is parenthesised only when it
/// binds more loosely than its parent. The output re-parses to the same tree
/// up to the associativity of equal-precedence chains. Non-finite floats are
/// the exception: they have no DSL spelling and do not parse back.
///
/// # Example
///
/// ```
/// use rsk_query_rs::filter::{print, Filter, Value};
///
/// let filter = Filter::and(
///     Filter::or(Filter::eq("a", Value::int(1)), Filter::eq("b", Value::int(2))),
///     Filter::eq("c", Value::string("x")),
/// );
/// assert_eq!(print(&filter), r#"(a=1 or b=2) and c="x""#);
/// ```
pub fn print(filter: &Filter) -> String {
    filter.to_string()
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Comp(comp) => write_comp(f, comp),
            Filter::Bool(b) => write_bool(f, b),
        }
    }
}

fn write_comp<W: Write>(w: &mut W, comp: &CompFilter) -> fmt::Result {
    write!(w, "{}{}{}", comp.field, comp.op, comp.value)
}

fn write_bool<W: Write>(w: &mut W, b: &BoolFilter) -> fmt::Result {
    let precedence = b.op.precedence();
    write_operand(w, &b.lhs, precedence)?;
    write!(w, " {} ", b.op)?;
    write_operand(w, &b.rhs, precedence)
}

fn write_operand<W: Write>(w: &mut W, operand: &Filter, parent_precedence: u8) -> fmt::Result {
    if operand.precedence() < parent_precedence {
        write!(w, "({operand})")
    } else {
        write!(w, "{operand}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Value;

    fn leaf(field: &str, n: i64) -> Filter {
        Filter::eq(field, Value::int(n))
    }

    #[test]
    fn test_print_comparisons() {
        assert_eq!(print(&Filter::eq("a", Value::string("x y"))), r#"a="x y""#);
        assert_eq!(print(&Filter::neq("a", Value::null())), "a!=null");
        assert_eq!(print(&Filter::like("a", Value::regexp("^f"))), "a~=/^f/");
        assert_eq!(print(&Filter::fuzzy_like("a", Value::string("f"))), r#"a~"f""#);
        assert_eq!(print(&Filter::ge("a", Value::float(1.5))), "a>=1.5");
        assert_eq!(print(&Filter::lt("a", Value::int(-2))), "a<-2");
        assert_eq!(print(&Filter::le("a", Value::bool(false))), "a<=false");
    }

    #[test]
    fn test_and_inside_or_needs_no_parens() {
        let filter = Filter::or(leaf("a", 1), Filter::and(leaf("b", 2), leaf("c", 3)));
        assert_eq!(print(&filter), "a=1 or b=2 and c=3");
    }

    #[test]
    fn test_or_inside_and_is_parenthesised() {
        let filter = Filter::and(Filter::or(leaf("a", 1), leaf("b", 2)), leaf("c", 3));
        assert_eq!(print(&filter), "(a=1 or b=2) and c=3");

        let filter = Filter::and(leaf("a", 1), Filter::or(leaf("b", 2), leaf("c", 3)));
        assert_eq!(print(&filter), "a=1 and (b=2 or c=3)");
    }

    #[test]
    fn test_equal_precedence_prints_flat() {
        let filter = Filter::and(leaf("a", 1), Filter::and(leaf("b", 2), leaf("c", 3)));
        assert_eq!(print(&filter), "a=1 and b=2 and c=3");
    }

    #[test]
    fn test_inner_quotes_print_idempotently() {
        let filter = Filter::eq("a", Value::string(r#"say "hi""#));
        let printed = print(&filter);
        assert_eq!(printed, r#"a="say hi""#);
        let reparsed = crate::filter::parse(&printed).unwrap();
        assert_eq!(print(&reparsed), printed);
    }
}
