//! Conversions between terms, filters and plain search text.

use tracing::warn;

use super::lexer::Tag;
use super::parser::{Term, TermField};
use crate::filter::{self, CompFilter, CompOp, Filter, Literal};

/// Joins terms into a single filter, left to right with `and`.
///
/// Returns `None` for an empty slice.
pub fn terms_to_filter(terms: &[Term]) -> Option<Filter> {
    Filter::and_all(terms.iter().map(Term::to_filter))
}

/// Renders terms as canonical filter text, or an empty string if there are none.
pub fn print_filter_string(terms: &[Term]) -> String {
    terms_to_filter(terms)
        .map(|filter| filter::print(&filter))
        .unwrap_or_default()
}

/// Renders terms back into human search syntax.
///
/// Exact content prints quoted, patterns print between slashes and fuzzy
/// content prints bare. Actor and publication terms get their sigil back and
/// are quoted when the value would not scan as a single word.
///
/// # Example
///
/// ```
/// use rsk_query_rs::terms::{parse_terms, print_plaintext};
///
/// let terms = parse_terms(r#"monkey  news @"karl pilkington"  ~xfm"#).unwrap();
/// assert_eq!(print_plaintext(&terms), r#"monkey news @"karl pilkington" ~xfm"#);
/// ```
pub fn print_plaintext(terms: &[Term]) -> String {
    terms.iter().map(plaintext).collect::<Vec<_>>().join(" ")
}

fn plaintext(term: &Term) -> String {
    match term.field {
        TermField::Content if term.op == CompOp::Like || term.tag == Tag::Regexp => {
            format!("/{}/", term.value)
        }
        TermField::Content if term.op == CompOp::Eq => format!("\"{}\"", term.value),
        TermField::Content => term.value.clone(),
        TermField::Actor => format!("@{}", sigil_text(term)),
        TermField::Publication => format!("~{}", sigil_text(term)),
    }
}

fn sigil_text(term: &Term) -> String {
    let needs_quotes = term.tag == Tag::QuotedString || !is_single_word(&term.value);
    if needs_quotes {
        format!("\"{}\"", term.value.replace('"', ""))
    } else {
        term.value.clone()
    }
}

fn is_single_word(value: &str) -> bool {
    is_bare_text(value) && !value.chars().any(char::is_whitespace)
}

/// Text that scans back as plain words: no sigils, no quotes, no leading slash.
fn is_bare_text(value: &str) -> bool {
    !value.trim().is_empty()
        && !value.starts_with('/')
        && !value.chars().any(|c| matches!(c, '@' | '~' | '"'))
}

/// Recovers search terms from the comparison leaves of a filter.
///
/// Leaves are visited left to right and the boolean structure is discarded.
/// Leaves with no search-term form (other fields, unsupported operators,
/// non-string values, text that would scan back as different terms) are
/// skipped with a warning.
pub fn terms_from_filter(filter: &Filter) -> Vec<Term> {
    filter
        .comp_filters()
        .into_iter()
        .filter_map(|comp| {
            let term = term_for(comp);
            if term.is_none() {
                warn!(
                    field = %comp.field,
                    op = %comp.op,
                    value = %comp.value,
                    "filter leaf has no search-term form"
                );
            }
            term
        })
        .collect()
}

fn term_for(comp: &CompFilter) -> Option<Term> {
    let field = TermField::from_name(&comp.field)?;
    let (value, tag) = match (field, comp.op, comp.value.literal()) {
        (TermField::Content, CompOp::FuzzyLike, Literal::String(s)) if is_bare_text(s) => {
            (s, Tag::Word)
        }
        (TermField::Content, CompOp::Eq, Literal::String(s)) if !s.contains('"') => {
            (s, Tag::QuotedString)
        }
        (TermField::Content, CompOp::Like, Literal::Regexp(s)) if !s.contains('/') => {
            (s, Tag::Regexp)
        }
        (TermField::Actor | TermField::Publication, CompOp::Eq, Literal::String(s)) => {
            let tag = if is_single_word(s) {
                Tag::Word
            } else {
                Tag::QuotedString
            };
            (s, tag)
        }
        _ => return None,
    };
    Some(Term::new(field, value.clone(), comp.op, tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Value;
    use crate::terms::parse_terms;

    fn triples(terms: &[Term]) -> Vec<(TermField, String, CompOp)> {
        terms
            .iter()
            .map(|t| (t.field, t.value.clone(), t.op))
            .collect()
    }

    #[test]
    fn test_terms_to_filter_folds_left() {
        let terms = parse_terms(r#"hello world @ricky "exact phrase""#).unwrap();
        let filter = terms_to_filter(&terms).unwrap();
        assert_eq!(
            filter,
            Filter::and(
                Filter::and(
                    Filter::fuzzy_like("content", Value::string("hello world")),
                    Filter::eq("actor", Value::string("ricky")),
                ),
                Filter::eq("content", Value::string("exact phrase")),
            )
        );
    }

    #[test]
    fn test_terms_to_filter_empty() {
        assert_eq!(terms_to_filter(&[]), None);
        assert_eq!(print_filter_string(&[]), "");
    }

    #[test]
    fn test_print_filter_string() {
        let terms = parse_terms("monkey news ~xfm /ne+ws/").unwrap();
        assert_eq!(
            print_filter_string(&terms),
            r#"content~"monkey news" and publication="xfm" and content~=/ne+ws/"#
        );
    }

    #[test]
    fn test_print_plaintext() {
        let terms = parse_terms(r#"  hello   world "exact" /re/ @ricky ~"xfm radio""#).unwrap();
        assert_eq!(
            print_plaintext(&terms),
            r#"hello world "exact" /re/ @ricky ~"xfm radio""#
        );
    }

    #[test]
    fn test_plaintext_round_trip_preserves_triples() {
        let input = r#"hello world "exact phrase" @ricky"#;
        let terms = parse_terms(input).unwrap();
        let reparsed = parse_terms(&print_plaintext(&terms)).unwrap();
        assert_eq!(triples(&reparsed), triples(&terms));
    }

    #[test]
    fn test_terms_from_filter() {
        let filter = filter::parse(
            r#"content~"hello world" and actor="ricky" or content="x" and episode>3"#,
        )
        .unwrap();
        let terms = terms_from_filter(&filter);
        assert_eq!(
            triples(&terms),
            vec![
                (TermField::Content, "hello world".to_string(), CompOp::FuzzyLike),
                (TermField::Actor, "ricky".to_string(), CompOp::Eq),
                (TermField::Content, "x".to_string(), CompOp::Eq),
            ]
        );
        assert_eq!(terms[0].tag, Tag::Word);
        assert_eq!(terms[2].tag, Tag::QuotedString);
    }

    #[test]
    fn test_terms_from_filter_quotes_multi_word_actor() {
        let filter = Filter::eq("actor", Value::string("karl pilkington"));
        let terms = terms_from_filter(&filter);
        assert_eq!(print_plaintext(&terms), r#"@"karl pilkington""#);
    }

    #[test]
    fn test_filter_round_trip_through_terms() {
        let terms = parse_terms(r#"monkey news "little bit" @karl /ne+/"#).unwrap();
        let printed = print_filter_string(&terms);
        let recovered = terms_from_filter(&filter::parse(&printed).unwrap());
        assert_eq!(triples(&recovered), triples(&terms));
        assert_eq!(print_plaintext(&recovered), print_plaintext(&terms));
    }

    #[test]
    fn test_terms_from_filter_skips_text_that_rescans_differently() {
        for value in ["karl@xfm", "~radio", "say \"hi\"", "/etc", "", "  "] {
            let filter = Filter::fuzzy_like("content", Value::string(value));
            assert!(terms_from_filter(&filter).is_empty(), "value {value:?}");
        }

        let filter = Filter::eq("content", Value::string("a \"b\""));
        assert!(terms_from_filter(&filter).is_empty());

        let filter = Filter::like("content", Value::regexp("a/b"));
        assert!(terms_from_filter(&filter).is_empty());
    }

    #[test]
    fn test_terms_from_filter_keeps_only_representable_leaves() {
        let filter = filter::parse(r#"content~"karl@xfm" and content~"monkey news""#).unwrap();
        let terms = terms_from_filter(&filter);
        assert_eq!(
            triples(&terms),
            vec![(TermField::Content, "monkey news".to_string(), CompOp::FuzzyLike)]
        );

        let reparsed = parse_terms(&print_plaintext(&terms)).unwrap();
        assert_eq!(triples(&reparsed), triples(&terms));
    }
}
