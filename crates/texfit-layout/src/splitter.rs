//! Operator splitting.
//!
//! A term starts at the beginning of the expression or at a binary `+`/`-`
//! that sits outside every brace, bracket, parenthesis and `\left`/`\right`
//! pair. The operator stays with the term it opens, so `2x + 3 - 1` becomes
//! `2x`, `+ 3`, `- 1`.

use serde::{Deserialize, Serialize};
use texfit_syntax::{OperatorKind, Scan, Span, scan};

/// One top-level summand, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub text: String,
    pub span: Span,
}

impl Term {
    fn from_span(source: &str, span: Span) -> Option<Term> {
        let span = span.trimmed(source);
        if span.is_empty() {
            return None;
        }
        Some(Term {
            text: span.slice(source).to_string(),
            span,
        })
    }
}

/// Splits `expr` at its top-level binary `+`/`-`.
///
/// Returns no terms for blank input and exactly one term (the trimmed
/// expression) when there is nothing to split on.
pub fn split(expr: &str) -> Vec<Term> {
    split_scanned(expr, &scan(expr))
}

fn split_scanned(expr: &str, scan: &Scan) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut start = 0;
    for op in scan.top_level_operators().filter(|op| op.kind.is_sign()) {
        terms.extend(Term::from_span(expr, Span::new(start, op.offset)));
        start = op.offset;
    }
    terms.extend(Term::from_span(expr, Span::new(start, expr.len())));
    terms
}

/// Splits an equation at its first top-level `=` into `lhs =` and `= rhs`.
///
/// The `=` is kept on both sides so each row reads as a complete relation.
pub fn split_at_equals(expr: &str) -> Option<[Term; 2]> {
    let scan = scan(expr);
    let equals = scan
        .top_level_operators()
        .find(|op| op.kind == OperatorKind::Equals)?;
    let lhs = Term::from_span(expr, Span::new(0, equals.offset + 1))?;
    let rhs = Term::from_span(expr, Span::new(equals.offset, expr.len()))?;
    Some([lhs, rhs])
}

/// Groups the terms of `expr` into rows of `terms_per_row` terms.
///
/// Each row is the source text from its first term to its last, so spacing
/// inside a row is preserved.
pub fn group_rows(expr: &str, terms_per_row: usize) -> Vec<String> {
    group_terms(expr, &split(expr), terms_per_row)
}

fn group_terms(expr: &str, terms: &[Term], terms_per_row: usize) -> Vec<String> {
    terms
        .chunks(terms_per_row.max(1))
        .filter_map(|chunk| {
            let first = chunk.first()?;
            let last = chunk.last()?;
            let span = Span::new(first.span.start, last.span.end);
            Some(span.slice(expr).to_string())
        })
        .collect()
}

/// How [`smart_rows`] lays out an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowPolicy {
    pub terms_per_line: usize,
    /// Break equations at `=` before looking at `+`/`-`.
    pub prioritize_equals: bool,
    /// Narrow screens: one term fewer per row, but never fewer than two.
    pub compact: bool,
}

impl Default for RowPolicy {
    fn default() -> Self {
        Self {
            terms_per_line: 3,
            prioritize_equals: false,
            compact: false,
        }
    }
}

impl RowPolicy {
    pub fn effective_terms_per_line(&self) -> usize {
        if self.compact {
            self.terms_per_line.saturating_sub(1).max(2)
        } else {
            self.terms_per_line.max(1)
        }
    }
}

pub fn smart_rows(expr: &str, policy: &RowPolicy) -> Vec<String> {
    if policy.prioritize_equals {
        if let Some([lhs, rhs]) = split_at_equals(expr) {
            return vec![lhs.text, rhs.text];
        }
    }
    group_rows(expr, policy.effective_terms_per_line())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(expr: &str) -> Vec<String> {
        split(expr).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_split_basic() {
        assert_eq!(texts("2x + 3 - 1"), vec!["2x", "+ 3", "- 1"]);
    }

    #[test]
    fn test_split_no_operators() {
        assert_eq!(texts(r"  \frac{a+b}{c}  "), vec![r"\frac{a+b}{c}"]);
        assert!(split("").is_empty());
        assert!(split("   ").is_empty());
    }

    #[test]
    fn test_split_respects_all_nesting() {
        assert_eq!(
            texts(r"a + \left(b + c\right) - [d - e] + (f + g)"),
            vec!["a", r"+ \left(b + c\right)", "- [d - e]", "+ (f + g)"]
        );
    }

    #[test]
    fn test_split_keeps_unary_signs() {
        assert_eq!(texts("-a + -b"), vec!["-a", "+ -b"]);
        assert_eq!(texts("x = -1 + y"), vec!["x = -1", "+ y"]);
    }

    #[test]
    fn test_split_spans_point_into_source() {
        let src = "a+ b -c";
        for term in split(src) {
            assert_eq!(term.span.slice(src), term.text);
        }
    }

    #[test]
    fn test_split_at_equals() {
        let [lhs, rhs] = split_at_equals("x^2 + 2x = (x+1)^2 - 1").unwrap();
        assert_eq!(lhs.text, "x^2 + 2x =");
        assert_eq!(rhs.text, "= (x+1)^2 - 1");
        assert!(split_at_equals("a + b").is_none());
        assert!(split_at_equals("f(x=1) + 2").is_none());
    }

    #[test]
    fn test_group_rows() {
        assert_eq!(group_rows("a + b + c + d + e", 2), vec!["a + b", "+ c + d", "+ e"]);
        assert_eq!(group_rows("a+b+c+d", 3), vec!["a+b+c", "+d"]);
        assert_eq!(group_rows("a + b", 0), vec!["a", "+ b"]);
    }

    #[test]
    fn test_smart_rows_prefers_equals() {
        let policy = RowPolicy {
            prioritize_equals: true,
            ..RowPolicy::default()
        };
        assert_eq!(smart_rows("y = a + b + c + d", &policy), vec!["y =", "= a + b + c + d"]);
        assert_eq!(smart_rows("a + b + c + d", &policy), vec!["a + b + c", "+ d"]);
    }

    #[test]
    fn test_smart_rows_compact() {
        let policy = RowPolicy {
            compact: true,
            ..RowPolicy::default()
        };
        assert_eq!(policy.effective_terms_per_line(), 2);
        assert_eq!(smart_rows("a + b + c + d", &policy), vec!["a + b", "+ c + d"]);
        let policy = RowPolicy {
            terms_per_line: 1,
            compact: true,
            prioritize_equals: false,
        };
        assert_eq!(policy.effective_terms_per_line(), 2);
    }
}
