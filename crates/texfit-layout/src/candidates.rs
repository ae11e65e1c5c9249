//! Candidate generation.

use crate::LayoutOptions;
use crate::multiline::{Wrapped, break_rows, optimal_lines, wrap_interior_rows};
use log::debug;
use serde::{Deserialize, Serialize};
use texfit_syntax::scan;

/// One proposed layout of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub content: String,
    pub line_count: usize,
    /// 1.0 for the untouched expression, lower for more rows.
    pub quality_score: f64,
}

impl Candidate {
    /// The expression exactly as given, on one line.
    pub fn identity(expr: &str) -> Self {
        Self {
            content: expr.to_string(),
            line_count: 1,
            quality_score: 1.0,
        }
    }

    fn wrapped(wrapped: Wrapped, max_lines: usize) -> Self {
        Self {
            content: wrapped.content,
            line_count: wrapped.rows,
            quality_score: quality_score(wrapped.rows, max_lines),
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.line_count > 1
    }
}

fn quality_score(rows: usize, max_lines: usize) -> f64 {
    let rows = rows.max(1);
    1.0 - (rows - 1) as f64 / max_lines.max(rows) as f64
}

/// Produces the layouts the fit solver chooses between.
///
/// The identity candidate always comes first. Multi-line candidates follow
/// in ascending row count, so a solver that keeps the earlier candidate on a
/// tie prefers fewer rows.
pub fn generate(expr: &str, opts: &LayoutOptions) -> Vec<Candidate> {
    let mut candidates = vec![Candidate::identity(expr)];
    if expr.chars().count() < opts.min_wrap_length {
        return candidates;
    }

    let optimal = optimal_lines(expr, opts);
    if optimal < 2 {
        return candidates;
    }

    let delimited = scan(expr).has_delimiter_markers();
    let mut wrapped: Vec<Candidate> = Vec::new();
    for target in 2..=optimal {
        let layout = if delimited {
            wrap_interior_rows(expr, target, opts)
        } else {
            break_rows(expr, target, opts)
        };
        let Some(layout) = layout else {
            debug!("no {target}-line layout for {expr:?}");
            continue;
        };
        let candidate = Candidate::wrapped(layout, opts.max_lines);
        if !candidate.is_multiline()
            || candidate.content == expr
            || wrapped.iter().any(|c| c.content == candidate.content)
        {
            continue;
        }
        wrapped.push(candidate);
    }
    wrapped.sort_by_key(|candidate| candidate.line_count);

    debug!(
        "{} candidates for {expr:?} (optimal {optimal} lines)",
        wrapped.len() + 1
    );
    candidates.extend(wrapped);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    #[test]
    fn test_short_expression_identity_only() {
        let candidates = generate("x", &opts());
        assert_eq!(candidates, vec![Candidate::identity("x")]);
        assert_eq!(generate("a+b+c+d+e+f+g", &opts()).len(), 1);
    }

    #[test]
    fn test_identity_first() {
        let expr = "a + b + c + d + e + f + g + h + i + j";
        let candidates = generate(expr, &opts());
        assert_eq!(candidates[0].content, expr);
        assert_eq!(candidates[0].quality_score, 1.0);
        assert!(candidates.len() > 1);
        assert!(!candidates[0].is_multiline());
        assert!(candidates[1..].iter().all(Candidate::is_multiline));
    }

    #[test]
    fn test_ascending_rows_no_duplicates() {
        let expr = "a + b + c + d + e + f + g + h + i + j + k + l + m";
        let candidates = generate(expr, &opts());
        let rows: Vec<usize> = candidates.iter().map(|c| c.line_count).collect();
        let mut sorted = rows.clone();
        sorted.sort();
        assert_eq!(rows, sorted);
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                assert_ne!(a.content, b.content);
            }
        }
    }

    #[test]
    fn test_delimited_expression_wraps_inside() {
        let candidates = generate(r"\left(a+b+c+d+e+f+g\right)^2", &opts());
        assert!(candidates.len() > 1);
        for candidate in &candidates[1..] {
            assert!(candidate.content.starts_with(r"\left( \begin{array}{c}"));
            assert!(candidate.content.ends_with(r"\right)^2"));
        }
    }

    #[test]
    fn test_single_term_long_expression() {
        let expr = r"\frac{\sqrt{x^2+y^2+z^2}}{\sin\theta}";
        assert_eq!(generate(expr, &opts()).len(), 1);
    }

    #[test]
    fn test_quality_score() {
        assert_eq!(quality_score(1, 6), 1.0);
        assert!((quality_score(2, 6) - (1.0 - 1.0 / 6.0)).abs() < 1e-9);
        assert!(quality_score(8, 6) > 0.0);
        assert!(quality_score(3, 6) < quality_score(2, 6));
    }
}
