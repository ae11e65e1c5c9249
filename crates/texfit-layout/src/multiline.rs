//! Multi-line layouts that keep `\left ... \right` pairs intact.
//!
//! A `\left(` on one row and its `\right)` on another does not typeset, so
//! an expression with a delimiter pair is wrapped *inside* the pair: the
//! interior becomes a centered `array` and the delimiters stretch around it.
//!
//! ```text
//! \left(a+b+c+d\right)   ──►   \left( \begin{array}{c}
//!                                     a+b+c \\ +d
//!                                     \end{array} \right)
//! ```

use crate::LayoutOptions;
use crate::format::centered_array;
use crate::splitter::group_rows;
use texfit_syntax::{Span, scan};

/// A wrapped layout and the number of rows it actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Wrapped {
    pub content: String,
    pub rows: usize,
}

/// Estimates how many rows `expr` needs at its natural size.
///
/// Counts binary `+`/`-` outside braces (delimiter pairs do not hide them),
/// then places [`LayoutOptions::terms_per_line`] terms on each row. The
/// result always lies in `1..=max_lines`.
pub fn optimal_lines(expr: &str, opts: &LayoutOptions) -> usize {
    let terms = scan(expr).split_point_count() + 1;
    terms
        .div_ceil(opts.terms_per_line.max(1))
        .clamp(1, opts.max_lines.max(1))
}

/// Wraps the interior of the first delimiter pair into roughly `target` rows.
///
/// Falls back to the first top-level `( ... )` group and then to the whole
/// expression. Returns `None` when the chosen span yields fewer than two rows.
pub fn wrap_interior(expr: &str, target: usize, opts: &LayoutOptions) -> Option<String> {
    wrap_interior_rows(expr, target, opts).map(|wrapped| wrapped.content)
}

/// Wraps the whole expression into roughly `target` rows.
pub fn break_into_lines(expr: &str, target: usize, opts: &LayoutOptions) -> Option<String> {
    break_rows(expr, target, opts).map(|wrapped| wrapped.content)
}

pub(crate) fn wrap_interior_rows(
    expr: &str,
    target: usize,
    opts: &LayoutOptions,
) -> Option<Wrapped> {
    let scan = scan(expr);
    if let Some(pair) = scan.first_pair() {
        let rows = rows_for(&pair.content, target, opts)?;
        let before = Span::new(0, pair.content_span.start).slice(expr);
        let after = Span::new(pair.content_span.end, expr.len()).slice(expr);
        return Some(Wrapped {
            content: format!(
                "{} {} {}",
                before.trim_end(),
                centered_array(&rows),
                after.trim_start()
            ),
            rows: rows.len(),
        });
    }

    if let Some(paren) = scan.first_paren_pair() {
        let rows = rows_for(paren.content_span.slice(expr), target, opts)?;
        let before = Span::new(0, paren.span.start).slice(expr);
        let after = Span::new(paren.span.end, expr.len()).slice(expr);
        return Some(Wrapped {
            content: format!("{before}( {} ){after}", centered_array(&rows)),
            rows: rows.len(),
        });
    }

    break_rows(expr, target, opts)
}

pub(crate) fn break_rows(expr: &str, target: usize, opts: &LayoutOptions) -> Option<Wrapped> {
    let rows = rows_for(expr, target, opts)?;
    Some(Wrapped {
        content: centered_array(&rows),
        rows: rows.len(),
    })
}

/// Groups `content` so that it spreads over about `target` rows.
fn rows_for(content: &str, target: usize, opts: &LayoutOptions) -> Option<Vec<String>> {
    let terms_per_line = opts.terms_per_line.max(1);
    let per_row = (optimal_lines(content, opts) * terms_per_line).div_ceil(target.max(1));
    let rows = group_rows(content, per_row);
    (rows.len() >= 2).then_some(rows)
}
