//! String-level formatting helpers shared by the multiliner and hosts.

use texfit_syntax::{Lexer, SyntaxKind, scan};

/// Stacks `rows` in a centered `array`.
///
/// Rows are trimmed and blank rows dropped. A single row is returned as is
/// and no rows yield an empty string.
pub fn centered_array<S: AsRef<str>>(rows: &[S]) -> String {
    array_with("c", rows)
}

/// Same as [`centered_array`] with left-aligned rows.
pub fn left_aligned_array<S: AsRef<str>>(rows: &[S]) -> String {
    array_with("l", rows)
}

fn array_with<S: AsRef<str>>(columns: &str, rows: &[S]) -> String {
    let rows: Vec<&str> = rows
        .iter()
        .map(|row| row.as_ref().trim())
        .filter(|row| !row.is_empty())
        .collect();
    match rows.as_slice() {
        [] => String::new(),
        [row] => (*row).to_string(),
        _ => format!(
            "\\begin{{array}}{{{columns}}}\n{}\n\\end{{array}}",
            rows.join(r" \\ ")
        ),
    }
}

/// Puts single spaces around top-level binary `+`/`-` and collapses all
/// other whitespace runs to one space.
pub fn normalize_spacing(expr: &str) -> String {
    let scan = scan(expr);
    let signs: Vec<usize> = scan
        .top_level_operators()
        .filter(|op| op.kind.is_sign())
        .map(|op| op.offset)
        .collect();

    let mut out = String::with_capacity(expr.len());
    let mut skip_whitespace = false;
    for token in Lexer::new(expr) {
        match token.kind {
            SyntaxKind::Whitespace if skip_whitespace => {}
            SyntaxKind::Whitespace => out.push(' '),
            SyntaxKind::Plus | SyntaxKind::Minus if signs.contains(&token.span.start) => {
                out.truncate(out.trim_end().len());
                out.push(' ');
                out.push_str(token.text);
                out.push(' ');
                skip_whitespace = true;
                continue;
            }
            _ => out.push_str(token.text),
        }
        skip_whitespace = false;
    }
    out.trim().to_string()
}

/// Removes whitespace, keeping one space where dropping it would glue a
/// command name to the letters that follow (`\cdot x`).
pub fn compact(expr: &str) -> String {
    let tokens: Vec<_> = Lexer::new(expr).collect();
    let mut out = String::with_capacity(expr.len());
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != SyntaxKind::Whitespace {
            out.push_str(token.text);
            continue;
        }
        let after_word_command = i
            .checked_sub(1)
            .and_then(|prev| tokens[prev].command_name())
            .is_some_and(|name| name.starts_with(|c: char| c.is_ascii_alphabetic()));
        let before_letter = tokens
            .get(i + 1)
            .is_some_and(|next| next.text.starts_with(|c: char| c.is_ascii_alphabetic()));
        if after_word_command && before_letter {
            out.push(' ');
        }
    }
    out
}

/// Closes every `\left` that has no `\right`, innermost first.
///
/// A stray `\right` cannot be repaired without guessing where its `\left`
/// belongs, so it is left alone.
pub fn balance_delimiters(expr: &str) -> String {
    let scan = scan(expr);
    let mut out = expr.to_string();
    for token in scan.unclosed_left_tokens().iter().rev() {
        if token.is_empty() {
            out.push('.');
        }
        out.push_str(r"\right");
        out.push_str(closing_delimiter(token));
    }
    out
}

fn closing_delimiter(open: &str) -> &str {
    match open {
        "(" => ")",
        "[" => "]",
        r"\{" => r"\}",
        r"\langle" => r"\rangle",
        r"\lvert" => r"\rvert",
        r"\lVert" => r"\rVert",
        r"\lfloor" => r"\rfloor",
        r"\lceil" => r"\rceil",
        "|" => "|",
        r"\|" => r"\|",
        _ => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_array() {
        assert_eq!(
            centered_array(&["a+b", " +c "]),
            "\\begin{array}{c}\na+b \\\\ +c\n\\end{array}"
        );
        assert_eq!(centered_array(&["a", "  "]), "a");
        assert_eq!(centered_array::<&str>(&[]), "");
    }

    #[test]
    fn test_left_aligned_array() {
        assert_eq!(
            left_aligned_array(&["x =", "= 1"]),
            "\\begin{array}{l}\nx = \\\\ = 1\n\\end{array}"
        );
    }

    #[test]
    fn test_normalize_spacing() {
        assert_eq!(normalize_spacing("a+b  -c"), "a + b - c");
        assert_eq!(normalize_spacing("  -a+\\frac{x+y}{2}"), r"-a + \frac{x+y}{2}");
        assert_eq!(normalize_spacing("x =  -1"), "x = -1");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact("a + b - c"), "a+b-c");
        assert_eq!(compact(r"2 \cdot x + \alpha"), r"2\cdot x+\alpha");
        assert_eq!(compact(r"\left( a \right)"), r"\left(a\right)");
    }

    #[test]
    fn test_balance_delimiters() {
        assert_eq!(balance_delimiters(r"\left( a + b"), r"\left( a + b\right)");
        assert_eq!(
            balance_delimiters(r"\left[ \left\{ a"),
            r"\left[ \left\{ a\right\}\right]"
        );
        assert_eq!(balance_delimiters(r"a + \left"), r"a + \left.\right.");
        assert_eq!(balance_delimiters(r"\left(a\right)"), r"\left(a\right)");
    }
}
