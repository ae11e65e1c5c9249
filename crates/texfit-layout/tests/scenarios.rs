use expect_test::{Expect, expect};
use std::fmt::Write;
use texfit_layout::format::{balance_delimiters, centered_array};
use texfit_layout::{
    Candidate, LayoutOptions, RowPolicy, generate, optimal_lines, smart_rows, split, wrap_interior,
};

fn render(candidates: &[Candidate]) -> String {
    let mut out = String::new();
    for candidate in candidates {
        writeln!(
            out,
            "--- {} row(s), quality {:.2}",
            candidate.line_count, candidate.quality_score
        )
        .unwrap();
        writeln!(out, "{}", candidate.content).unwrap();
    }
    out
}

fn check_candidates(expr: &str, expect: Expect) {
    expect.assert_eq(&render(&generate(expr, &LayoutOptions::default())));
}

#[test]
fn test_split_scenario() {
    let terms: Vec<String> = split("2x + 3 - 1").into_iter().map(|t| t.text).collect();
    assert_eq!(terms, vec!["2x", "+ 3", "- 1"]);
}

#[test]
fn test_short_expression_scenario() {
    check_candidates(
        "x",
        expect![[r#"
            --- 1 row(s), quality 1.00
            x
        "#]],
    );
}

#[test]
fn test_delimited_candidates() {
    check_candidates(
        r"\left(a+b+c+d+e+f+g\right)^2",
        expect![[r#"
            --- 1 row(s), quality 1.00
            \left(a+b+c+d+e+f+g\right)^2
            --- 2 row(s), quality 0.83
            \left( \begin{array}{c}
            a+b+c+d+e \\ +f+g
            \end{array} \right)^2
            --- 3 row(s), quality 0.67
            \left( \begin{array}{c}
            a+b+c \\ +d+e+f \\ +g
            \end{array} \right)^2
        "#]],
    );
}

#[test]
fn test_plain_polynomial_candidates() {
    check_candidates(
        "x^4 + 4x^3 + 6x^2 + 4x + 1",
        expect![[r#"
            --- 1 row(s), quality 1.00
            x^4 + 4x^3 + 6x^2 + 4x + 1
            --- 2 row(s), quality 0.83
            \begin{array}{c}
            x^4 + 4x^3 + 6x^2 \\ + 4x + 1
            \end{array}
        "#]],
    );
}

#[test]
fn test_wrap_interior_reconstructs_content() {
    let wrapped = wrap_interior(r"\left(a+b+c+d\right)", 2, &LayoutOptions::default()).unwrap();
    let body = wrapped
        .strip_prefix("\\left( \\begin{array}{c}\n")
        .and_then(|rest| rest.strip_suffix("\n\\end{array} \\right)"))
        .unwrap();
    let rows: Vec<&str> = body.split(r" \\ ").collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.concat(), "a+b+c+d");
}

#[test]
fn test_optimal_lines_counts_through_delimiters() {
    let opts = LayoutOptions::default();
    assert_eq!(optimal_lines(r"\left(a+b+c+d\right)", &opts), 2);
    assert_eq!(optimal_lines(r"\frac{a+b+c+d}{e}", &opts), 1);
}

#[test]
fn test_equation_rows() {
    let policy = RowPolicy {
        prioritize_equals: true,
        ..RowPolicy::default()
    };
    let rows = smart_rows(r"E = mc^2 + \frac{1}{2}mv^2", &policy);
    expect![[r#"
        \begin{array}{c}
        E = \\ = mc^2 + \frac{1}{2}mv^2
        \end{array}
    "#]]
    .assert_eq(&format!("{}\n", centered_array(&rows)));
}

#[test]
fn test_repair_then_generate() {
    let repaired = balance_delimiters(r"\left[ a + b + c + d + e");
    assert_eq!(repaired, r"\left[ a + b + c + d + e\right]");
    let candidates = generate(&repaired, &LayoutOptions::default());
    assert!(candidates[1].content.starts_with(r"\left[ \begin{array}{c}"));
}
