//! Coarse complexity metrics for math expressions.
//!
//! These metrics are informational: they let a host log or bucket generated
//! expressions, and the CLI reports them through `texfit analyze`.

use crate::lexer::Lexer;
use crate::scanner::{Scan, scan};
use crate::SyntaxKind;
use serde::{Deserialize, Serialize};

const FRACTION_COMMANDS: &[&str] = &["frac", "dfrac", "tfrac", "cfrac"];
const INTEGRAL_COMMANDS: &[&str] = &["int", "iint", "iiint", "oint"];
const SUM_COMMANDS: &[&str] = &["sum", "prod"];
const ROOT_COMMANDS: &[&str] = &["sqrt"];

/// Which grouping constructs an expression uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterTypes {
    pub has_parentheses: bool,
    pub has_brackets: bool,
    pub has_braces: bool,
    pub has_left_right: bool,
    /// Uses fractions, roots, integrals or sums.
    pub is_complex: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityLabel {
    Simple,
    Medium,
    Complex,
}

impl ComplexityLabel {
    fn from_score(score: u32) -> Self {
        match score {
            0..=2 => ComplexityLabel::Simple,
            3..=5 => ComplexityLabel::Medium,
            _ => ComplexityLabel::Complex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    /// Length in characters.
    pub length: usize,
    pub has_fractions: bool,
    pub has_integrals: bool,
    pub has_sums: bool,
    pub has_roots: bool,
    pub has_delimiters: bool,
    /// Binary `+`/`-` outside all nesting.
    pub operators: usize,
    pub delimiters: DelimiterTypes,
    pub score: u32,
    pub label: ComplexityLabel,
}

#[derive(Default)]
struct CommandUse {
    fractions: bool,
    integrals: bool,
    sums: bool,
    roots: bool,
    left_right: bool,
    braces: bool,
    brackets: bool,
}

fn command_use(expr: &str) -> CommandUse {
    let mut used = CommandUse::default();
    let mut open_brackets = 0usize;
    let mut open_braces = 0usize;
    for token in Lexer::new(expr) {
        match token.kind {
            SyntaxKind::Command => {
                let Some(name) = token.command_name() else {
                    continue;
                };
                used.fractions |= FRACTION_COMMANDS.contains(&name);
                used.integrals |= INTEGRAL_COMMANDS.contains(&name);
                used.sums |= SUM_COMMANDS.contains(&name);
                used.roots |= ROOT_COMMANDS.contains(&name);
                used.left_right |= name == "left" || name == "right";
            }
            SyntaxKind::LBrace => open_braces += 1,
            SyntaxKind::RBrace if open_braces > 0 => used.braces = true,
            SyntaxKind::LBracket => open_brackets += 1,
            SyntaxKind::RBracket if open_brackets > 0 => used.brackets = true,
            _ => {}
        }
    }
    used
}

fn delimiter_types_of(scan: &Scan, used: &CommandUse) -> DelimiterTypes {
    let pair_uses = |tokens: &[&str]| {
        scan.pairs()
            .iter()
            .any(|pair| tokens.contains(&pair.left_token.as_str()))
    };
    DelimiterTypes {
        has_parentheses: !scan.paren_pairs().is_empty() || pair_uses(&["("]),
        has_brackets: used.brackets || pair_uses(&["["]),
        has_braces: used.braces || pair_uses(&["{", r"\{"]),
        has_left_right: used.left_right,
        is_complex: used.fractions || used.roots || used.integrals || used.sums,
    }
}

/// Detects which delimiter constructs `expr` uses.
pub fn detect_delimiter_types(expr: &str) -> DelimiterTypes {
    let used = command_use(expr);
    delimiter_types_of(&scan(expr), &used)
}

/// Scores the structural complexity of `expr`.
///
/// Weights: fractions +2, integrals +3, sums/products +3, roots +2,
/// `\left`/`\right` +1, more than three top-level operators +2, more than
/// 100 characters +1.
pub fn analyze(expr: &str) -> Complexity {
    let scan = scan(expr);
    let used = command_use(expr);
    let delimiters = delimiter_types_of(&scan, &used);
    let operators = scan.top_level_operator_count();
    let length = expr.chars().count();

    let mut score = 0;
    if used.fractions {
        score += 2;
    }
    if used.integrals {
        score += 3;
    }
    if used.sums {
        score += 3;
    }
    if used.roots {
        score += 2;
    }
    if used.left_right {
        score += 1;
    }
    if operators > 3 {
        score += 2;
    }
    if length > 100 {
        score += 1;
    }

    Complexity {
        length,
        has_fractions: used.fractions,
        has_integrals: used.integrals,
        has_sums: used.sums,
        has_roots: used.roots,
        has_delimiters: used.left_right,
        operators,
        delimiters,
        score,
        label: ComplexityLabel::from_score(score),
    }
}
