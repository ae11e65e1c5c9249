//! Structural scanner for math expressions.
//!
//! ## Depth counters
//!
//! The scanner tracks three independent depths while walking the token stream:
//!
//! - **brace depth**: `{` / `}` only. Clamped at zero, so a stray `}` is
//!   ignored instead of underflowing.
//! - **delimiter depth**: `\left` / `\right` only. A `\right` with nothing
//!   open is counted as unmatched and otherwise ignored.
//! - **nesting**: every grouping construct collapsed into one counter
//!   (braces, brackets, parentheses and `\left`/`\right`), also clamped.
//!
//! Every `+`, `-` and `=` is recorded as an [`OperatorPosition`] tagged with
//! all three depths, so callers choose which notion of "top level" they need.
//!
//! ## Unary signs
//!
//! A sign is unary (never a split point) when it is the first significant
//! token, or directly follows another operator, a relation, an opening
//! delimiter, a row/column separator, a sub/superscript marker or a binary
//! operator command such as `\cdot`.

use crate::lexer::{Lexer, Token};
use crate::{Span, SyntaxKind};
use serde::{Deserialize, Serialize};

const BINARY_OPERATOR_COMMANDS: &[&str] = &[
    "cdot", "times", "div", "pm", "mp", "le", "leq", "ge", "geq", "neq", "ne", "lt", "gt",
    "approx", "equiv", "to", "ast",
];

const SPACING_COMMANDS: &[&str] = &[",", ";", ":", "!", " ", "quad", "qquad"];

/// The operator characters the layout engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Plus,
    Minus,
    Equals,
}

impl OperatorKind {
    pub fn is_sign(self) -> bool {
        matches!(self, OperatorKind::Plus | OperatorKind::Minus)
    }
}

/// A scanned `+`, `-` or `=` with the depths it was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPosition {
    /// Byte offset of the operator character.
    pub offset: usize,
    pub kind: OperatorKind,
    /// `{`/`}` depth only.
    pub brace_depth: usize,
    /// `\left`/`\right` depth only.
    pub delimiter_depth: usize,
    /// All grouping constructs collapsed into one counter.
    pub nesting: usize,
    /// Leading or prefix sign; never a split point.
    pub unary: bool,
}

/// A matched `\left ... \right` span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair {
    /// From the `\left` command through the end of the right delimiter token.
    pub span: Span,
    /// Strictly between the left delimiter token and `\right`.
    pub content_span: Span,
    pub content: String,
    /// The delimiter following `\left`, e.g. `(`, `\{`, `\langle` or `.`.
    pub left_token: String,
    pub right_token: String,
    /// 1 for an outermost pair.
    pub depth: usize,
}

/// A matched plain `( ... )` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParenPair {
    pub span: Span,
    pub content_span: Span,
    /// Brace depth at the opening parenthesis.
    pub brace_depth: usize,
    /// 1 for an outermost pair.
    pub depth: usize,
}

/// Structural facts about one expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    operators: Vec<OperatorPosition>,
    pairs: Vec<DelimiterPair>,
    paren_pairs: Vec<ParenPair>,
    left_markers: usize,
    right_markers: usize,
    unclosed_left: Vec<String>,
    unmatched_right: usize,
}

/// Scans `expr` into a [`Scan`]. Never fails.
pub fn scan(expr: &str) -> Scan {
    Scanner::new(expr).run()
}

impl Scan {
    /// Every `+`, `-` and `=` in source order.
    pub fn operators(&self) -> &[OperatorPosition] {
        &self.operators
    }

    /// All matched `\left ... \right` pairs ordered by start offset.
    pub fn pairs(&self) -> &[DelimiterPair] {
        &self.pairs
    }

    /// All matched plain parenthesis pairs ordered by start offset.
    pub fn paren_pairs(&self) -> &[ParenPair] {
        &self.paren_pairs
    }

    /// Binary `+`/`-` at brace depth 0. These drive row-count estimation.
    pub fn split_points(&self) -> impl Iterator<Item = &OperatorPosition> + '_ {
        self.operators
            .iter()
            .filter(|op| op.kind.is_sign() && !op.unary && op.brace_depth == 0)
    }

    pub fn split_point_count(&self) -> usize {
        self.split_points().count()
    }

    /// Binary operators (including `=`) outside all nesting.
    pub fn top_level_operators(&self) -> impl Iterator<Item = &OperatorPosition> + '_ {
        self.operators
            .iter()
            .filter(|op| !op.unary && op.nesting == 0)
    }

    /// Number of binary `+`/`-` outside all nesting.
    pub fn top_level_operator_count(&self) -> usize {
        self.top_level_operators()
            .filter(|op| op.kind.is_sign())
            .count()
    }

    /// The first outermost `\left ... \right` pair, if any.
    pub fn first_pair(&self) -> Option<&DelimiterPair> {
        self.pairs.iter().find(|pair| pair.depth == 1)
    }

    /// The first outermost parenthesis pair outside all braces, if any.
    pub fn first_paren_pair(&self) -> Option<&ParenPair> {
        self.paren_pairs
            .iter()
            .find(|pair| pair.depth == 1 && pair.brace_depth == 0)
    }

    /// True if the expression mentions `\left` or `\right` at all.
    pub fn has_delimiter_markers(&self) -> bool {
        self.left_markers > 0 || self.right_markers > 0
    }

    pub fn unmatched_left(&self) -> usize {
        self.unclosed_left.len()
    }

    /// Delimiter tokens of every `\left` still open at end of input,
    /// outermost first.
    pub fn unclosed_left_tokens(&self) -> &[String] {
        &self.unclosed_left
    }

    pub fn unmatched_right(&self) -> usize {
        self.unmatched_right
    }

    /// True if every `\left` has a matching `\right` and vice versa.
    pub fn is_balanced(&self) -> bool {
        self.unclosed_left.is_empty() && self.unmatched_right == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Operator,
    Opening,
    Operand,
}

struct OpenLeft<'a> {
    start: usize,
    content_start: usize,
    token: &'a str,
}

struct Scanner<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    brace_depth: usize,
    nesting: usize,
    open_lefts: Vec<OpenLeft<'a>>,
    open_parens: Vec<(usize, usize)>,
    prev: Prev,
    scan: Scan,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).collect(),
            brace_depth: 0,
            nesting: 0,
            open_lefts: Vec::new(),
            open_parens: Vec::new(),
            prev: Prev::Start,
            scan: Scan::default(),
        }
    }

    fn run(mut self) -> Scan {
        let mut i = 0;
        while i < self.tokens.len() {
            let token = self.tokens[i];
            i += 1;
            match token.kind {
                SyntaxKind::Whitespace => {}
                SyntaxKind::Command => match token.command_name() {
                    Some("left") => i = self.open_delimiter(token, i),
                    Some("right") => i = self.close_delimiter(token, i),
                    Some("\\") => self.prev = Prev::Opening,
                    Some(name) if SPACING_COMMANDS.contains(&name) => {}
                    Some(name) if BINARY_OPERATOR_COMMANDS.contains(&name) => {
                        self.prev = Prev::Operator
                    }
                    _ => self.prev = Prev::Operand,
                },
                SyntaxKind::LBrace => {
                    self.brace_depth += 1;
                    self.nesting += 1;
                    self.prev = Prev::Opening;
                }
                SyntaxKind::RBrace => {
                    self.brace_depth = self.brace_depth.saturating_sub(1);
                    self.nesting = self.nesting.saturating_sub(1);
                    self.prev = Prev::Operand;
                }
                SyntaxKind::LBracket => {
                    self.nesting += 1;
                    self.prev = Prev::Opening;
                }
                SyntaxKind::RBracket => {
                    self.nesting = self.nesting.saturating_sub(1);
                    self.prev = Prev::Operand;
                }
                SyntaxKind::LParen => {
                    self.open_parens.push((token.span.start, self.brace_depth));
                    self.nesting += 1;
                    self.prev = Prev::Opening;
                }
                SyntaxKind::RParen => {
                    if let Some((open, brace_depth)) = self.open_parens.pop() {
                        self.scan.paren_pairs.push(ParenPair {
                            span: Span::new(open, token.span.end),
                            content_span: Span::new(open + 1, token.span.start),
                            brace_depth,
                            depth: self.open_parens.len() + 1,
                        });
                    }
                    self.nesting = self.nesting.saturating_sub(1);
                    self.prev = Prev::Operand;
                }
                SyntaxKind::Plus => self.operator(token, OperatorKind::Plus),
                SyntaxKind::Minus => self.operator(token, OperatorKind::Minus),
                SyntaxKind::Equals => self.operator(token, OperatorKind::Equals),
                SyntaxKind::Ampersand => self.prev = Prev::Opening,
                SyntaxKind::Text => {
                    self.prev = match token.text.chars().last() {
                        Some('^' | '_' | '<' | '>' | ',') => Prev::Operator,
                        _ => Prev::Operand,
                    };
                }
                SyntaxKind::Eof => break,
            }
        }

        self.scan.unclosed_left = self
            .open_lefts
            .iter()
            .map(|open| open.token.to_string())
            .collect();
        self.scan.pairs.sort_by_key(|pair| pair.span.start);
        self.scan.paren_pairs.sort_by_key(|pair| pair.span.start);
        self.scan
    }

    fn operator(&mut self, token: Token<'a>, kind: OperatorKind) {
        let unary = kind.is_sign()
            && matches!(self.prev, Prev::Start | Prev::Operator | Prev::Opening);
        self.scan.operators.push(OperatorPosition {
            offset: token.span.start,
            kind,
            brace_depth: self.brace_depth,
            delimiter_depth: self.open_lefts.len(),
            nesting: self.nesting,
            unary,
        });
        self.prev = Prev::Operator;
    }

    /// Handles `\left<tok>`. Returns the index of the first token after the
    /// delimiter token.
    fn open_delimiter(&mut self, command: Token<'a>, next: usize) -> usize {
        self.scan.left_markers += 1;
        let (delim, end) = read_delimiter(self.source, command.span.end);
        let (next, partial) = self.skip_tokens(next, end);
        self.open_lefts.push(OpenLeft {
            start: command.span.start,
            content_start: end,
            token: delim,
        });
        self.nesting += 1;
        self.prev = if partial { Prev::Operand } else { Prev::Opening };
        next
    }

    /// Handles `\right<tok>`. Returns the index of the first token after the
    /// delimiter token.
    fn close_delimiter(&mut self, command: Token<'a>, next: usize) -> usize {
        self.scan.right_markers += 1;
        let (delim, end) = read_delimiter(self.source, command.span.end);
        let (next, _) = self.skip_tokens(next, end);
        match self.open_lefts.pop() {
            Some(open) => {
                let content_span = Span::new(open.content_start, command.span.start);
                self.scan.pairs.push(DelimiterPair {
                    span: Span::new(open.start, end),
                    content_span,
                    content: content_span.slice(self.source).to_string(),
                    left_token: open.token.to_string(),
                    right_token: delim.to_string(),
                    depth: self.open_lefts.len() + 1,
                });
                self.nesting = self.nesting.saturating_sub(1);
            }
            None => self.scan.unmatched_right += 1,
        }
        self.prev = Prev::Operand;
        next
    }

    /// Skips every token that starts before `end`. The flag reports whether
    /// the last skipped token extends past `end` (a text run such as `|x`
    /// whose first character is the delimiter).
    fn skip_tokens(&self, mut next: usize, end: usize) -> (usize, bool) {
        let mut partial = false;
        while let Some(token) = self.tokens.get(next) {
            if token.span.start >= end {
                break;
            }
            partial = token.span.end > end;
            next += 1;
        }
        (next, partial)
    }
}

/// Reads the delimiter token following `\left` or `\right`, skipping
/// whitespace. Returns the token text and the byte offset just past it; the
/// token is empty at end of input.
fn read_delimiter(source: &str, from: usize) -> (&str, usize) {
    let rest = source.get(from..).unwrap_or("");
    let trimmed = rest.trim_start();
    let start = from + (rest.len() - trimmed.len());
    let mut chars = trimmed.chars();
    let end = match chars.next() {
        None => start,
        Some('\\') => match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {
                start + 2 + chars.take_while(|c| c.is_ascii_alphabetic()).count()
            }
            Some(c) => start + 1 + c.len_utf8(),
            None => start + 1,
        },
        Some(c) => start + c.len_utf8(),
    };
    (&source[start..end], end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair_interior() {
        let scan = scan(r"\left(a+b\right)");
        assert_eq!(scan.pairs().len(), 1);
        let pair = scan.first_pair().unwrap();
        assert_eq!(pair.content, "a+b");
        assert_eq!(pair.left_token, "(");
        assert_eq!(pair.right_token, ")");
        assert_eq!(pair.span, Span::new(0, 16));
        assert_eq!(pair.depth, 1);
    }

    #[test]
    fn test_nested_pairs_preserved() {
        let src = r"\left[\left(a\right) + b\right]";
        let scan = scan(src);
        assert_eq!(scan.pairs().len(), 2);
        let outer = scan.first_pair().unwrap();
        assert_eq!(outer.content, r"\left(a\right) + b");
        assert_eq!(outer.left_token, "[");
        assert_eq!(scan.pairs()[1].depth, 2);
        assert_eq!(scan.pairs()[1].content, "a");
    }

    #[test]
    fn test_command_delimiters() {
        let scan = scan(r"\left\{ x \right\} + \left\langle y \right\rangle");
        assert_eq!(scan.pairs().len(), 2);
        assert_eq!(scan.pairs()[0].left_token, r"\{");
        assert_eq!(scan.pairs()[0].content, " x ");
        assert_eq!(scan.pairs()[1].left_token, r"\langle");
        assert_eq!(scan.pairs()[1].right_token, r"\rangle");
        assert_eq!(scan.pairs()[1].content, " y ");
    }

    #[test]
    fn test_whitespace_before_delimiter() {
        let scan = scan(r"\left ( a \right )");
        let pair = scan.first_pair().unwrap();
        assert_eq!(pair.left_token, "(");
        assert_eq!(pair.content, " a ");
    }

    #[test]
    fn test_unmatched_left_yields_no_pair() {
        let scan = scan(r"\left( a + b");
        assert!(scan.first_pair().is_none());
        assert_eq!(scan.unmatched_left(), 1);
        assert!(!scan.is_balanced());
        assert!(scan.has_delimiter_markers());
    }

    #[test]
    fn test_unclosed_outer_hides_inner_pair() {
        let scan = scan(r"\left( a + \left[ b \right]");
        assert_eq!(scan.pairs().len(), 1);
        assert_eq!(scan.pairs()[0].depth, 2);
        assert!(scan.first_pair().is_none());
    }

    #[test]
    fn test_stray_right_is_ignored() {
        let scan = scan(r"\right) \left( a \right)");
        assert_eq!(scan.unmatched_right(), 1);
        assert_eq!(scan.first_pair().unwrap().content, " a ");
    }

    #[test]
    fn test_brace_depth_clamped() {
        let scan = scan("a}} + b");
        let op = scan.operators()[0];
        assert_eq!(op.brace_depth, 0);
        assert!(!op.unary);
        assert_eq!(scan.split_point_count(), 1);
    }

    #[test]
    fn test_leading_sign_not_split_point() {
        let scan = scan("-x + 1");
        assert!(scan.operators()[0].unary);
        assert_eq!(scan.split_point_count(), 1);
        let scan = super::scan("  +x");
        assert_eq!(scan.split_point_count(), 0);
    }

    #[test]
    fn test_prefix_signs() {
        let scan = scan(r"x = -1 + y^-2 \cdot -z");
        let unary: Vec<bool> = scan
            .operators()
            .iter()
            .filter(|op| op.kind.is_sign())
            .map(|op| op.unary)
            .collect();
        assert_eq!(unary, vec![true, false, true, true]);
    }

    #[test]
    fn test_operators_inside_braces() {
        let scan = scan(r"\frac{a+b}{c} - d");
        assert_eq!(scan.split_point_count(), 1);
        assert_eq!(scan.operators()[0].brace_depth, 1);
    }

    #[test]
    fn test_delimiter_depth_distinct_from_braces() {
        let scan = scan(r"\left(a+b\right)");
        let op = scan.operators()[0];
        assert_eq!(op.brace_depth, 0);
        assert_eq!(op.delimiter_depth, 1);
        assert_eq!(op.nesting, 1);
        // Brace depth drives split points, nesting drives top-level counts.
        assert_eq!(scan.split_point_count(), 1);
        assert_eq!(scan.top_level_operator_count(), 0);
    }

    #[test]
    fn test_top_level_operator_count() {
        assert_eq!(scan("a + b - c").top_level_operator_count(), 2);
        assert_eq!(
            scan(r"a + \left(b + c\right) - d").top_level_operator_count(),
            2
        );
        assert_eq!(
            scan(r"\left(a + \left(b + c\right)\right)").top_level_operator_count(),
            0
        );
        assert_eq!(scan("2(x+1) + [y-1]").top_level_operator_count(), 1);
    }

    #[test]
    fn test_paren_pairs() {
        let src = "3(x + (y - 1)) + {(z)}";
        let scan = scan(src);
        assert_eq!(scan.paren_pairs().len(), 3);
        let first = scan.first_paren_pair().unwrap();
        assert_eq!(first.content_span.slice(src), "x + (y - 1)");
        assert_eq!(first.span.slice(src), "(x + (y - 1))");
    }

    #[test]
    fn test_escaped_paren_is_not_a_pair() {
        let scan = scan(r"\( a + b \)");
        assert!(scan.paren_pairs().is_empty());
    }

    #[test]
    fn test_left_delimiter_parens_are_not_plain_pairs() {
        let scan = scan(r"\left(a\right)");
        assert!(scan.paren_pairs().is_empty());
    }

    #[test]
    fn test_partial_text_delimiter() {
        let scan = scan(r"\left|x-1\right|");
        let pair = scan.first_pair().unwrap();
        assert_eq!(pair.left_token, "|");
        assert_eq!(pair.content, "x-1");
        assert!(!scan.operators()[0].unary);
    }

    #[test]
    fn test_left_at_end_of_input() {
        let scan = scan(r"a + \left");
        assert!(scan.first_pair().is_none());
        assert_eq!(scan.unmatched_left(), 1);
    }

    #[test]
    fn test_right_dot() {
        let scan = scan(r"\left. x \right|_{0}^{1}");
        let pair = scan.first_pair().unwrap();
        assert_eq!(pair.left_token, ".");
        assert_eq!(pair.right_token, "|");
    }

    #[test]
    fn test_read_delimiter() {
        assert_eq!(read_delimiter(r"\left\lvert x", 5), (r"\lvert", 11));
        assert_eq!(read_delimiter(r"\left", 5), ("", 5));
        assert_eq!(read_delimiter(r"\left\", 5), (r"\", 6));
        assert_eq!(read_delimiter(r"\left  [", 5), ("[", 8));
    }
}
