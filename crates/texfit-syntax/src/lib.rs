//! # texfit-syntax
//!
//! Structural scanning of LaTeX-like math expressions.
//!
//! The crate never builds a full syntax tree. Layout decisions only need a
//! handful of structural facts about an expression:
//!
//! - where the atomic command tokens are (`\frac`, `\{`, `\left`, ...),
//! - how deeply each `+`, `-` and `=` is nested in braces, brackets,
//!   parentheses and `\left`/`\right` delimiters,
//! - which `\left ... \right` and `( ... )` spans pair up.
//!
//! [`lexer::Lexer`] produces the token stream, [`scanner::scan`] turns it into
//! a [`Scan`], and [`analysis`] derives coarse complexity metrics from both.
//!
//! Scanning is total: malformed input (stray `}`, unmatched `\left`, a
//! `\right` with nothing open) never panics and never errors. It only yields
//! fewer structural facts.
//!
//! ```
//! use texfit_syntax::scan;
//!
//! let scan = scan(r"\left(a+b\right)");
//! let pair = scan.first_pair().expect("balanced pair");
//! assert_eq!(pair.content, "a+b");
//! assert_eq!(scan.split_point_count(), 1);
//! ```

use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod lexer;
pub mod scanner;

pub use lexer::{Lexer, Token};
pub use scanner::{DelimiterPair, OperatorKind, OperatorPosition, ParenPair, Scan, scan};

/// Token kinds produced by the [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SyntaxKind {
    Command, // \frac, \left, \{
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Plus,
    Minus,
    Equals,
    Ampersand,
    Whitespace,
    Text,

    Eof,
}

/// A half-open byte range into an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the text covered by this span, or `""` if the span does not lie
    /// on character boundaries of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }

    /// Shrinks the span so that it excludes leading and trailing whitespace.
    pub fn trimmed(&self, source: &str) -> Span {
        let text = self.slice(source);
        let lead = text.len() - text.trim_start().len();
        let trail = text.len() - text.trim_end().len();
        if lead == text.len() {
            return Span::new(self.start, self.start);
        }
        Span::new(self.start + lead, self.end - trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_trimmed() {
        let src = "  a + b  ";
        let span = Span::new(0, src.len()).trimmed(src);
        assert_eq!(span.slice(src), "a + b");
        assert_eq!(span, Span::new(2, 7));
    }

    #[test]
    fn test_span_trimmed_blank() {
        let src = "   ";
        let span = Span::new(0, 3).trimmed(src);
        assert!(span.is_empty());
    }

    #[test]
    fn test_span_slice_out_of_bounds() {
        assert_eq!(Span::new(2, 10).slice("abc"), "");
    }
}
