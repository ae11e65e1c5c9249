//! Measurement of rendered content.
//!
//! The solver never typesets anything itself. It asks a [`Measurer`] how
//! large a piece of content renders at a given font size. Hosts implement
//! the trait over their real typesetter; [`EstimatingMeasurer`] is a
//! deterministic stand-in used by the CLI and in tests.

use serde::{Deserialize, Serialize};
use texfit_syntax::{Lexer, SyntaxKind};
use thiserror::Error;

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    #[error("measurement surface is not attached")]
    Detached,
    #[error("cannot measure at font size {0}")]
    InvalidFontSize(u32),
    #[error("typesetting failed: {0}")]
    Typeset(String),
}

/// Something that can report the rendered size of content.
pub trait Measurer: std::fmt::Debug + Send + Sync {
    /// Renders `content` at `font_size` pixels and returns its bounding box.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] when the content cannot be rendered. The
    /// solver logs the error and skips the candidate.
    fn measure(&self, content: &str, font_size: u32) -> Result<BoxSize, MeasureError>;
}

/// Average glyph advance relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;
/// Row height relative to the font size.
const LINE_HEIGHT: f64 = 1.2;

/// Estimates rendered size from glyph and row counts.
///
/// Every command is one glyph, braces and whitespace are invisible and
/// `\begin{...}`/`\end{...}` markup is ignored. Rows are separated by `\\`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatingMeasurer;

impl EstimatingMeasurer {
    /// Visible glyphs on each row of `content`.
    pub fn row_glyphs(content: &str) -> Vec<usize> {
        let tokens: Vec<_> = Lexer::new(content).collect();
        let mut rows = vec![0usize];
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            i += 1;
            let glyphs = match token.kind {
                SyntaxKind::Whitespace
                | SyntaxKind::LBrace
                | SyntaxKind::RBrace
                | SyntaxKind::Ampersand
                | SyntaxKind::Eof => 0,
                SyntaxKind::Text => token.text.chars().count(),
                SyntaxKind::Command => match token.command_name() {
                    Some("\\") => {
                        rows.push(0);
                        0
                    }
                    Some("begin" | "end") => {
                        i = skip_groups(&tokens, i);
                        0
                    }
                    Some("left" | "right") => 0,
                    _ => 1,
                },
                _ => 1,
            };
            if let Some(row) = rows.last_mut() {
                *row += glyphs;
            }
        }
        rows
    }
}

/// Skips the brace groups that directly follow a `\begin` or `\end`.
fn skip_groups(tokens: &[texfit_syntax::Token<'_>], mut i: usize) -> usize {
    while tokens.get(i).is_some_and(|t| t.kind == SyntaxKind::LBrace) {
        let mut depth = 0usize;
        while let Some(token) = tokens.get(i) {
            i += 1;
            match token.kind {
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    i
}

impl Measurer for EstimatingMeasurer {
    fn measure(&self, content: &str, font_size: u32) -> Result<BoxSize, MeasureError> {
        if font_size == 0 {
            return Err(MeasureError::InvalidFontSize(font_size));
        }
        let rows = Self::row_glyphs(content);
        let widest = rows.iter().copied().max().unwrap_or(0);
        let size = font_size as f64;
        Ok(BoxSize::new(
            widest as f64 * GLYPH_WIDTH * size,
            rows.len() as f64 * LINE_HEIGHT * size,
        ))
    }
}
