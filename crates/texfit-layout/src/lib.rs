//! # texfit-layout
//!
//! Turns one math expression into a ranked list of layout candidates.
//!
//! ## Pipeline
//!
//! ```text
//! expression ──► splitter::split ──► Vec<Term>
//!                     │
//!                     ▼
//!            multiline::wrap_interior / break_into_lines ──► centered array
//!                     │
//!                     ▼
//!            candidates::generate ──► Vec<Candidate> (identity first)
//! ```
//!
//! Everything here is a pure function of the expression and
//! [`LayoutOptions`]. Nothing is cached between calls.
//!
//! ```
//! use texfit_layout::{LayoutOptions, generate};
//!
//! let candidates = generate(r"\left(a+b+c+d+e+f+g\right)^2", &LayoutOptions::default());
//! assert_eq!(candidates[0].line_count, 1);
//! assert!(candidates.len() > 1);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod candidates;
pub mod format;
pub mod multiline;
pub mod splitter;

pub use candidates::{Candidate, generate};
pub use multiline::{break_into_lines, optimal_lines, wrap_interior};
pub use splitter::{RowPolicy, Term, group_rows, smart_rows, split, split_at_equals};

/// Tunables shared by the splitter, multiliner and candidate generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Terms placed on one row when an expression is wrapped at its natural size.
    pub terms_per_line: usize,
    /// Upper bound for [`optimal_lines`].
    pub max_lines: usize,
    /// Expressions with fewer characters never get multi-line candidates.
    pub min_wrap_length: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            terms_per_line: 3,
            max_lines: 6,
            min_wrap_length: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("terms_per_line must be at least 1")]
    ZeroTermsPerLine,
    #[error("max_lines must be at least 1")]
    ZeroMaxLines,
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.terms_per_line == 0 {
            return Err(OptionsError::ZeroTermsPerLine);
        }
        if self.max_lines == 0 {
            return Err(OptionsError::ZeroMaxLines);
        }
        Ok(())
    }
}
