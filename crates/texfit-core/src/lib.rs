//! # texfit Core
//!
//! Picks the layout and font size that make a math expression fill its
//! container.
//!
//! ## Overview
//!
//! One *fit cycle* takes an expression, the container box and the viewport,
//! and produces a [`FitResult`]:
//!
//! ```text
//! ┌───────────┐  candidates  ┌────────────┐  measure(content, base)  ┌────────────────┐
//! │ FitEngine │ ───────────► │ FitSolver  │ ───────────────────────► │ dyn Measurer   │
//! └─────┬─────┘              └─────┬──────┘                          └────────────────┘
//!       │                          │ largest size wins
//!       │                          ▼
//!       │                    FitResult ──► RenderState
//!       ▼
//! ┌──────────────┐
//! │ FitScheduler │  ← coalesces resize / font triggers into one pending frame
//! └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`device`] - Device classes, viewport and container padding
//! - [`measure`] - The [`Measurer`] capability and a deterministic estimator
//! - [`solver`] - Scores candidates and picks the largest font size
//! - [`scheduler`] - Fit cycle state machine and bounded font retries
//! - [`engine`] - The [`FitEngine`] facade tying everything together
//! - [`config`] - [`EngineConfig`] with JSON loading and validation
//!
//! ## Examples
//!
//! ```
//! use texfit_core::{BoxSize, FitEngine, FitRequest, Viewport};
//!
//! let engine = FitEngine::new();
//! let request = FitRequest {
//!     expression: r"\left(a+b+c+d+e+f+g\right)^2".to_string(),
//!     container: BoxSize::new(160.0, 400.0),
//!     viewport: Viewport::new(375.0, 812.0),
//! };
//!
//! let result = engine.fit(&request);
//! assert!((18..=64).contains(&result.font_size));
//! ```
//!
//! ### Plugging in a real typesetter
//!
//! ```
//! use std::sync::Arc;
//! use texfit_core::measure::{BoxSize, MeasureError, Measurer};
//! use texfit_core::FitEngine;
//!
//! #[derive(Debug)]
//! struct FixedBox;
//!
//! impl Measurer for FixedBox {
//!     fn measure(&self, _content: &str, font_size: u32) -> Result<BoxSize, MeasureError> {
//!         Ok(BoxSize::new(10.0 * font_size as f64, font_size as f64))
//!     }
//! }
//!
//! let engine = FitEngine::with_measurer(Arc::new(FixedBox));
//! assert_eq!(engine.candidates("x").len(), 1);
//! ```

pub mod config;
pub mod device;
pub mod engine;
pub mod measure;
pub mod scheduler;
pub mod solver;

pub use config::{ConfigError, EngineConfig, FontScale, FontScales, MobileTier};
pub use device::{Breakpoints, Device, DeviceClass, Padding, Viewport};
pub use engine::{FitEngine, FitRequest, RenderState};
pub use measure::{BoxSize, EstimatingMeasurer, MeasureError, Measurer};
pub use scheduler::{FitScheduler, FitState, RetryPolicy, RetryTick, Trigger};
pub use solver::{FitError, FitResult, FitSolver};
pub use texfit_layout::{Candidate, LayoutOptions};
