//! The [`FitEngine`] facade.

use crate::config::EngineConfig;
use crate::device::{Device, Viewport};
use crate::measure::{BoxSize, EstimatingMeasurer, Measurer};
use crate::solver::{FitError, FitResult, FitSolver};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use texfit_layout::{Candidate, generate};

/// Everything one fit cycle needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRequest {
    pub expression: String,
    pub container: BoxSize,
    pub viewport: Viewport,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    pub content: String,
    pub font_size: u32,
    pub used_multiline: bool,
}

impl From<FitResult> for RenderState {
    fn from(result: FitResult) -> Self {
        Self {
            used_multiline: result.line_count > 1,
            content: result.content,
            font_size: result.font_size,
        }
    }
}

/// Generates candidates for an expression and fits the best one.
///
/// `FitEngine` is cheap to clone; the measurer is shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use texfit_core::{BoxSize, FitEngine, FitRequest, Viewport};
///
/// let engine = FitEngine::new();
/// let request = FitRequest {
///     expression: "x".to_string(),
///     container: BoxSize::new(0.0, 0.0),
///     viewport: Viewport::new(300.0, 600.0),
/// };
///
/// // Nothing fits a zero-sized box, so the identity layout comes back at
/// // the mobile minimum.
/// let result = engine.fit(&request);
/// assert_eq!(result.content, "x");
/// assert_eq!(result.font_size, 18);
/// ```
#[derive(Clone, Debug)]
pub struct FitEngine {
    measurer: Arc<dyn Measurer>,
    config: EngineConfig,
}

impl Default for FitEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FitEngine {
    /// Creates an engine backed by the [`EstimatingMeasurer`].
    pub fn new() -> Self {
        Self::with_measurer(Arc::new(EstimatingMeasurer))
    }

    pub fn with_measurer(measurer: Arc<dyn Measurer>) -> Self {
        Self {
            measurer,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn device(&self, viewport: Viewport) -> Device {
        self.config.device(viewport)
    }

    pub fn candidates(&self, expression: &str) -> Vec<Candidate> {
        generate(expression, &self.config.layout)
    }

    fn solver(&self) -> FitSolver<'_> {
        FitSolver::new(self.measurer.as_ref(), &self.config)
    }

    /// Runs one fit cycle. Never fails.
    pub fn fit(&self, request: &FitRequest) -> FitResult {
        let device = self.device(request.viewport);
        let candidates = self.candidates(&request.expression);
        let result = self.solver().solve(&candidates, request.container, &device);
        debug!(
            "{:?} fit: {} line(s) at {}px",
            device.class, result.line_count, result.font_size
        );
        result
    }

    /// Runs one fit cycle and reports why it could not produce a layout.
    pub fn try_fit(&self, request: &FitRequest) -> Result<FitResult, FitError> {
        let device = self.device(request.viewport);
        let candidates = self.candidates(&request.expression);
        self.solver()
            .try_solve(&candidates, request.container, &device)
    }

    /// The unwrapped expression at the device's minimum font size.
    pub fn fallback(&self, request: &FitRequest) -> FitResult {
        let device = self.device(request.viewport);
        let identity = Candidate::identity(&request.expression);
        self.solver().fallback(Some(&identity), &device)
    }
}
