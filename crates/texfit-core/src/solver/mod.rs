//! Fit solving.
//!
//! ## Algorithm
//!
//! 1. Pick the base font size for the device (narrow phones measure smaller).
//! 2. Subtract device padding from the container. Nothing left means the
//!    container is unmeasurable.
//! 3. Measure every candidate once, at the base size. Candidates whose
//!    measurement fails or comes back empty are skipped.
//! 4. Scale the base size by how much room is left over in the tighter
//!    dimension, apply the safety margin, round down and clamp into the
//!    device's font bounds.
//! 5. The largest size wins. On a tie the earlier candidate is kept, which
//!    favours the identity layout and then fewer rows.
//!
//! [`FitSolver::solve`] never fails: every error maps to the identity
//! layout at the device's minimum font size.

use crate::config::EngineConfig;
use crate::device::{Device, Padding};
use crate::measure::{BoxSize, Measurer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use texfit_layout::Candidate;
use thiserror::Error;

/// The chosen layout and font size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    pub content: String,
    pub font_size: u32,
    pub line_count: usize,
}

impl FitResult {
    fn from_candidate(candidate: &Candidate, font_size: u32) -> Self {
        Self {
            content: candidate.content.clone(),
            font_size,
            line_count: candidate.line_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("container leaves no room for content ({width}x{height} px after padding)")]
    Unmeasurable { width: f64, height: f64 },
    #[error("none of the {0} candidates could be measured")]
    NoMeasurableCandidate(usize),
}

/// Measures candidates against one container.
#[derive(Debug, Clone, Copy)]
pub struct FitSolver<'a> {
    measurer: &'a dyn Measurer,
    config: &'a EngineConfig,
}

impl<'a> FitSolver<'a> {
    pub fn new(measurer: &'a dyn Measurer, config: &'a EngineConfig) -> Self {
        Self { measurer, config }
    }

    /// Picks the candidate that renders largest inside `container`.
    ///
    /// # Errors
    ///
    /// [`FitError::Unmeasurable`] when padding leaves no room, and
    /// [`FitError::NoMeasurableCandidate`] when no candidate produced a
    /// usable box.
    pub fn try_solve(
        &self,
        candidates: &[Candidate],
        container: BoxSize,
        device: &Device,
    ) -> Result<FitResult, FitError> {
        let scale = self.config.font_scale(device);
        let base = self.config.base_font_size(device);
        let available = Padding::for_device(device, container).inner(container);
        if !available.is_positive() {
            return Err(FitError::Unmeasurable {
                width: available.width,
                height: available.height,
            });
        }

        let mut best: Option<(u32, &Candidate)> = None;
        for candidate in candidates {
            let size = match self.measurer.measure(&candidate.content, base) {
                Ok(size) => size,
                Err(err) => {
                    warn!(
                        "skipping {}-line candidate, measurement failed: {err}",
                        candidate.line_count
                    );
                    continue;
                }
            };
            if !size.is_positive() {
                debug!(
                    "skipping {}-line candidate with empty box {}x{}",
                    candidate.line_count, size.width, size.height
                );
                continue;
            }

            let fit = (available.width / size.width).min(available.height / size.height);
            let font_size = scale.clamp(fit * base as f64 * self.config.safety_margin);
            debug!(
                "{}-line candidate: {}x{} at {base}px, fits at {font_size}px",
                candidate.line_count, size.width, size.height
            );
            if best.map_or(true, |(best_size, _)| font_size > best_size) {
                best = Some((font_size, candidate));
            }
        }

        best.map(|(font_size, candidate)| FitResult::from_candidate(candidate, font_size))
            .ok_or(FitError::NoMeasurableCandidate(candidates.len()))
    }

    /// Like [`try_solve`](Self::try_solve), but falls back to the first
    /// candidate at the minimum font size instead of failing.
    pub fn solve(&self, candidates: &[Candidate], container: BoxSize, device: &Device) -> FitResult {
        self.try_solve(candidates, container, device)
            .unwrap_or_else(|err| {
                warn!("falling back to the unwrapped layout: {err}");
                self.fallback(candidates.first(), device)
            })
    }

    /// The identity layout at the device's minimum font size.
    pub fn fallback(&self, identity: Option<&Candidate>, device: &Device) -> FitResult {
        FitResult {
            content: identity.map(|c| c.content.clone()).unwrap_or_default(),
            font_size: self.config.font_scale(device).min,
            line_count: 1,
        }
    }
}
