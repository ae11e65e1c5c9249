//! Fit cycle scheduling.
//!
//! The host owns timers and frame callbacks; the scheduler only keeps the
//! bookkeeping that decides *whether* a cycle must run:
//!
//! ```text
//!            trigger()                 begin()               complete()
//!   Idle ──────────────► pending ────────────► Measuring ─────────────► Resolved
//!                          ▲                      │
//!                          └──── trigger() ───────┘ (stays pending for the next frame)
//! ```
//!
//! Any number of triggers between two frames collapse into one pending
//! cycle, and a cycle never starts while another is in flight.

use crate::engine::{FitEngine, FitRequest, RenderState};
use crate::solver::FitResult;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a new fit cycle was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    ContainerResize,
    ContentResize,
    ViewportResize,
    OrientationChange,
    ExpressionChange,
    /// A late font swap may have changed glyph metrics.
    FontRetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitState {
    Idle,
    Measuring,
    Resolved,
}

/// Bounded re-measurement after mount, for fonts that finish loading late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub step_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            step_ms: 50,
            max_delay_ms: 400,
        }
    }
}

impl RetryPolicy {
    /// Delay before the `attempt`-th retry (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let ms = self.step_ms.saturating_mul(attempt as u64);
        Duration::from_millis(ms.min(self.max_delay_ms))
    }
}

/// Outcome of one fired font retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryTick {
    /// The host must request a frame for the cycle this retry marked pending.
    pub request_frame: bool,
    /// Delay until the next retry, `None` once the window is spent.
    pub next_delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct FitScheduler {
    state: FitState,
    pending: bool,
    result: Option<FitResult>,
    /// Expression `result` was fitted for, when known.
    fitted: Option<String>,
    retry: RetryPolicy,
    retries_used: u32,
    retries_armed: bool,
}

impl Default for FitScheduler {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl FitScheduler {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            state: FitState::Idle,
            pending: false,
            result: None,
            fitted: None,
            retry,
            retries_used: 0,
            retries_armed: false,
        }
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The most recent result, if any cycle has completed.
    pub fn result(&self) -> Option<&FitResult> {
        self.result.as_ref()
    }

    pub fn render_state(&self) -> Option<RenderState> {
        self.result.clone().map(RenderState::from)
    }

    /// Marks a cycle as pending.
    ///
    /// Returns `true` only when the host must request a frame: nothing was
    /// pending yet and no cycle is in flight.
    pub fn trigger(&mut self, trigger: Trigger) -> bool {
        let request_frame = !self.pending && self.state != FitState::Measuring;
        self.pending = true;
        debug!("fit triggered by {trigger:?} (request frame: {request_frame})");
        request_frame
    }

    /// True when a cycle is pending and none is in flight.
    pub fn needs_frame(&self) -> bool {
        self.pending && self.state != FitState::Measuring
    }

    /// Starts the pending cycle. Refused while a cycle is in flight or when
    /// nothing is pending.
    pub fn begin(&mut self) -> bool {
        if !self.needs_frame() {
            return false;
        }
        self.pending = false;
        self.state = FitState::Measuring;
        true
    }

    /// Stores the outcome of the cycle started by [`begin`](Self::begin).
    pub fn complete(&mut self, result: FitResult) {
        self.result = Some(result);
        self.fitted = None;
        self.state = FitState::Resolved;
    }

    /// Runs one cycle from the host's frame callback.
    ///
    /// Returns `false` if no cycle was started. When measurement fails the
    /// previous result is kept if it was fitted for the same expression.
    /// Otherwise the identity layout at the minimum font size is stored.
    pub fn run(&mut self, engine: &FitEngine, request: &FitRequest) -> bool {
        if !self.begin() {
            return false;
        }
        let same_expression = self.fitted.as_deref() == Some(request.expression.as_str());
        let result = match (engine.try_fit(request), self.result.take()) {
            (Ok(result), _) => result,
            (Err(err), Some(previous)) if same_expression => {
                warn!("fit cycle failed, keeping previous layout: {err}");
                previous
            }
            (Err(err), _) => {
                warn!("fit cycle failed, using the unwrapped layout: {err}");
                engine.fallback(request)
            }
        };
        self.complete(result);
        self.fitted = Some(request.expression.clone());
        true
    }

    /// Starts the post-mount retry window. Returns the delay until the first
    /// retry, or `None` when retries are disabled.
    pub fn arm_font_retries(&mut self) -> Option<Duration> {
        self.retries_used = 0;
        self.retries_armed = self.retry.max_attempts > 0;
        self.retries_armed.then(|| self.retry.delay(1))
    }

    /// Called when a retry timer fires.
    ///
    /// Marks a cycle pending and reports whether a frame must be requested
    /// and when the next retry is due. Once the budget is spent it returns
    /// `None` and triggers nothing.
    pub fn on_font_retry(&mut self) -> Option<RetryTick> {
        if !self.retries_armed || self.retries_used >= self.retry.max_attempts {
            self.retries_armed = false;
            return None;
        }
        self.retries_used += 1;
        let request_frame = self.trigger(Trigger::FontRetry);
        let next_delay = if self.retries_used < self.retry.max_attempts {
            Some(self.retry.delay(self.retries_used + 1))
        } else {
            self.retries_armed = false;
            None
        };
        Some(RetryTick {
            request_frame,
            next_delay,
        })
    }

    pub fn retries_used(&self) -> u32 {
        self.retries_used
    }
}
