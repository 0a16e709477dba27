//! Simulation parameters.
//!
//! # Time model
//!
//! Time is discretised into intervals of `delta_t` seconds.  Departure times,
//! arrival times and travel-time histogram keys are all interval indices
//! (`i32`):
//!
//!   interval = floor(seconds / delta_t)
//!
//! Observed pedestrian data is in seconds and is converted with
//! [`SimParams::interval_of`].  Calibration aggregates use a coarser period
//! (`agg_period_calib`).

use crate::{BlockageWindow, CoreError, CoreResult};

// ── ChoiceCoefficients ────────────────────────────────────────────────────────

/// Coefficients of the route-choice utility
///
///   U(r) = exp(alpha * v_crit(r) / d(r) + beta * d(r))
///
/// Calibrated offline; carried per scenario so that sweeps can vary them.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceCoefficients {
    /// Weight of the critical-velocity / distance ratio.
    pub alpha: f64,
    /// Weight of the route distance (metres).  Negative values penalise
    /// longer routes.
    pub beta: f64,
}

impl Default for ChoiceCoefficients {
    fn default() -> Self {
        Self { alpha: 1.0, beta: 0.0 }
    }
}

// ── SimParams ─────────────────────────────────────────────────────────────────

/// Per-scenario parameters.
///
/// Typically deserialised by the scenario loader (feature `serde`) and passed
/// to the scenario builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimParams {
    /// Seconds per time interval.
    pub delta_t: f64,

    /// Length of one calibration aggregation period in seconds.
    pub agg_period_calib: f64,

    /// Number of intervals to simulate.
    pub total_intervals: u32,

    /// Route-choice coefficients.
    pub route_choice: ChoiceCoefficients,

    /// Which blockage activity rule to apply.
    pub blockage_window: BlockageWindow,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            delta_t:          2.0,
            agg_period_calib: 60.0,
            total_intervals:  900,
            route_choice:     ChoiceCoefficients::default(),
            blockage_window:  BlockageWindow::default(),
        }
    }
}

impl SimParams {
    /// Check that all durations are positive and finite and that the
    /// route-choice coefficients are finite.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.delta_t.is_finite() && self.delta_t > 0.0) {
            return Err(CoreError::Config(format!(
                "delta_t must be positive, got {}",
                self.delta_t
            )));
        }
        if !(self.agg_period_calib.is_finite() && self.agg_period_calib > 0.0) {
            return Err(CoreError::Config(format!(
                "agg_period_calib must be positive, got {}",
                self.agg_period_calib
            )));
        }
        if !(self.route_choice.alpha.is_finite() && self.route_choice.beta.is_finite()) {
            return Err(CoreError::Config(format!(
                "route choice coefficients must be finite, got {:?}",
                self.route_choice
            )));
        }
        Ok(())
    }

    /// Time interval containing `secs`.
    #[inline]
    pub fn interval_of(&self, secs: f64) -> i32 {
        (secs / self.delta_t).floor() as i32
    }

    /// Calibration aggregation period containing `secs`.
    #[inline]
    pub fn calib_interval_of(&self, secs: f64) -> i32 {
        (secs / self.agg_period_calib).floor() as i32
    }

    /// Seconds spanned by `intervals` time intervals.
    #[inline]
    pub fn intervals_to_secs(&self, intervals: i32) -> f64 {
        intervals as f64 * self.delta_t
    }
}
