//! Safe-Exposure Label Rule
//!
//! The ground-truth generator for supervised training: three independent
//! piecewise lookups (UV base budget, PM2.5 multiplier, heat-index
//! multiplier) multiplied together, floored at one minute. The thresholds
//! below are the contract - changing any of them silently relabels every
//! historical training row.
//!
//! Used only while preparing training data; at inference time the model
//! produces the predicted counterpart.

// ============================================================================
// PIECEWISE FACTORS
// ============================================================================

/// Base safe minutes from UV index (exclusive upper bounds)
pub fn base_minutes_from_uvi(uv_index: f64) -> f64 {
    if uv_index < 3.0 {
        60.0
    } else if uv_index < 6.0 {
        30.0
    } else if uv_index < 8.0 {
        20.0
    } else if uv_index < 11.0 {
        10.0
    } else {
        5.0
    }
}

/// PM2.5 multiplier over US-AQI-like breakpoints (inclusive upper bounds)
pub fn aqi_multiplier(pm25: f64) -> f64 {
    if pm25 <= 50.0 {
        1.0
    } else if pm25 <= 100.0 {
        0.8
    } else if pm25 <= 150.0 {
        0.6
    } else if pm25 <= 200.0 {
        0.4
    } else {
        0.25
    }
}

/// Heat-index multiplier (inclusive lower bounds, checked hottest first)
pub fn heat_adjustment(heat_index: f64) -> f64 {
    if heat_index >= 38.0 {
        0.6
    } else if heat_index >= 32.0 {
        0.8
    } else {
        1.0
    }
}

// ============================================================================
// LABEL
// ============================================================================

/// Safe exposure minutes: base * pm_mult * heat_mult, rounded to one
/// decimal, never below 1.0
pub fn safe_minutes(uv_index: f64, pm25: f64, heat_index: f64) -> f64 {
    let minutes =
        base_minutes_from_uvi(uv_index) * aqi_multiplier(pm25) * heat_adjustment(heat_index);
    round1(minutes).max(1.0)
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// A batch row is missing an input the label rule needs.
/// The pipeline drops the row, counts it and logs it - this is accounting,
/// not a batch abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingLabelInputError {
    pub row: usize,
    pub field: &'static str,
}

impl std::fmt::Display for MissingLabelInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row {} is missing '{}' required for labeling",
            self.row, self.field
        )
    }
}

impl std::error::Error for MissingLabelInputError {}

// ============================================================================
// TESTS
// ============================================================================
