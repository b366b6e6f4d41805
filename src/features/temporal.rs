//! Temporal Encoder - Cyclical time features
//!
//! Hour-of-day and day-of-week enter the model as sine/cosine pairs so that
//! 23:59 and 00:00 are numerically adjacent. The timestamp is always an
//! explicit parameter: batch rows pass their recorded datetime, the live path
//! passes wall-clock "now" at its outermost entry point. There is no hidden
//! clock read anywhere below that.

use std::f64::consts::PI;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Continuous hour of day in [0, 24): hour + minute/60
pub fn continuous_hour(at: NaiveDateTime) -> f64 {
    at.hour() as f64 + at.minute() as f64 / 60.0
}

/// Day of week, Monday = 0 .. Sunday = 6
pub fn day_of_week(at: NaiveDateTime) -> u32 {
    at.weekday().num_days_from_monday()
}

/// (sin, cos) of the continuous hour over a 24h period
pub fn hour_encoding(at: NaiveDateTime) -> (f64, f64) {
    let hour = continuous_hour(at);
    let angle = 2.0 * PI * hour / 24.0;
    (angle.sin(), angle.cos())
}

/// (sin, cos) of the day of week over a 7-day period
pub fn dow_encoding(at: NaiveDateTime) -> (f64, f64) {
    let dow = day_of_week(at) as f64;
    let angle = 2.0 * PI * dow / 7.0;
    (angle.sin(), angle.cos())
}

// ============================================================================
// TESTS
// ============================================================================
