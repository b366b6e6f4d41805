//! Feature Vector Assembler
//!
//! The single construction path for feature vectors. Both the batch pipeline
//! and the live inference adapter call `assemble()` - training/serving parity
//! holds because there is exactly one implementation to diverge from.

use chrono::NaiveDateTime;

use super::physical::{dew_point_c, heat_index_c, uv_vis_ratio};
use super::reading::RawReading;
use super::temporal::{dow_encoding, hour_encoding};
use super::vector::FeatureVector;

/// Assemble the canonical 14-feature vector from one reading.
///
/// `at` is an explicit parameter on purpose: the batch path passes the row's
/// recorded datetime, the live path passes wall-clock now. Total for any
/// validated reading - no branch here can fail.
pub fn assemble(raw: &RawReading, at: NaiveDateTime) -> FeatureVector {
    let (hour_sin, hour_cos) = hour_encoding(at);
    let (dow_sin, dow_cos) = dow_encoding(at);

    // Order must match FEATURE_LAYOUT exactly
    FeatureVector::from_values([
        raw.uv_index,
        raw.pm25,
        raw.temp_c,
        raw.hum_rh,
        raw.press_hpa,
        raw.gas_res_ohm,
        raw.lux,
        dew_point_c(raw.temp_c, raw.hum_rh),
        heat_index_c(raw.temp_c, raw.hum_rh),
        uv_vis_ratio(raw.uv_index, raw.lux),
        hour_sin,
        hour_cos,
        dow_sin,
        dow_cos,
    ])
}

// ============================================================================
// TESTS
// ============================================================================
