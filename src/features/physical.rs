//! Physical Derivations
//!
//! Pure helpers deriving secondary quantities from raw readings: dew point,
//! heat index (apparent temperature) and the UV-to-visible-light ratio.
//! All three return a finite value for any finite input in the sensors'
//! documented ranges.

/// Smoothing term keeping `uv_vis_ratio` defined when UV and lux are both zero
pub const RATIO_EPSILON: f64 = 1e-6;

/// Dew point approximation (Celsius).
///
/// `dew = T - (100 - RH) / 5`. Not clamped: negative dew points are valid in
/// cold/dry air.
pub fn dew_point_c(temp_c: f64, hum_rh: f64) -> f64 {
    temp_c - ((100.0 - hum_rh) / 5.0)
}

/// Heat index (Celsius-adapted Rothfusz regression).
///
/// Empirical fit, reliable for temp >= ~27 C and humidity >= ~40 %; outside
/// that envelope the value is an extrapolated estimate. The constants match
/// the model's training data and must not be re-derived.
pub fn heat_index_c(temp_c: f64, hum_rh: f64) -> f64 {
    let t = temp_c;
    let rh = hum_rh;

    -8.784695
        + 1.61139411 * t
        + 2.338549 * rh
        - 0.14611605 * t * rh
        - 0.012308094 * t * t
        - 0.016424828 * rh * rh
        + 0.002211732 * t * t * rh
        + 0.00072546 * t * rh * rh
        - 0.000003582 * t * t * rh * rh
}

/// UV-to-visible-light ratio with additive epsilon smoothing.
///
/// The epsilon on both sides keeps the ratio finite at night (uv = lux = 0)
/// and must be applied identically at training and inference time.
pub fn uv_vis_ratio(uv_index: f64, lux: f64) -> f64 {
    (uv_index + RATIO_EPSILON) / (lux + RATIO_EPSILON)
}

// ============================================================================
// TESTS
// ============================================================================
