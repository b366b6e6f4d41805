//! Raw Readings - Sensor/weather observations and their validation
//!
//! A `RawReading` is one observation from the sensor pair (BME688-class
//! environment sensor + LTR390-class UV/light sensor) or from the dashboard
//! sliders. Validation rejects non-finite or physically impossible values
//! outright; the engine never clamps bad input into range.

use serde::{Deserialize, Serialize};

// ============================================================================
// READING TYPES
// ============================================================================

/// Environment block: the five fields the hardware sensor supplies.
/// Kept separate from `RawReading` because historical batches may lack it
/// entirely and fall back to synthetic fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvReading {
    pub temp_c: f64,
    pub hum_rh: f64,
    pub press_hpa: f64,
    pub gas_res_ohm: f64,
    pub lux: f64,
}

/// One complete observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub uv_index: f64,
    pub pm25: f64,
    pub temp_c: f64,
    pub hum_rh: f64,
    pub press_hpa: f64,
    pub gas_res_ohm: f64,
    pub lux: f64,
}

impl RawReading {
    /// Compose a reading from UV/air-quality values plus an environment block
    pub fn from_parts(uv_index: f64, pm25: f64, env: &EnvReading) -> Self {
        Self {
            uv_index,
            pm25,
            temp_c: env.temp_c,
            hum_rh: env.hum_rh,
            press_hpa: env.press_hpa,
            gas_res_ohm: env.gas_res_ohm,
            lux: env.lux,
        }
    }

    /// Validate finiteness and documented physical ranges.
    ///
    /// Out-of-range input is an error, not something to clamp: a silently
    /// clamped reading would feed the model values the caller never saw.
    pub fn validate(&self) -> Result<(), InvalidReadingError> {
        check_finite("uv_index", self.uv_index)?;
        check_finite("pm25", self.pm25)?;
        check_finite("temp_c", self.temp_c)?;
        check_finite("hum_rh", self.hum_rh)?;
        check_finite("press_hpa", self.press_hpa)?;
        check_finite("gas_res_ohm", self.gas_res_ohm)?;
        check_finite("lux", self.lux)?;

        check_range("uv_index", self.uv_index, self.uv_index >= 0.0, ">= 0")?;
        check_range("pm25", self.pm25, self.pm25 >= 0.0, ">= 0")?;
        check_range(
            "hum_rh",
            self.hum_rh,
            (0.0..=100.0).contains(&self.hum_rh),
            "0..=100 %",
        )?;
        check_range("press_hpa", self.press_hpa, self.press_hpa > 0.0, "> 0 hPa")?;
        check_range(
            "gas_res_ohm",
            self.gas_res_ohm,
            self.gas_res_ohm > 0.0,
            "> 0 Ohm",
        )?;
        check_range("lux", self.lux, self.lux >= 0.0, ">= 0")?;

        Ok(())
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), InvalidReadingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidReadingError {
            field,
            value,
            expected: "a finite number",
        })
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    ok: bool,
    expected: &'static str,
) -> Result<(), InvalidReadingError> {
    if ok {
        Ok(())
    } else {
        Err(InvalidReadingError {
            field,
            value,
            expected,
        })
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// A raw field was non-finite or outside its documented physical range
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidReadingError {
    pub field: &'static str,
    pub value: f64,
    pub expected: &'static str,
}

impl std::fmt::Display for InvalidReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid reading: {} = {} (expected {})",
            self.field, self.value, self.expected
        )
    }
}

impl std::error::Error for InvalidReadingError {}

// ============================================================================
// TESTS
// ============================================================================
