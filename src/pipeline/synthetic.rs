//! Synthetic Environment Generator
//!
//! Historical UV/air-quality archives carry no BME688/LTR390 readings, so
//! the batch pipeline can fall back to a sinusoidal diurnal model plus
//! bounded noise for the five environment fields. This is a data-quality
//! fallback: every row it touches is flagged `Synthetic` in the output.
//!
//! The RNG is owned by the generator and seeded by the caller - no
//! process-wide seeding, so two pipelines with the same seed produce the
//! same fill regardless of call order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::features::reading::EnvReading;

/// Gas resistance draw range (Ohm)
const GAS_RES_MIN: f64 = 10_000.0;
const GAS_RES_MAX: f64 = 1_000_000.0;

/// Lux per UV index point in the synthetic model
const LUX_PER_UVI: f64 = 10_000.0;

/// Diurnal synthetic environment model
pub struct SyntheticEnv {
    rng: StdRng,
    temp_noise: Normal<f64>,
    hum_noise: Normal<f64>,
    press_noise: Normal<f64>,
    lux_noise: Normal<f64>,
}

impl SyntheticEnv {
    /// Build a generator from an explicit seed
    pub fn from_seed(seed: u64) -> Self {
        // Sigma values are fixed model constants, so these cannot fail
        Self {
            rng: StdRng::seed_from_u64(seed),
            temp_noise: Normal::new(0.0, 1.0).unwrap(),
            hum_noise: Normal::new(0.0, 3.0).unwrap(),
            press_noise: Normal::new(0.0, 1.0).unwrap(),
            lux_noise: Normal::new(500.0, 200.0).unwrap(),
        }
    }

    /// Generate one environment block for the given continuous hour of day.
    ///
    /// Temperature peaks mid-afternoon, humidity moves inversely, pressure
    /// hovers at the standard atmosphere, lux tracks the UV index.
    pub fn generate(&mut self, hour: f64, uv_index: f64) -> EnvReading {
        let phase = (hour - 6.0) * std::f64::consts::PI / 12.0;

        let temp_c = 15.0 + 10.0 * phase.sin() + self.temp_noise.sample(&mut self.rng);
        let hum_rh = 60.0 - 20.0 * phase.sin() + self.hum_noise.sample(&mut self.rng);
        let press_hpa = 1013.0 + self.press_noise.sample(&mut self.rng);
        let gas_res_ohm = self.rng.gen_range(GAS_RES_MIN..GAS_RES_MAX);
        let lux = (uv_index * LUX_PER_UVI + self.lux_noise.sample(&mut self.rng)).max(0.0);

        EnvReading {
            temp_c,
            hum_rh: hum_rh.clamp(0.0, 100.0),
            press_hpa,
            gas_res_ohm,
            lux,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
