//! Sensor Simulator
//!
//! Stands in for the I2C sensor pair until hardware is connected: uniform
//! draws over the ranges the live loop was prototyped with, lux tracking the
//! UV index the way the LTR390 sees daylight. Owns its RNG so runs can be
//! seeded for reproducibility.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::features::reading::RawReading;

/// Simulated sensor source
pub struct SensorSim {
    rng: StdRng,
}

impl SensorSim {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the OS entropy source
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// One simulated observation
    pub fn read(&mut self) -> RawReading {
        let uv_index = self.rng.gen_range(0.0..10.0);
        RawReading {
            uv_index,
            pm25: self.rng.gen_range(10.0..80.0),
            temp_c: self.rng.gen_range(15.0..35.0),
            hum_rh: self.rng.gen_range(30.0..80.0),
            press_hpa: self.rng.gen_range(1008.0..1016.0),
            gas_res_ohm: self.rng.gen_range(10_000.0..1_000_000.0),
            lux: uv_index * 10_000.0 + self.rng.gen_range(100.0..300.0),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
