//! Safe Exposure Engine - Live Prediction Loop
//!
//! Loads the trained artifact, then simulates sensor readings and logs the
//! predicted safe exposure time on an interval. Replace the simulator with
//! the real I2C layer once sensors are connected.

use std::time::Duration;

use safe_exposure_core::model::inference;
use safe_exposure_core::predict;
use safe_exposure_core::sim::SensorSim;

/// Default artifact location, written by the offline trainer
const DEFAULT_MODEL_PATH: &str = "models/safe_exposure.onnx";

/// Seconds between simulated readings
const READ_INTERVAL_SECS: u64 = 3;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Safe Exposure Engine (live prediction loop)...");

    let model_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());

    // A missing artifact is fatal: the loop must halt rather than guess
    if let Err(e) = inference::load(&model_path) {
        log::error!("Cannot start without a trained model: {}", e);
        std::process::exit(1);
    }

    if let Some(info) = inference::info() {
        log::info!(
            "Model ready: {} ({} features, layout v{}, schema checked: {})",
            info.model_path,
            info.feature_count,
            info.feature_version,
            info.schema_checked
        );
    }

    let mut sim = SensorSim::from_entropy();
    log::info!("Live loop running, reading every {}s (Ctrl+C to stop)", READ_INTERVAL_SECS);

    loop {
        let reading = sim.read();

        match predict::predict(&reading) {
            Ok(prediction) => {
                log::info!(
                    "UV={:.2} PM2.5={:.1} Temp={:.1}C -> safe exposure ~ {:.1} min",
                    reading.uv_index,
                    reading.pm25,
                    reading.temp_c,
                    prediction.minutes
                );
                log::debug!("features: {}", prediction.features.to_log_entry());
            }
            Err(e) => {
                log::error!("Prediction failed: {}", e);
            }
        }

        std::thread::sleep(Duration::from_secs(READ_INTERVAL_SECS));
    }
}
