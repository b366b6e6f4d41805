//! Inference Adapter - Live reading to predicted minutes
//!
//! Bridges one validated reading to the loaded model: validate, assemble the
//! feature vector, run, return the scalar unmodified. The wall clock is read
//! exactly once, here at the public entry point; everything below takes the
//! timestamp as a parameter so the live path and the batch path share one
//! assembler.

use chrono::{Local, NaiveDateTime};

use crate::features::assemble::assemble;
use crate::features::reading::{InvalidReadingError, RawReading};
use crate::features::vector::FeatureVector;
use crate::model::inference::{self, ExposureModel, ModelRunError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Anything that can stop a live prediction
#[derive(Debug)]
pub enum PredictError {
    InvalidReading(InvalidReadingError),
    Model(ModelRunError),
}

impl std::fmt::Display for PredictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictError::InvalidReading(e) => write!(f, "{}", e),
            PredictError::Model(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PredictError {}

impl From<InvalidReadingError> for PredictError {
    fn from(err: InvalidReadingError) -> Self {
        PredictError::InvalidReading(err)
    }
}

impl From<ModelRunError> for PredictError {
    fn from(err: ModelRunError) -> Self {
        PredictError::Model(err)
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Outcome of one live prediction, with the intermediate vector kept for
/// display alongside the scalar
#[derive(Debug, Clone)]
pub struct Prediction {
    pub minutes: f64,
    pub features: FeatureVector,
    pub at: NaiveDateTime,
}

/// Predict safe exposure minutes for a live reading, timestamped now
pub fn predict(reading: &RawReading) -> Result<Prediction, PredictError> {
    predict_at(reading, Local::now().naive_local())
}

/// Predict at an explicit timestamp against the loaded model
pub fn predict_at(reading: &RawReading, at: NaiveDateTime) -> Result<Prediction, PredictError> {
    predict_with(&inference::LoadedModel, reading, at)
}

/// Predict at an explicit timestamp against any model backend.
///
/// The prediction is passed through unclamped: a model extrapolating outside
/// the label range is surfaced, not reinterpreted.
pub fn predict_with(
    model: &dyn ExposureModel,
    reading: &RawReading,
    at: NaiveDateTime,
) -> Result<Prediction, PredictError> {
    reading.validate()?;

    let features = assemble(reading, at);
    let minutes = model.predict(&features)?;

    log::debug!(
        "Predicted {:.1} min safe exposure (uv={:.2}, pm25={:.1})",
        minutes,
        reading.uv_index,
        reading.pm25
    );

    Ok(Prediction {
        minutes,
        features,
        at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::layout::FEATURE_COUNT;
    use crate::model::inference::ModelNotLoadedError;
    use chrono::NaiveDate;

    /// Stub backend: predicts the mean of the feature values. Enough to
    /// prove the vector reaches a model with the right shape and order.
    struct MeanModel;

    impl ExposureModel for MeanModel {
        fn predict(&self, features: &FeatureVector) -> Result<f64, ModelRunError> {
            features.validate()?;
            Ok(features.values.iter().sum::<f64>() / FEATURE_COUNT as f64)
        }
    }

    /// Stub backend with no artifact behind it
    struct EmptyModel;

    impl ExposureModel for EmptyModel {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelRunError> {
            Err(ModelNotLoadedError.into())
        }
    }

    fn reading() -> RawReading {
        RawReading {
            uv_index: 5.0,
            pm25: 42.0,
            temp_c: 27.5,
            hum_rh: 55.0,
            press_hpa: 1012.0,
            gas_res_ohm: 250_000.0,
            lux: 48_000.0,
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_round_trip_produces_finite_scalar() {
        let prediction = predict_with(&MeanModel, &reading(), noon()).unwrap();
        assert!(prediction.minutes.is_finite());
        assert_eq!(prediction.features.values.len(), FEATURE_COUNT);
        assert_eq!(prediction.at, noon());
    }

    #[test]
    fn test_invalid_reading_rejected_before_model() {
        let mut bad = reading();
        bad.hum_rh = 150.0;
        // EmptyModel would fail if reached; the reading must be rejected first
        match predict_with(&EmptyModel, &bad, noon()) {
            Err(PredictError::InvalidReading(e)) => assert_eq!(e.field, "hum_rh"),
            other => panic!("expected InvalidReading, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_nan_reading_rejected() {
        let mut bad = reading();
        bad.uv_index = f64::NAN;
        assert!(matches!(
            predict_with(&MeanModel, &bad, noon()),
            Err(PredictError::InvalidReading(_))
        ));
    }

    #[test]
    fn test_missing_model_surfaces_not_loaded() {
        match predict_with(&EmptyModel, &reading(), noon()) {
            Err(PredictError::Model(ModelRunError::NotLoaded(_))) => {}
            other => panic!("expected NotLoaded, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_prediction_not_clamped() {
        struct WildModel;
        impl ExposureModel for WildModel {
            fn predict(&self, _f: &FeatureVector) -> Result<f64, ModelRunError> {
                Ok(-12.5) // extrapolated below the label range
            }
        }

        let prediction = predict_with(&WildModel, &reading(), noon()).unwrap();
        assert_eq!(prediction.minutes, -12.5);
    }

    #[test]
    fn test_same_timestamp_same_features_as_batch_path() {
        // The adapter's vector is the assembler's vector, byte for byte
        let prediction = predict_with(&MeanModel, &reading(), noon()).unwrap();
        let direct = assemble(&reading(), noon());
        assert_eq!(prediction.features, direct);
    }
}
