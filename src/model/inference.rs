//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the trained safe-exposure regressor and runs single-vector
//! predictions. The session is loaded once into module state and treated as
//! immutable afterwards; retraining produces a new artifact file, never an
//! in-place update of the loaded one.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use crate::features::layout::{layout_hash, SchemaMismatchError, FEATURE_COUNT, FEATURE_VERSION};
use crate::features::vector::FeatureVector;
use super::schema::{sidecar_path, ArtifactSchema};

// ============================================================================
// STATE
// ============================================================================

/// ONNX Session (loaded model)
static SESSION: RwLock<Option<Session>> = RwLock::new(None);

/// Model metadata
static MODEL_INFO: RwLock<Option<ModelInfo>> = RwLock::new(None);

/// Latency stats
static LATENCY_SUM: AtomicU64 = AtomicU64::new(0);
static INFERENCE_COUNT: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Metadata about the loaded artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub feature_count: usize,
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Whether a sidecar schema was present and checked at load
    pub schema_checked: bool,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Engine status for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_path: String,
    pub inference_device: String,
    pub avg_latency_ms: f64,
    pub inference_count: u64,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// No trained artifact is available - fatal for the inference path,
/// which must halt rather than guess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelNotLoadedError;

impl std::fmt::Display for ModelNotLoadedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No trained model loaded")
    }
}

impl std::error::Error for ModelNotLoadedError {}

/// Failure while loading an artifact
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Sidecar(serde_json::Error),
    SchemaMismatch(SchemaMismatchError),
    Session(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO Error: {}", e),
            LoadError::Sidecar(e) => write!(f, "Sidecar Parse Error: {}", e),
            LoadError::SchemaMismatch(e) => write!(f, "{}", e),
            LoadError::Session(msg) => write!(f, "Session Error: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Sidecar(err)
    }
}

impl From<SchemaMismatchError> for LoadError {
    fn from(err: SchemaMismatchError) -> Self {
        LoadError::SchemaMismatch(err)
    }
}

/// Failure while running a prediction
#[derive(Debug)]
pub enum ModelRunError {
    NotLoaded(ModelNotLoadedError),
    SchemaMismatch(SchemaMismatchError),
    Inference(String),
}

impl std::fmt::Display for ModelRunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelRunError::NotLoaded(e) => write!(f, "{}", e),
            ModelRunError::SchemaMismatch(e) => write!(f, "{}", e),
            ModelRunError::Inference(msg) => write!(f, "Inference Error: {}", msg),
        }
    }
}

impl std::error::Error for ModelRunError {}

impl From<ModelNotLoadedError> for ModelRunError {
    fn from(err: ModelNotLoadedError) -> Self {
        ModelRunError::NotLoaded(err)
    }
}

impl From<SchemaMismatchError> for ModelRunError {
    fn from(err: SchemaMismatchError) -> Self {
        ModelRunError::SchemaMismatch(err)
    }
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Seam for prediction backends (ONNX session, test stubs, ensembles)
pub trait ExposureModel {
    /// Predicted safe exposure minutes for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelRunError>;
}

// ============================================================================
// LOADING
// ============================================================================

/// Load the ONNX artifact, checking its sidecar schema when present.
///
/// A missing sidecar is logged and tolerated (bare artifacts stay usable);
/// a sidecar that disagrees with the engine layout fails the load.
pub fn load(model_path: &str) -> Result<(), LoadError> {
    log::info!("Loading safe-exposure model from: {}", model_path);

    let path = Path::new(model_path);
    if !path.exists() {
        return Err(LoadError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Model not found: {}", model_path),
        )));
    }

    let sidecar = sidecar_path(path);
    let schema_checked = if sidecar.exists() {
        let raw = std::fs::read_to_string(&sidecar)?;
        let schema: ArtifactSchema = serde_json::from_str(&raw)?;
        schema.validate()?;
        log::info!("Artifact schema verified against layout v{}", FEATURE_VERSION);
        true
    } else {
        log::warn!(
            "No schema sidecar at {} - cannot verify the artifact's feature order",
            sidecar.display()
        );
        false
    };

    let session = Session::builder()
        .map_err(|e| LoadError::Session(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| LoadError::Session(format!("Failed to set optimization: {}", e)))?
        .commit_from_file(model_path)
        .map_err(|e| LoadError::Session(format!("Failed to load model: {}", e)))?;

    log::info!("Safe-exposure model loaded successfully");

    *SESSION.write() = Some(session);
    *MODEL_INFO.write() = Some(ModelInfo {
        model_path: model_path.to_string(),
        feature_count: FEATURE_COUNT,
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        schema_checked,
        loaded_at: chrono::Utc::now(),
    });

    Ok(())
}

/// Check if a model is loaded
pub fn is_loaded() -> bool {
    SESSION.read().is_some()
}

/// Unload the model (tests and artifact swaps)
pub fn unload() {
    *SESSION.write() = None;
    *MODEL_INFO.write() = None;
    log::info!("Safe-exposure model unloaded");
}

/// Get metadata for the loaded artifact
pub fn info() -> Option<ModelInfo> {
    MODEL_INFO.read().clone()
}

/// Engine status for display
pub fn status() -> EngineStatus {
    let info = MODEL_INFO.read();
    let (loaded, path) = match info.as_ref() {
        Some(i) => (true, i.model_path.clone()),
        None => (false, "None".to_string()),
    };

    let sum = LATENCY_SUM.load(Ordering::Relaxed);
    let count = INFERENCE_COUNT.load(Ordering::Relaxed);
    let avg = if count > 0 {
        (sum as f64 / count as f64) / 1000.0
    } else {
        0.0
    };

    EngineStatus {
        model_loaded: loaded,
        model_path: path,
        inference_device: "ONNX Runtime (CPU)".to_string(),
        avg_latency_ms: avg,
        inference_count: count,
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Run the loaded model on one feature vector.
///
/// The prediction is returned unclamped: if the model extrapolates outside
/// the label range, callers see that as-is.
pub fn run(features: &FeatureVector) -> Result<f64, ModelRunError> {
    let start_time = std::time::Instant::now();

    features.validate()?;

    let mut session_guard = SESSION.write();
    let session = session_guard
        .as_mut()
        .ok_or(ModelNotLoadedError)?;

    let mut input_data = Vec::with_capacity(FEATURE_COUNT);
    input_data.extend(features.values.iter().map(|&v| v as f32));

    let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input_data)
        .map_err(|e| ModelRunError::Inference(format!("Array error: {}", e)))?;

    let output_name = session
        .outputs()
        .first()
        .map(|o| o.name().to_string())
        .ok_or_else(|| ModelRunError::Inference("No output defined".to_string()))?;

    let input_tensor = Value::from_array(input_array)
        .map_err(|e| ModelRunError::Inference(format!("Tensor error: {}", e)))?;

    let outputs = session
        .run(ort::inputs![input_tensor])
        .map_err(|e| ModelRunError::Inference(format!("Inference failed: {}", e)))?;

    let output = outputs
        .get(&output_name)
        .ok_or_else(|| ModelRunError::Inference("No output".to_string()))?;

    let output_tensor = output
        .try_extract_tensor::<f32>()
        .map_err(|e| ModelRunError::Inference(format!("Extract error: {}", e)))?;

    let data = output_tensor.1;
    let prediction = data
        .first()
        .copied()
        .ok_or_else(|| ModelRunError::Inference("Empty output tensor".to_string()))?;

    LATENCY_SUM.fetch_add(start_time.elapsed().as_micros() as u64, Ordering::Relaxed);
    INFERENCE_COUNT.fetch_add(1, Ordering::Relaxed);

    Ok(prediction as f64)
}

/// The module-level session as an `ExposureModel`
pub struct LoadedModel;

impl ExposureModel for LoadedModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelRunError> {
        run(features)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_without_model_is_not_loaded_error() {
        // Serialize against other tests touching the global session
        unload();
        let features = FeatureVector::new();
        match run(&features) {
            Err(ModelRunError::NotLoaded(_)) => {}
            other => panic!("expected NotLoaded, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load("/nonexistent/safe_exposure.onnx");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_stale_vector_rejected_before_session_lookup() {
        let stale = FeatureVector {
            version: FEATURE_VERSION + 1,
            ..FeatureVector::new()
        };
        match run(&stale) {
            Err(ModelRunError::SchemaMismatch(_)) => {}
            other => panic!("expected SchemaMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_rejects_bad_sidecar() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.onnx");
        // Dummy artifact bytes; the sidecar check runs before the session
        // builder ever sees them
        std::fs::File::create(&model_path)
            .unwrap()
            .write_all(b"not a real model")
            .unwrap();

        let mut schema = ArtifactSchema::current();
        schema.feature_names.swap(0, 1);
        let sidecar = sidecar_path(&model_path);
        std::fs::write(&sidecar, serde_json::to_string(&schema).unwrap()).unwrap();

        let result = load(model_path.to_str().unwrap());
        assert!(matches!(result, Err(LoadError::SchemaMismatch(_))));
    }

    #[test]
    fn test_status_without_model() {
        unload();
        let status = status();
        assert!(!status.model_loaded);
        assert_eq!(status.model_path, "None");
    }
}
