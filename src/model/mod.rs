//! Model Module - Trained Artifact Loading & Inference
//!
//! The trained regressor is an opaque ONNX artifact: vector of floats in,
//! predicted minutes out. Loaded once per process, schema-checked against
//! the feature layout, then shared read-only by all inference callers.

pub mod schema;
pub mod inference;

// Re-export common types
pub use schema::ArtifactSchema;
pub use inference::{
    EngineStatus, ExposureModel, LoadError, LoadedModel, ModelInfo, ModelNotLoadedError,
    ModelRunError,
};
