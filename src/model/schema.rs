//! Artifact Schema - The trained model's feature contract
//!
//! The trainer writes a sidecar JSON next to the ONNX artifact listing the
//! feature names (in order) and layout version the model was fitted on. At
//! load time the sidecar is compared against the engine layout so a stale or
//! reordered artifact fails fast instead of silently mis-aligning columns.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::features::layout::{
    validate_feature_names, LayoutInfo, SchemaMismatchError, FEATURE_VERSION,
};

/// Sidecar file suffix, appended to the artifact filename
pub const SIDECAR_SUFFIX: &str = ".features.json";

/// The feature schema an artifact was trained against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSchema {
    pub feature_version: u8,
    pub feature_names: Vec<String>,
}

impl ArtifactSchema {
    /// Schema of the current engine layout (what a fresh trainer run should
    /// write next to its artifact)
    pub fn current() -> Self {
        let info = LayoutInfo::current();
        Self {
            feature_version: FEATURE_VERSION,
            feature_names: info.feature_names,
        }
    }

    /// Fail-fast comparison against the engine layout
    pub fn validate(&self) -> Result<(), SchemaMismatchError> {
        validate_feature_names(self.feature_version, &self.feature_names)
    }
}

/// Sidecar path for a model artifact: `<artifact>.features.json`
pub fn sidecar_path(model_path: &Path) -> PathBuf {
    let mut name = model_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(SIDECAR_SUFFIX);
    model_path.with_file_name(name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_schema_validates() {
        assert!(ArtifactSchema::current().validate().is_ok());
    }

    #[test]
    fn test_stale_version_rejected() {
        let mut schema = ArtifactSchema::current();
        schema.feature_version = FEATURE_VERSION + 1;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_reordered_names_rejected() {
        let mut schema = ArtifactSchema::current();
        schema.feature_names.swap(2, 3);
        let err = schema.validate().unwrap_err();
        assert!(err.first_difference.is_some());
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut schema = ArtifactSchema::current();
        schema.feature_names.pop();
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_sidecar_path() {
        let path = sidecar_path(Path::new("models/safe_exposure.onnx"));
        assert_eq!(
            path,
            Path::new("models/safe_exposure.onnx.features.json")
        );
    }

    #[test]
    fn test_schema_round_trips_through_json() {
        let schema = ArtifactSchema::current();
        let json = serde_json::to_string(&schema).unwrap();
        let back: ArtifactSchema = serde_json::from_str(&json).unwrap();
        assert!(back.validate().is_ok());
    }
}
