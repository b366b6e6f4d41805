//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The trained model consumes features by position, so the order below is a
//! contract shared with every artifact ever trained. Any change here is a
//! breaking change that requires retraining.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw readings (0-6) ===
    "uv_index",     // 0: UV index, 0-11 scale
    "pm25",         // 1: PM2.5 in ug/m3
    "temp_c",       // 2: Air temperature, Celsius
    "hum_rh",       // 3: Relative humidity, percent
    "press_hpa",    // 4: Barometric pressure, hPa
    "gas_res_ohm",  // 5: Gas sensor resistance, Ohm
    "lux",          // 6: Visible light, lux

    // === Physical derivations (7-9) ===
    "dew_c",        // 7: Dew point, Celsius
    "heat_index",   // 8: Apparent temperature (Rothfusz)
    "uv_vis_ratio", // 9: UV-to-visible-light ratio

    // === Temporal encodings (10-13) ===
    "hour_sin",     // 10: sin of continuous hour-of-day
    "hour_cos",     // 11: cos of continuous hour-of-day
    "dow_sin",      // 12: sin of day-of-week (Monday = 0)
    "dow_cos",      // 13: cos of day-of-week
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 14;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash (inputs are const, so this is stable per build)
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// SCHEMA VALIDATION
// ============================================================================

/// Error when an artifact's feature schema doesn't match the engine layout
#[derive(Debug, Clone)]
pub struct SchemaMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
    /// First differing feature name, if the mismatch is name-level
    pub first_difference: Option<String>,
}

impl std::fmt::Display for SchemaMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature schema mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )?;
        if let Some(diff) = &self.first_difference {
            write!(f, " - first difference at '{}'", diff)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaMismatchError {}

/// Validate that incoming version/hash match the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), SchemaMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(SchemaMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
            first_difference: None,
        });
    }

    Ok(())
}

/// Validate an artifact's ordered feature-name list against the layout.
///
/// This is the fail-fast check run at model load: a trained artifact that
/// expects different names or a different order must be rejected before it
/// can silently mis-align columns.
pub fn validate_feature_names(version: u8, names: &[String]) -> Result<(), SchemaMismatchError> {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    let actual_hash = hasher.finalize();

    if version == FEATURE_VERSION && actual_hash == layout_hash() {
        return Ok(());
    }

    let first_difference = FEATURE_LAYOUT
        .iter()
        .map(|s| Some(*s))
        .chain(std::iter::repeat(None))
        .zip(names.iter().map(Some).chain(std::iter::repeat(None)))
        .take(FEATURE_COUNT.max(names.len()))
        .find(|(expected, actual)| *expected != actual.map(String::as_str))
        .map(|(expected, actual)| {
            format!(
                "expected {:?}, artifact has {:?}",
                expected.unwrap_or("<none>"),
                actual.map(String::as_str).unwrap_or("<none>")
            )
        });

    Err(SchemaMismatchError {
        expected_version: FEATURE_VERSION,
        expected_hash: layout_hash(),
        actual_version: version,
        actual_hash,
        first_difference,
    })
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 14);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_order() {
        // Raw readings first, then physical derivations, then temporal
        assert_eq!(FEATURE_LAYOUT[0], "uv_index");
        assert_eq!(FEATURE_LAYOUT[6], "lux");
        assert_eq!(FEATURE_LAYOUT[7], "dew_c");
        assert_eq!(FEATURE_LAYOUT[9], "uv_vis_ratio");
        assert_eq!(FEATURE_LAYOUT[13], "dow_cos");
    }

    #[test]
    fn test_layout_hash_consistency() {
        // Hash should be consistent across calls
        let hash1 = compute_layout_hash();
        let hash2 = compute_layout_hash();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_layout_hash_non_zero() {
        let hash = layout_hash();
        assert_ne!(hash, 0);
    }

    #[test]
    fn test_validate_layout_success() {
        let result = validate_layout(FEATURE_VERSION, layout_hash());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_layout_version_mismatch() {
        let result = validate_layout(FEATURE_VERSION + 1, layout_hash());
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_layout_hash_mismatch() {
        let result = validate_layout(FEATURE_VERSION, layout_hash() + 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_feature_names_exact() {
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert!(validate_feature_names(FEATURE_VERSION, &names).is_ok());
    }

    #[test]
    fn test_validate_feature_names_reordered() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        names.swap(0, 1);
        let err = validate_feature_names(FEATURE_VERSION, &names).unwrap_err();
        assert!(err.first_difference.is_some());
    }

    #[test]
    fn test_validate_feature_names_truncated() {
        let names: Vec<String> = FEATURE_LAYOUT[..10].iter().map(|s| s.to_string()).collect();
        assert!(validate_feature_names(FEATURE_VERSION, &names).is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("uv_index"), Some(0));
        assert_eq!(feature_index("heat_index"), Some(8));
        assert_eq!(feature_index("dow_cos"), Some(13));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("uv_index"));
        assert_eq!(feature_name(13), Some("dow_cos"));
        assert_eq!(feature_name(100), None);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, FEATURE_COUNT);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
    }
}
