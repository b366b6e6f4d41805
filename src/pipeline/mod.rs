//! Batch Feature Pipeline
//!
//! Turns a table of historical merged UV/air-quality records into the
//! labeled feature table the external trainer consumes. Row policy:
//!
//! - unparseable timestamp: row dropped (no temporal features without one)
//! - missing UV index: row dropped (nothing to label against)
//! - missing PM2.5: imputed with the batch mean over observed values
//! - missing environment block: filled by the caller-seeded synthetic model
//!
//! Drops are counted and logged; recovered policies (imputation, synthetic
//! fill) are flagged per row so the audit trail can tell observed data from
//! fallback data. Output preserves input row order.

pub mod synthetic;

use chrono::NaiveDateTime;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::features::assemble::assemble;
use crate::features::layout::FEATURE_COUNT;
use crate::features::physical::heat_index_c;
use crate::features::reading::{EnvReading, RawReading};
use crate::features::temporal::continuous_hour;
use crate::features::vector::FeatureVector;
use crate::label::{safe_minutes, MissingLabelInputError};
use synthetic::SyntheticEnv;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One row of the historical training table, as merged from the UV and
/// air-quality archives. `datetime` is kept unparsed: rejecting bad rows is
/// this pipeline's job, not the fetcher's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub datetime: String,
    pub uv_index: Option<f64>,
    pub pm25: Option<f64>,
    pub city: String,
    pub country: String,
    /// Observed sensor block, absent for archive-only history
    pub env: Option<EnvReading>,
}

/// Where a row's environment fields came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvSource {
    Observed,
    Synthetic,
}

/// One labeled output row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledRow {
    pub datetime: NaiveDateTime,
    pub features: FeatureVector,
    pub label: f64,
    pub env_source: EnvSource,
    pub pm25_imputed: bool,
}

/// Per-run accounting: how many rows survived, how many were dropped and
/// why, and which recovered policies fired
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped_bad_timestamp: usize,
    pub dropped_missing_label_input: usize,
    pub dropped_invalid_reading: usize,
    pub pm25_imputed: usize,
    pub synthetic_env: usize,
    /// Batch mean used for imputation, when any PM2.5 was observed
    pub pm25_mean: Option<f64>,
}

// ============================================================================
// TIMESTAMP PARSING
// ============================================================================

/// Accepted datetime formats, most common first (Open-Meteo hourly format,
/// then full-second variants)
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Batch mean over observed, finite PM2.5 values - the single-pass statistic
/// computed before any imputation
fn pm25_batch_mean(records: &[HistoryRecord]) -> Option<f64> {
    let observed: Vec<f64> = records
        .iter()
        .filter_map(|r| r.pm25)
        .filter(|v| v.is_finite())
        .collect();

    if observed.is_empty() {
        None
    } else {
        Some(observed.iter().sum::<f64>() / observed.len() as f64)
    }
}

/// Run the full pipeline over a batch of historical records.
///
/// `synth` is constructed and seeded by the caller so a run is reproducible
/// without process-wide RNG state.
pub fn build_training_set(
    records: &[HistoryRecord],
    synth: &mut SyntheticEnv,
) -> (Vec<LabeledRow>, PipelineReport) {
    let mut report = PipelineReport {
        rows_in: records.len(),
        pm25_mean: pm25_batch_mean(records),
        ..Default::default()
    };

    let mut rows = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let Some(datetime) = parse_datetime(&record.datetime) else {
            report.dropped_bad_timestamp += 1;
            log::warn!(
                "Row {}: unparseable datetime '{}' - dropped",
                idx,
                record.datetime
            );
            continue;
        };

        let Some(uv_index) = record.uv_index.filter(|v| v.is_finite()) else {
            report.dropped_missing_label_input += 1;
            log::warn!(
                "{}",
                MissingLabelInputError {
                    row: idx,
                    field: "uv_index",
                }
            );
            continue;
        };

        let (pm25, pm25_imputed) = match record.pm25.filter(|v| v.is_finite()) {
            Some(v) => (v, false),
            None => match report.pm25_mean {
                Some(mean) => (mean, true),
                // Nothing observed in the whole batch: no statistic to
                // impute from, so the row cannot be labeled
                None => {
                    report.dropped_missing_label_input += 1;
                    log::warn!(
                        "{}",
                        MissingLabelInputError {
                            row: idx,
                            field: "pm25",
                        }
                    );
                    continue;
                }
            },
        };

        let (env, env_source) = match record.env {
            Some(env) => (env, EnvSource::Observed),
            None => (
                synth.generate(continuous_hour(datetime), uv_index),
                EnvSource::Synthetic,
            ),
        };

        let reading = RawReading::from_parts(uv_index, pm25, &env);
        if let Err(e) = reading.validate() {
            report.dropped_invalid_reading += 1;
            log::warn!("Row {}: {} - dropped", idx, e);
            continue;
        }

        let features = assemble(&reading, datetime);
        // Same derivation the assembler used, so the label and the
        // heat_index feature can never disagree
        let heat_index = heat_index_c(reading.temp_c, reading.hum_rh);
        let label = safe_minutes(uv_index, pm25, heat_index);

        if pm25_imputed {
            report.pm25_imputed += 1;
        }
        if env_source == EnvSource::Synthetic {
            report.synthetic_env += 1;
        }

        rows.push(LabeledRow {
            datetime,
            features,
            label,
            env_source,
            pm25_imputed,
        });
    }

    report.rows_out = rows.len();
    log::info!(
        "Pipeline: {} rows in, {} out ({} bad timestamp, {} missing label input, {} invalid, {} pm25 imputed, {} synthetic env)",
        report.rows_in,
        report.rows_out,
        report.dropped_bad_timestamp,
        report.dropped_missing_label_input,
        report.dropped_invalid_reading,
        report.pm25_imputed,
        report.synthetic_env
    );

    (rows, report)
}

// ============================================================================
// TRAINER EXPORT
// ============================================================================

/// Build the trainer-facing matrix: one row per labeled row, the 14 feature
/// columns in layout order, plus the label vector. Metadata (datetime,
/// source flags, city/country) is excluded by construction.
pub fn to_matrix(rows: &[LabeledRow]) -> (Array2<f64>, Array1<f64>) {
    let mut features = Array2::zeros((rows.len(), FEATURE_COUNT));
    let mut labels = Array1::zeros(rows.len());

    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.features.values.iter().enumerate() {
            features[[i, j]] = *value;
        }
        labels[i] = row.label;
    }

    (features, labels)
}

// ============================================================================
// TESTS
// ============================================================================
