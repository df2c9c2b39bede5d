//! Transform catalog
//!
//! Every operation is a pure `Table × config → Result<OpOutput>` function.
//! Fitted statistics (means, quartiles, variances, neighbor sets, forest
//! trees) are recomputed from the table state at the step where the
//! operation runs, never carried over from an earlier state.
//!
//! Operations are requested through [`OpSpec`], a closed descriptor enum
//! with an enumerated configuration schema per transform. Caller input is
//! structured data only; nothing is ever evaluated as an expression.

mod anomaly;
mod balance;
mod dates;
mod dedup;
mod encode;
mod features;
mod fill;
mod index;
mod outlier;
mod scale;
mod text;
mod variance;

pub use balance::DEFAULT_K_NEIGHBORS;
pub use fill::FillMethod;

use crate::error::Result;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default IQR multiplier for outlier bounds
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;
/// Default variance threshold below which a numeric column is dropped
pub const DEFAULT_VARIANCE_THRESHOLD: f64 = 0.01;
/// Default expected outlier proportion for anomaly filtering
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

fn default_iqr_factor() -> f64 {
    DEFAULT_IQR_FACTOR
}

fn default_variance_threshold() -> f64 {
    DEFAULT_VARIANCE_THRESHOLD
}

fn default_contamination() -> f64 {
    DEFAULT_CONTAMINATION
}

fn default_k_neighbors() -> usize {
    DEFAULT_K_NEIGHBORS
}

/// A named, configured request to apply one transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpSpec {
    /// Remove rows that exactly duplicate an earlier row
    Deduplicate,
    /// Fill missing numeric cells with the column mean or median, then
    /// fill any remaining missing cell with the literal text "Unknown"
    FillNulls {
        #[serde(default)]
        method: FillMethod,
    },
    /// Replace each textual column by first-appearance integer codes
    EncodeCategorical,
    /// z-score scale every numeric column
    ScaleNumeric,
    /// Drop rows outside the IQR bounds, column by column
    RemoveOutliers {
        #[serde(default = "default_iqr_factor")]
        factor: f64,
    },
    /// Trim and lowercase every textual column
    FixInconsistencies,
    /// Drop numeric columns whose variance falls below the threshold
    DropLowVariance {
        #[serde(default = "default_variance_threshold")]
        threshold: f64,
    },
    /// Append a `row_sum` column over the numeric columns
    AddRowSum,
    /// Strip punctuation, lowercase, and trim selected textual columns
    CleanText {
        #[serde(default)]
        columns: Option<Vec<String>>,
    },
    /// Convert columns to datetime where every value parses
    ParseDates,
    /// Oversample minority classes of the target column (SMOTE)
    BalanceClasses {
        target: String,
        #[serde(default = "default_k_neighbors")]
        k_neighbors: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Drop rows an isolation forest scores as anomalous
    FilterAnomalies {
        #[serde(default = "default_contamination")]
        contamination: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Rename columns via an explicit old → new mapping
    RenameColumns { mapping: HashMap<String, String> },
    /// Restore the positional 0..n-1 row identity
    ResetIndex,
    /// Promote a column to the row index
    SetIndex { column: String },
}

impl OpSpec {
    /// Stable operation name, used in step diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            OpSpec::Deduplicate => "deduplicate",
            OpSpec::FillNulls { .. } => "fill_nulls",
            OpSpec::EncodeCategorical => "encode_categorical",
            OpSpec::ScaleNumeric => "scale_numeric",
            OpSpec::RemoveOutliers { .. } => "remove_outliers",
            OpSpec::FixInconsistencies => "fix_inconsistencies",
            OpSpec::DropLowVariance { .. } => "drop_low_variance",
            OpSpec::AddRowSum => "add_row_sum",
            OpSpec::CleanText { .. } => "clean_text",
            OpSpec::ParseDates => "parse_dates",
            OpSpec::BalanceClasses { .. } => "balance_classes",
            OpSpec::FilterAnomalies { .. } => "filter_anomalies",
            OpSpec::RenameColumns { .. } => "rename_columns",
            OpSpec::ResetIndex => "reset_index",
            OpSpec::SetIndex { .. } => "set_index",
        }
    }
}

/// Result of one transform application: the new table plus per-unit notes
/// (for example columns a transform had to skip).
#[derive(Debug, Clone)]
pub struct OpOutput {
    pub table: Table,
    pub notes: Vec<String>,
}

impl OpOutput {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            notes: Vec::new(),
        }
    }

    pub fn with_notes(table: Table, notes: Vec<String>) -> Self {
        Self { table, notes }
    }
}

/// Apply one operation to a table.
pub fn apply(table: &Table, spec: &OpSpec) -> Result<OpOutput> {
    match spec {
        OpSpec::Deduplicate => dedup::apply(table),
        OpSpec::FillNulls { method } => fill::apply(table, *method),
        OpSpec::EncodeCategorical => encode::apply(table),
        OpSpec::ScaleNumeric => scale::apply(table),
        OpSpec::RemoveOutliers { factor } => outlier::apply(table, *factor),
        OpSpec::FixInconsistencies => text::fix_inconsistencies(table),
        OpSpec::DropLowVariance { threshold } => variance::apply(table, *threshold),
        OpSpec::AddRowSum => features::add_row_sum(table),
        OpSpec::CleanText { columns } => text::clean_text(table, columns.as_deref()),
        OpSpec::ParseDates => dates::apply(table),
        OpSpec::BalanceClasses {
            target,
            k_neighbors,
            seed,
        } => balance::apply(table, target, *k_neighbors, *seed),
        OpSpec::FilterAnomalies {
            contamination,
            seed,
        } => anomaly::apply(table, *contamination, *seed),
        OpSpec::RenameColumns { mapping } => index::rename_columns(table, mapping),
        OpSpec::ResetIndex => index::reset_index(table),
        OpSpec::SetIndex { column } => index::set_index(table, column),
    }
}

// ─── Shared statistics helpers ─────────────────────────────────────────────
//
// All step-local: callers pass the column values as they stand at the
// current pipeline step.

/// Mean over the given values; None over an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median over the given values; None over an empty slice.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample variance (ddof = 1); None when fewer than two values.
pub(crate) fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation (ddof = 1)
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Linear-interpolation quantile over already collected values.
/// `q` in [0, 1]; None over an empty slice.
pub(crate) fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = pos - lo as f64;
        Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_median() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 3.0, 2.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_sample_variance() {
        let v = sample_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((v - 2.5).abs() < 1e-12);
        assert_eq!(sample_variance(&[1.0]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(quantile(&values, 0.25), Some(2.0));
        assert_eq!(quantile(&values, 0.75), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(3.0));
        let four = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&four, 0.25), Some(1.75));
    }

    #[test]
    fn test_opspec_json_roundtrip() {
        let spec = OpSpec::RemoveOutliers { factor: 2.0 };
        let json = serde_json::to_string(&spec).unwrap();
        let back: OpSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn test_opspec_defaults_from_json() {
        let spec: OpSpec = serde_json::from_str(r#"{"op": "remove_outliers"}"#).unwrap();
        assert_eq!(
            spec,
            OpSpec::RemoveOutliers {
                factor: DEFAULT_IQR_FACTOR
            }
        );
        let spec: OpSpec = serde_json::from_str(r#"{"op": "fill_nulls"}"#).unwrap();
        assert_eq!(
            spec,
            OpSpec::FillNulls {
                method: FillMethod::Mean
            }
        );
    }

    #[test]
    fn test_opspec_unknown_op_rejected() {
        let result: std::result::Result<OpSpec, _> =
            serde_json::from_str(r#"{"op": "eval_expression"}"#);
        assert!(result.is_err());
    }
}
