//! Sequential pipeline execution with per-step diagnostics

use crate::error::CleanError;
use crate::ops::{self, OpSpec};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome of one pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The transform ran and its output became the working table
    Applied,
    /// Configuration problem; the step was skipped and the table unchanged
    Skipped,
    /// The transform failed; the table is unchanged
    Failed,
}

/// Structured success/skip/fail record for one pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Operation name (stable identifier from [`OpSpec::name`])
    pub op: String,
    pub status: StepStatus,
    /// Human-readable message: per-column notes on success, the error
    /// text on skip/failure
    pub message: String,
}

/// An ordered sequence of operation descriptors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub steps: Vec<OpSpec>,
}

impl Pipeline {
    pub fn new(steps: Vec<OpSpec>) -> Self {
        Self { steps }
    }

    /// Parse a pipeline from its JSON array form.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let steps: Vec<OpSpec> = serde_json::from_str(json)?;
        Ok(Self { steps })
    }
}

/// Result of a full pipeline run: the final table plus the ordered step log
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub table: Table,
    pub steps: Vec<StepReport>,
}

/// Apply each step in order, threading the working table through.
///
/// A step failure never aborts the run: a Config error marks the step
/// skipped, any other error marks it failed, and in both cases the next
/// step sees the table unchanged. Each step observes the output of the
/// prior step, and every transform recomputes its statistics from that
/// state.
pub fn run_pipeline(table: Table, pipeline: &Pipeline) -> PipelineRun {
    let mut working = table;
    let mut reports = Vec::with_capacity(pipeline.steps.len());

    for spec in &pipeline.steps {
        let name = spec.name();
        match ops::apply(&working, spec) {
            Ok(output) => {
                let message = if output.notes.is_empty() {
                    "ok".to_string()
                } else {
                    output.notes.join("; ")
                };
                info!(op = name, rows = output.table.n_rows(), cols = output.table.n_cols(), "step applied");
                working = output.table;
                reports.push(StepReport {
                    op: name.to_string(),
                    status: StepStatus::Applied,
                    message,
                });
            }
            Err(CleanError::Config(msg)) => {
                warn!(op = name, %msg, "step skipped");
                reports.push(StepReport {
                    op: name.to_string(),
                    status: StepStatus::Skipped,
                    message: msg,
                });
            }
            Err(err) => {
                let msg = err.to_string();
                warn!(op = name, %msg, "step failed");
                reports.push(StepReport {
                    op: name.to_string(),
                    status: StepStatus::Failed,
                    message: msg,
                });
            }
        }
    }

    PipelineRun {
        table: working,
        steps: reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Column};
    use std::collections::HashMap;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::new(
                "name",
                vec![
                    Cell::Text("a".into()),
                    Cell::Text("a".into()),
                    Cell::Text("b".into()),
                ],
            ),
            Column::new("val", vec![Cell::Int(1), Cell::Int(1), Cell::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn test_steps_run_in_order() {
        let pipeline = Pipeline::new(vec![
            OpSpec::Deduplicate,
            OpSpec::FillNulls {
                method: Default::default(),
            },
        ]);
        let run = run_pipeline(sample_table(), &pipeline);
        assert_eq!(run.table.n_rows(), 2);
        // Dedup first, so fill sees only the surviving rows: mean of [1].
        assert_eq!(run.table.column("val").unwrap().values[1], Cell::Float(1.0));
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Applied));
    }

    #[test]
    fn test_config_error_skips_and_continues() {
        let pipeline = Pipeline::new(vec![
            OpSpec::RenameColumns {
                mapping: HashMap::from([("nope".to_string(), "x".to_string())]),
            },
            OpSpec::Deduplicate,
        ]);
        let run = run_pipeline(sample_table(), &pipeline);
        assert_eq!(run.steps[0].status, StepStatus::Skipped);
        assert_eq!(run.steps[1].status, StepStatus::Applied);
        // The skip left the table intact for the next step.
        assert_eq!(run.table.n_rows(), 2);
    }

    #[test]
    fn test_statistics_are_step_local() {
        // Outlier removal changes the rows that a later scale step sees;
        // the scale must standardize against the post-removal values.
        let table = Table::new(vec![Column::new(
            "x",
            vec![
                Cell::Int(1),
                Cell::Int(2),
                Cell::Int(3),
                Cell::Int(4),
                Cell::Int(100),
            ],
        )])
        .unwrap();
        let pipeline = Pipeline::new(vec![
            OpSpec::RemoveOutliers { factor: 1.5 },
            OpSpec::ScaleNumeric,
        ]);
        let run = run_pipeline(table, &pipeline);
        let values = run.table.column("x").unwrap().numeric_values();
        assert_eq!(values.len(), 4);
        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        assert!(mean.abs() < 1e-9);
    }

    #[test]
    fn test_pipeline_from_json() {
        let json = r#"[
            {"op": "deduplicate"},
            {"op": "fill_nulls", "method": "median"},
            {"op": "set_index", "column": "name"}
        ]"#;
        let pipeline = Pipeline::from_json(json).unwrap();
        assert_eq!(pipeline.steps.len(), 3);
        assert_eq!(pipeline.steps[0], OpSpec::Deduplicate);
    }

    #[test]
    fn test_empty_pipeline_returns_input() {
        let table = sample_table();
        let run = run_pipeline(table.clone(), &Pipeline::default());
        assert_eq!(run.table, table);
        assert!(run.steps.is_empty());
    }
}
