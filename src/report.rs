//! Result aggregation and presentation

use crate::error::Result;
use crate::io::{to_delimited_string, DelimitedOptions};
use crate::pipeline::{PipelineRun, StepReport, StepStatus};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Default number of preview rows
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Aggregated outcome of a cleaning run, serializable for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Final row count
    pub rows: usize,
    /// Final column count
    pub cols: usize,
    /// Ordered per-step diagnostics
    pub steps: Vec<StepReport>,
}

impl CleaningReport {
    pub fn from_run(run: &PipelineRun) -> Self {
        let (rows, cols) = run.table.shape();
        Self {
            rows,
            cols,
            steps: run.steps.clone(),
        }
    }

    /// Counts of (applied, skipped, failed) steps
    pub fn tally(&self) -> (usize, usize, usize) {
        let mut applied = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for step in &self.steps {
            match step.status {
                StepStatus::Applied => applied += 1,
                StepStatus::Skipped => skipped += 1,
                StepStatus::Failed => failed += 1,
            }
        }
        (applied, skipped, failed)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

/// First `n` rows of the table as display strings: a header row followed
/// by at most `n` value rows. The explicit index, when set, leads each row.
pub fn preview(table: &Table, n: usize) -> Vec<Vec<String>> {
    let mut out = Vec::with_capacity(n + 1);

    let mut header: Vec<String> = Vec::with_capacity(table.n_cols() + 1);
    if let Some(idx) = table.index() {
        header.push(idx.name.clone());
    }
    header.extend(table.columns().iter().map(|c| c.name.clone()));
    out.push(header);

    for i in 0..table.n_rows().min(n) {
        let mut row: Vec<String> = Vec::with_capacity(table.n_cols() + 1);
        if let Some(idx) = table.index() {
            row.push(idx.values[i].to_string());
        }
        row.extend(table.columns().iter().map(|c| c.values[i].to_string()));
        out.push(row);
    }
    out
}

/// Serialize the final table to its flat delimited export form.
pub fn export(table: &Table, options: &DelimitedOptions) -> Result<String> {
    to_delimited_string(table, options)
}
