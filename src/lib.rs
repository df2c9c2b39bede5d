//! tabclean - Tabular data cleaning pipeline
//!
//! An interactive-scale cleaning engine: ingest a delimited dataset, apply
//! a user-ordered sequence of composable transforms, collect per-step
//! diagnostics, and export the result.
//!
//! # Modules
//!
//! - [`table`] - Cell/column/table data model and column classification
//! - [`io`] - Delimited-text ingestion (with type inference) and export
//! - [`ops`] - The transform catalog and its operation descriptors
//! - [`pipeline`] - Sequential executor with best-effort step semantics
//! - [`report`] - Shape, preview, and step-log aggregation
//!
//! # Example
//!
//! ```
//! use tabclean::prelude::*;
//!
//! let payload = "name,val\na,1\na,1\nb,\n";
//! let table = read_table(payload.as_bytes(), &DelimitedOptions::default()).unwrap();
//!
//! let pipeline = Pipeline::new(vec![
//!     OpSpec::Deduplicate,
//!     OpSpec::FillNulls { method: FillMethod::Mean },
//! ]);
//! let run = run_pipeline(table, &pipeline);
//!
//! assert_eq!(run.table.n_rows(), 2);
//! let report = CleaningReport::from_run(&run);
//! assert_eq!(report.tally(), (2, 0, 0));
//! ```

pub mod error;

pub mod io;
pub mod ops;
pub mod pipeline;
pub mod report;
pub mod table;

pub use error::{CleanError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{CleanError, Result};

    pub use crate::table::{Cell, Column, ColumnKind, Table};

    pub use crate::io::{read_table, to_delimited_string, write_table, DelimitedOptions};

    pub use crate::ops::{FillMethod, OpOutput, OpSpec};

    pub use crate::pipeline::{run_pipeline, Pipeline, PipelineRun, StepReport, StepStatus};

    pub use crate::report::{preview, CleaningReport, DEFAULT_PREVIEW_ROWS};
}
