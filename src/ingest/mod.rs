//! # Ingestion
//!
//! Turns a pair of experiment CSV files into an [`ExperimentBatch`], the record
//! shape the store accepts in a single transaction.
//!
//! ## Input files
//!
//! - **Metadata**: one row per sample with mandatory `file name` and `control`
//!   columns; every other column is an experiment-defined sample attribute.
//! - **Data**: one row per peak with `mz, mzmin, mzmax, rt, rtmin, rtmax`, optional
//!   annotation/MS2/cluster columns, and one intensity column per sample.
//!
//! ```rust,no_run
//! use domdb::ingest::load_experiment;
//! use domdb::model::IonMode;
//!
//! let batch = load_experiment("tps4", IonMode::Positive, "tps4_data.csv", "tps4_metadata.csv")?;
//! batch.validate_contract()?;
//! # Ok::<(), domdb::ingest::IngestError>(())
//! ```

mod batch;
mod discover;
mod error;
mod etl;

#[cfg(test)]
mod tests;

pub use batch::{ExperimentBatch, PeakRecord, SampleRecord};
pub use discover::{discover_experiments, ExperimentFiles};
pub use error::IngestError;
pub use etl::{
    load_experiment, parse_flag, read_peak_table, read_sample_metadata, CONTROL_COLUMN,
    FILE_NAME_COLUMN,
};
