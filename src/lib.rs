//! # domdb - A Metabolomics Peak Database
//!
//! `domdb` stores LC-MS metabolite peak tables from many experiments and finds
//! the same compound across them by m/z and retention time tolerance.
//!
//! ## Key Features
//!
//! - **Per-experiment ingestion**: a peak table plus a sample metadata sheet
//!   become one experiment, stored all-or-nothing.
//!
//! - **Free-form sample metadata**: every metadata column other than `file name`
//!   and `control` becomes a sample attribute usable for grouping and filtering.
//!
//! - **Tolerance matching**: relative (ppm) m/z windows and absolute retention
//!   time windows, with an m/z index keeping point queries sublinear.
//!
//! - **Control-aware filtering**: drop peaks seen in control samples, or require
//!   treatment intensity above a multiple of the control mean, optionally per
//!   attribute group.
//!
//! - **Reproducible CSV output**: a fixed column block followed by the union of
//!   all sample attributes, with stable ordering and number formatting.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domdb::ingest::load_experiment;
//! use domdb::model::IonMode;
//! use domdb::projection::ResultTable;
//! use domdb::search::{MatchEngine, SearchOptions};
//! use domdb::store::Database;
//!
//! let mut db = Database::open_or_create("domdb.json")?;
//! let batch = load_experiment("tps4", IonMode::Positive, "tps4_data.csv", "tps4_metadata.csv")?;
//! db.insert_experiment(batch)?;
//! db.save("domdb.json")?;
//!
//! let config = SearchOptions::default().validate()?;
//! let engine = MatchEngine::new(db.partition(IonMode::Positive), &config);
//! let rows = engine.bulk_match("tps4")?;
//! ResultTable::from_rows(&rows)?.write_csv_file("tps4_matches.csv")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`model`]: experiments, samples, attributes, peaks and intensities
//! - [`ingest`]: CSV ETL into all-or-nothing experiment batches
//! - [`store`]: per-ion-mode in-memory store with JSON snapshots
//! - [`search`]: tolerance predicate, control policies and the match engine
//! - [`projection`]: union-schema CSV output of match results

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod ingest;
pub mod model;
pub mod projection;
pub mod search;
pub mod store;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::ingest::{
        discover_experiments, load_experiment, ExperimentBatch, ExperimentFiles, IngestError,
        PeakRecord, SampleRecord,
    };
    pub use crate::model::{Experiment, GroupKey, IonMode, Peak, PeakMeans, Sample, SampleAttribute};
    pub use crate::projection::{ProjectionError, ResultTable};
    pub use crate::search::{
        Cancellation, ConfigError, ControlPolicy, MatchEngine, MatchRow, MatchSource, QueryPoint,
        SearchConfig, SearchError, SearchOptions, Tolerance,
    };
    pub use crate::store::{Database, Partition, PeakStore, StoreError};
}
