//! # Match Engine
//!
//! Tolerance-based matching of peaks across experiments, filtered by control
//! samples and sample attributes.
//!
//! ## Queries
//!
//! - [`MatchEngine::point_search`]: every stored peak within tolerance of an
//!   `(mz, rt)` point.
//! - [`MatchEngine::bulk_match`]: every peak of one experiment against the
//!   peaks of all other experiments in the same partition.
//!
//! Both expand each matched peak into one [`MatchRow`] per qualifying sample
//! intensity and return rows in a fixed order, so identical inputs always
//! produce identical output.
//!
//! ## Filtering
//!
//! A candidate matches when `|query.mz - peak.mz| / peak.mz * 1e6 <= ppm_diff`
//! and `|query.rt - peak.rt| <= rt_diff`. Its observations are then filtered by
//! the [`ControlPolicy`]:
//!
//! - `ExcludeControls`: with no group attributes a peak seen in any control is
//!   dropped; with group attributes only the groups whose controls show the
//!   peak are dropped.
//! - `RatioOverControls(r)`: a treatment observation survives when its
//!   intensity is greater than `r` times the mean control intensity of its
//!   group. A group without a positive control counts as mean 0, so `r = 0`
//!   keeps every positive treatment observation.
//!
//! ```rust
//! use domdb::ingest::{ExperimentBatch, PeakRecord, SampleRecord};
//! use domdb::model::IonMode;
//! use domdb::search::{MatchEngine, SearchOptions};
//! use domdb::store::Database;
//!
//! let mut batch = ExperimentBatch::new("b", IonMode::Positive);
//! batch.samples.push(SampleRecord::new("s1", false));
//! batch.peaks.push(PeakRecord::new(100.001, 91.0, vec![50.0]));
//! let mut db = Database::new();
//! db.insert_experiment(batch)?;
//!
//! let options = SearchOptions { ppm_diff: 15.0, rt_diff: 2.0, ..Default::default() };
//! let config = options.validate()?;
//! let engine = MatchEngine::new(db.partition(IonMode::Positive), &config);
//! let rows = engine.point_search(100.0, 90.0)?;
//! assert_eq!(rows.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cancel;
mod config;
mod control;
mod engine;
mod error;
mod tolerance;


pub use cancel::Cancellation;
pub use config::{
    ControlPolicy, SearchConfig, SearchOptions, DEFAULT_PPM_DIFF, DEFAULT_RT_DIFF, SEARCH_KEYS,
};
pub use control::{average_control_intensity, ControlGate};
pub use engine::{MatchEngine, MatchRow, MatchSource};
pub use error::{ConfigError, SearchError};
pub use tolerance::{mz_window, ppm_difference, within_tolerance, Feature, QueryPoint, Tolerance};
