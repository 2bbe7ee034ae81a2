//! # Peak Store
//!
//! In-memory relational store for experiments, samples, peaks and intensities,
//! and the [`PeakStore`] contract the matching engine queries through.
//!
//! ## Layout
//!
//! - [`Database`]: one [`Partition`] per [`IonMode`](crate::model::IonMode), plus
//!   JSON snapshot load/save.
//! - [`Partition`]: the tables of one ionization mode, an m/z-sorted index for
//!   range scans, and a per-peak cache of control/treatment mean intensity.
//!
//! ## Consistency
//!
//! An experiment is inserted in one step from an
//! [`ExperimentBatch`](crate::ingest::ExperimentBatch): the batch is validated
//! first and either everything is stored or nothing is. Removing an experiment
//! cascades to its samples, peaks and intensities. There are no partial updates.
//!
//! ```rust
//! use domdb::ingest::{ExperimentBatch, PeakRecord, SampleRecord};
//! use domdb::model::IonMode;
//! use domdb::store::{Database, PeakStore};
//!
//! let mut batch = ExperimentBatch::new("tps4", IonMode::Positive);
//! batch.samples.push(SampleRecord::new("s1.mzXML", false).attribute("media", "LB"));
//! batch.peaks.push(PeakRecord::new(100.0, 90.0, vec![50.0]));
//!
//! let mut db = Database::new();
//! db.insert_experiment(batch)?;
//!
//! let partition = db.partition(IonMode::Positive);
//! assert_eq!(partition.peaks_in_mz_range(99.0, 101.0).len(), 1);
//! # Ok::<(), domdb::store::StoreError>(())
//! ```

mod database;
mod error;
mod index;
mod partition;


pub use database::Database;
pub use error::StoreError;
pub use index::MzIndex;
pub use partition::{ExperimentSummary, Partition, RemovalSummary};

use rand::Rng;

use crate::model::{Experiment, ExperimentId, GroupKey, Peak, PeakId, PeakMeans, Sample, SampleId};

/// A positive intensity of a peak together with the sample it was measured in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    /// Sample the intensity was measured in
    pub sample: &'a Sample,
    /// Measured intensity (> 0)
    pub value: f64,
}

/// Restricts which intensities of a peak are returned
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityFilter<'a> {
    /// Keep only control (`Some(true)`) or treatment (`Some(false)`) samples
    pub control: Option<bool>,
    /// Keep only samples whose key over these attribute names equals the key
    pub group: Option<(&'a [String], &'a GroupKey)>,
}

impl<'a> IntensityFilter<'a> {
    /// No restriction
    pub fn all() -> Self {
        Self::default()
    }

    /// Control samples only
    pub fn controls() -> Self {
        Self {
            control: Some(true),
            group: None,
        }
    }

    /// Restrict to samples in the given attribute group
    pub fn in_group(mut self, attributes: &'a [String], key: &'a GroupKey) -> Self {
        self.group = Some((attributes, key));
        self
    }

    /// Whether a sample passes this filter
    pub fn accepts(&self, sample: &Sample) -> bool {
        if let Some(control) = self.control {
            if sample.control != control {
                return false;
            }
        }
        match self.group {
            Some((attributes, key)) => sample.group_key(attributes) == *key,
            None => true,
        }
    }
}

/// Storage contract consumed by the matching engine.
///
/// Implementations must present a consistent snapshot for the lifetime of the
/// borrow: the engine holds `&self` for a whole query.
pub trait PeakStore {
    /// Experiment by id
    fn experiment(&self, id: ExperimentId) -> Option<&Experiment>;

    /// Experiment by name
    fn experiment_by_name(&self, name: &str) -> Option<&Experiment>;

    /// Sample by id
    fn sample(&self, id: SampleId) -> Option<&Sample>;

    /// Peak by id
    fn peak(&self, id: PeakId) -> Option<&Peak>;

    /// Peaks with `lo <= mz <= hi`, in m/z order
    fn peaks_in_mz_range(&self, lo: f64, hi: f64) -> Vec<&Peak>;

    /// All peaks of one experiment, in id order
    fn peaks_of_experiment(&self, id: ExperimentId) -> Vec<&Peak>;

    /// Stored (positive) intensities of a peak that pass the filter, in sample id order
    fn observations(&self, peak: PeakId, filter: &IntensityFilter<'_>) -> Vec<Observation<'_>>;

    /// Cached control/treatment means, when the store maintains them
    fn cached_means(&self, _peak: PeakId) -> Option<PeakMeans> {
        None
    }

    /// Delete an experiment and everything it owns
    fn remove_experiment(&mut self, name: &str) -> Option<RemovalSummary>;

    /// A uniformly random peak, for diagnostics
    fn random_peak<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Peak>
    where
        Self: Sized;
}
