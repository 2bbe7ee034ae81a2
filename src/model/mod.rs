//! # Data Model
//!
//! Entities of a metabolomics experiment database and their relations.
//!
//! ```text
//! Experiment 1──* Sample 1──* SampleAttribute
//!     │             │
//!     1             1
//!     │             │
//!     *             *
//!   Peak 1────────* Intensity
//! ```
//!
//! - An [`Experiment`] owns its [`Sample`]s and [`Peak`]s. Removing an experiment
//!   removes everything below it.
//! - A [`Sample`] carries a control flag and an open-ended, ordered list of
//!   [`SampleAttribute`]s whose names are declared by each experiment's metadata.
//! - An [`Intensity`] joins one peak to one sample. Only positive intensities are
//!   persisted.
//! - [`PeakMeans`] is the derived mean intensity of a peak over its control and
//!   non-control samples.
//!
//! Every experiment lives in exactly one [`IonMode`] partition; names are unique
//! per partition.

mod experiment;
mod peak;
mod sample;

#[cfg(test)]
mod tests;

pub use experiment::{Experiment, ExperimentId, IonMode, ParseIonModeError};
pub use peak::{Intensity, Peak, PeakId, PeakMeans};
pub use sample::{GroupKey, Sample, SampleAttribute, SampleId};
