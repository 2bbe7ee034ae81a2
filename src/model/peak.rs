use serde::{Deserialize, Serialize};

use super::{ExperimentId, SampleId};

/// Peak identifier, unique within a partition
pub type PeakId = u64;

/// One detected chromatographic feature (a metabolite peak)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Identifier assigned by the store
    pub id: PeakId,
    /// Owning experiment
    pub experiment_id: ExperimentId,
    /// Mass-to-charge ratio. Always finite and > 0 once stored.
    pub mz: f64,
    /// Lower m/z bound of the feature
    pub mzmin: f64,
    /// Upper m/z bound of the feature
    pub mzmax: f64,
    /// Retention time in seconds
    pub rt: f64,
    /// Lower retention time bound
    pub rtmin: f64,
    /// Upper retention time bound
    pub rtmax: f64,
    /// Compound annotation, if any
    #[serde(default)]
    pub annotation: Option<String>,
    /// Whether a secondary (MS2) spectrum was acquired for this feature
    #[serde(default)]
    pub with_ms2: Option<bool>,
    /// Peak cluster (pcgroup) identifier
    #[serde(default)]
    pub cluster_id: Option<i64>,
}

impl Peak {
    /// `true` only when the feature is flagged as having an MS2 spectrum
    pub fn has_ms2(&self) -> bool {
        self.with_ms2.unwrap_or(false)
    }

    /// `true` when `mz` can serve as a ppm reference denominator
    pub fn has_valid_mz(&self) -> bool {
        self.mz.is_finite() && self.mz > 0.0
    }
}

/// Measured intensity of a peak in one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intensity {
    /// Measured peak
    pub peak_id: PeakId,
    /// Sample the measurement comes from
    pub sample_id: SampleId,
    /// Measured intensity, > 0 once stored
    pub value: f64,
}

/// Mean intensity of a peak over its control and non-control samples.
///
/// Only positive intensities count. `None` means no qualifying sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakMeans {
    /// Mean over control samples
    pub control: Option<f64>,
    /// Mean over treatment (non-control) samples
    pub treatment: Option<f64>,
}

impl PeakMeans {
    /// Aggregate `(is_control, value)` observations
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (bool, f64)>,
    {
        let mut control = (0.0, 0usize);
        let mut treatment = (0.0, 0usize);
        for (is_control, value) in observations {
            if value <= 0.0 {
                continue;
            }
            let acc = if is_control {
                &mut control
            } else {
                &mut treatment
            };
            acc.0 += value;
            acc.1 += 1;
        }
        Self {
            control: mean(control),
            treatment: mean(treatment),
        }
    }

    /// `true` when the peak shows positive intensity in at least one control
    pub fn present_in_controls(&self) -> bool {
        self.control.is_some()
    }
}

#[inline]
fn mean((sum, n): (f64, usize)) -> Option<f64> {
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
