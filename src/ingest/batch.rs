//! Ingestion contract types and validation.

use std::collections::HashSet;

use super::IngestError;
use crate::model::{IonMode, SampleAttribute};

/// One sample as declared by an experiment's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Sample name (the data file name)
    pub name: String,
    /// Control/blank flag
    pub control: bool,
    /// Attributes in declaration order
    pub attributes: Vec<SampleAttribute>,
}

impl SampleRecord {
    /// Create a sample record without attributes
    pub fn new(name: impl Into<String>, control: bool) -> Self {
        Self {
            name: name.into(),
            control,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute (builder style)
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(SampleAttribute::new(name, value));
        self
    }
}

/// One peak row with its intensity in every sample of the batch
#[derive(Debug, Clone, PartialEq)]
pub struct PeakRecord {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Lower m/z bound
    pub mzmin: f64,
    /// Upper m/z bound
    pub mzmax: f64,
    /// Retention time in seconds
    pub rt: f64,
    /// Lower retention time bound
    pub rtmin: f64,
    /// Upper retention time bound
    pub rtmax: f64,
    /// Compound annotation
    pub annotation: Option<String>,
    /// MS2 flag
    pub with_ms2: Option<bool>,
    /// Peak cluster identifier
    pub cluster_id: Option<i64>,
    /// Intensity per sample, aligned with [`ExperimentBatch::samples`]
    pub intensities: Vec<f64>,
}

impl PeakRecord {
    /// Create a point-like peak record (bounds collapse onto `mz`/`rt`)
    pub fn new(mz: f64, rt: f64, intensities: Vec<f64>) -> Self {
        Self {
            mz,
            mzmin: mz,
            mzmax: mz,
            rt,
            rtmin: rt,
            rtmax: rt,
            annotation: None,
            with_ms2: None,
            cluster_id: None,
            intensities,
        }
    }

    /// Set the annotation (builder style)
    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Set the MS2 flag (builder style)
    pub fn with_ms2(mut self, flag: bool) -> Self {
        self.with_ms2 = Some(flag);
        self
    }
}

/// Everything ingested for one experiment, stored in a single transaction.
///
/// Invariants:
/// - The experiment name is non-empty.
/// - Sample names are non-empty and unique; attribute names are non-empty and
///   unique per sample.
/// - Every peak has finite `mz > 0` and finite `rt`.
/// - Every peak has exactly one intensity per sample, each finite and >= 0,
///   and at least one of them positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentBatch {
    /// Experiment name
    pub name: String,
    /// Ionization mode partition
    pub mode: IonMode,
    /// Samples in declaration order
    pub samples: Vec<SampleRecord>,
    /// Peak rows
    pub peaks: Vec<PeakRecord>,
}

impl ExperimentBatch {
    /// Create an empty batch
    pub fn new(name: impl Into<String>, mode: IonMode) -> Self {
        Self {
            name: name.into(),
            mode,
            samples: Vec::new(),
            peaks: Vec::new(),
        }
    }

    /// Total number of non-zero intensity cells
    pub fn observation_count(&self) -> usize {
        self.peaks
            .iter()
            .map(|p| p.intensities.iter().filter(|v| **v > 0.0).count())
            .sum()
    }

    /// Validate the contract invariants for the whole batch.
    pub fn validate_contract(&self) -> Result<(), IngestError> {
        if self.name.trim().is_empty() {
            return Err(IngestError::violation("experiment name must not be empty"));
        }

        let mut names = HashSet::new();
        for sample in &self.samples {
            if sample.name.is_empty() {
                return Err(IngestError::violation("sample name must not be empty"));
            }
            if !names.insert(sample.name.as_str()) {
                return Err(IngestError::violation(format!(
                    "duplicate sample name '{}'",
                    sample.name
                )));
            }
            let mut attrs = HashSet::new();
            for attr in &sample.attributes {
                if attr.name.is_empty() {
                    return Err(IngestError::violation(format!(
                        "sample '{}' has an attribute with an empty name",
                        sample.name
                    )));
                }
                if !attrs.insert(attr.name.as_str()) {
                    return Err(IngestError::violation(format!(
                        "sample '{}' declares attribute '{}' twice",
                        sample.name, attr.name
                    )));
                }
            }
        }

        for (row, peak) in self.peaks.iter().enumerate() {
            Self::validate_peak(row, peak, self.samples.len())?;
        }

        Ok(())
    }

    fn validate_peak(row: usize, peak: &PeakRecord, n_samples: usize) -> Result<(), IngestError> {
        if !(peak.mz.is_finite() && peak.mz > 0.0) {
            return Err(IngestError::violation(format!(
                "peak {row}: mz must be finite and > 0, got {}",
                peak.mz
            )));
        }

        if !peak.rt.is_finite() {
            return Err(IngestError::violation(format!(
                "peak {row}: rt must be finite, got {}",
                peak.rt
            )));
        }

        if peak.intensities.len() != n_samples {
            return Err(IngestError::violation(format!(
                "peak {row}: {} intensities for {n_samples} samples",
                peak.intensities.len()
            )));
        }

        if let Some(bad) = peak
            .intensities
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0)
        {
            return Err(IngestError::violation(format!(
                "peak {row}: intensity must be finite and >= 0, got {bad}"
            )));
        }

        if !peak.intensities.iter().any(|v| *v > 0.0) {
            return Err(IngestError::violation(format!(
                "peak {row} (mz {}, rt {}) is not observed in any sample",
                peak.mz, peak.rt
            )));
        }

        Ok(())
    }
}
