use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{IntensityFilter, MzIndex, Observation, PeakStore, StoreError};
use crate::ingest::ExperimentBatch;
use crate::model::{
    Experiment, ExperimentId, Intensity, IonMode, Peak, PeakId, PeakMeans, Sample, SampleId,
};

/// Row counts deleted by an experiment removal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Samples removed
    pub samples: usize,
    /// Peaks removed
    pub peaks: usize,
    /// Intensity rows removed
    pub intensities: usize,
}

/// Per-experiment overview used for listings
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSummary {
    /// Experiment name
    pub name: String,
    /// Number of samples
    pub samples: usize,
    /// Number of control samples
    pub controls: usize,
    /// Number of peaks
    pub peaks: usize,
    /// Ingestion time
    pub loaded_at: DateTime<Utc>,
}

/// All data of one ionization mode.
///
/// The m/z index and the mean-intensity cache are derived from the tables and
/// are rebuilt after deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    mode: IonMode,
    experiments: BTreeMap<ExperimentId, Experiment>,
    samples: BTreeMap<SampleId, Sample>,
    peaks: BTreeMap<PeakId, Peak>,
    intensities: BTreeMap<PeakId, Vec<Intensity>>,
    next_experiment_id: ExperimentId,
    next_sample_id: SampleId,
    next_peak_id: PeakId,
    #[serde(skip)]
    mz_index: MzIndex,
    #[serde(skip)]
    means: HashMap<PeakId, PeakMeans>,
}

impl Partition {
    /// Create an empty partition
    pub fn new(mode: IonMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Ionization mode of this partition
    pub fn mode(&self) -> IonMode {
        self.mode
    }

    /// Store a whole experiment, or nothing if the batch is invalid.
    pub fn insert_experiment(&mut self, batch: ExperimentBatch) -> Result<ExperimentId, StoreError> {
        if batch.mode != self.mode {
            return Err(StoreError::WrongPartition {
                name: batch.name,
                expected: self.mode,
                found: batch.mode,
            });
        }

        batch
            .validate_contract()
            .map_err(|e| StoreError::DataIntegrity {
                experiment: batch.name.clone(),
                reason: e.to_string(),
            })?;

        if self.experiment_by_name(&batch.name).is_some() {
            return Err(StoreError::DuplicateExperiment {
                name: batch.name,
                mode: self.mode,
            });
        }

        let ExperimentBatch {
            name,
            mode,
            samples,
            peaks,
        } = batch;

        self.next_experiment_id += 1;
        let experiment_id = self.next_experiment_id;

        let mut sample_ids = Vec::with_capacity(samples.len());
        let mut controls = Vec::with_capacity(samples.len());
        for record in samples {
            self.next_sample_id += 1;
            let id = self.next_sample_id;
            sample_ids.push(id);
            controls.push(record.control);
            self.samples.insert(
                id,
                Sample {
                    id,
                    experiment_id,
                    name: record.name,
                    control: record.control,
                    attributes: record.attributes,
                },
            );
        }

        let n_peaks = peaks.len();
        let mut stored_intensities = 0;
        let mut new_entries = Vec::with_capacity(n_peaks);
        for record in peaks {
            self.next_peak_id += 1;
            let id = self.next_peak_id;

            // Zero intensities are not persisted
            let rows: Vec<Intensity> = record
                .intensities
                .iter()
                .zip(&sample_ids)
                .filter(|(value, _)| **value > 0.0)
                .map(|(value, sample_id)| Intensity {
                    peak_id: id,
                    sample_id: *sample_id,
                    value: *value,
                })
                .collect();
            let means = PeakMeans::from_observations(
                record
                    .intensities
                    .iter()
                    .zip(&controls)
                    .map(|(value, control)| (*control, *value)),
            );

            stored_intensities += rows.len();
            new_entries.push((record.mz, id));
            self.means.insert(id, means);
            self.intensities.insert(id, rows);
            self.peaks.insert(
                id,
                Peak {
                    id,
                    experiment_id,
                    mz: record.mz,
                    mzmin: record.mzmin,
                    mzmax: record.mzmax,
                    rt: record.rt,
                    rtmin: record.rtmin,
                    rtmax: record.rtmax,
                    annotation: record.annotation,
                    with_ms2: record.with_ms2,
                    cluster_id: record.cluster_id,
                },
            );
        }
        self.mz_index.extend(new_entries);

        info!(
            "Loaded experiment '{}' ({} mode): {} samples, {} peaks, {} intensities",
            name,
            mode,
            sample_ids.len(),
            n_peaks,
            stored_intensities
        );

        self.experiments.insert(
            experiment_id,
            Experiment {
                id: experiment_id,
                name,
                mode,
                loaded_at: Utc::now(),
            },
        );

        Ok(experiment_id)
    }

    /// Recompute the m/z index and the mean-intensity cache from the tables
    pub(crate) fn rebuild_derived(&mut self) {
        self.mz_index = MzIndex::build(self.peaks.values().map(|p| (p.mz, p.id)));
        self.means = self
            .peaks
            .keys()
            .map(|id| (*id, self.compute_means(*id)))
            .collect();
    }

    /// Control/treatment means computed from the live intensity rows
    pub fn compute_means(&self, peak: PeakId) -> PeakMeans {
        PeakMeans::from_observations(
            self.observations(peak, &IntensityFilter::all())
                .into_iter()
                .map(|o| (o.sample.control, o.value)),
        )
    }

    /// Experiments in name order
    pub fn experiments(&self) -> Vec<&Experiment> {
        let mut experiments: Vec<_> = self.experiments.values().collect();
        experiments.sort_by(|a, b| a.name.cmp(&b.name));
        experiments
    }

    /// Samples of an experiment in declaration order
    pub fn samples_of(&self, experiment: ExperimentId) -> Vec<&Sample> {
        self.samples
            .values()
            .filter(|s| s.experiment_id == experiment)
            .collect()
    }

    /// Total number of peaks
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    /// Number of peaks of one experiment
    pub fn peak_count_of(&self, experiment: ExperimentId) -> usize {
        self.peaks
            .values()
            .filter(|p| p.experiment_id == experiment)
            .count()
    }

    /// Total number of stored intensity rows
    pub fn intensity_count(&self) -> usize {
        self.intensities.values().map(Vec::len).sum()
    }

    /// Overview of every experiment, in name order
    pub fn summaries(&self) -> Vec<ExperimentSummary> {
        self.experiments()
            .into_iter()
            .map(|e| {
                let samples = self.samples_of(e.id);
                ExperimentSummary {
                    name: e.name.clone(),
                    samples: samples.len(),
                    controls: samples.iter().filter(|s| s.control).count(),
                    peaks: self.peak_count_of(e.id),
                    loaded_at: e.loaded_at,
                }
            })
            .collect()
    }
}

impl PeakStore for Partition {
    fn experiment(&self, id: ExperimentId) -> Option<&Experiment> {
        self.experiments.get(&id)
    }

    fn experiment_by_name(&self, name: &str) -> Option<&Experiment> {
        self.experiments.values().find(|e| e.name == name)
    }

    fn sample(&self, id: SampleId) -> Option<&Sample> {
        self.samples.get(&id)
    }

    fn peak(&self, id: PeakId) -> Option<&Peak> {
        self.peaks.get(&id)
    }

    fn peaks_in_mz_range(&self, lo: f64, hi: f64) -> Vec<&Peak> {
        self.mz_index
            .range(lo, hi)
            .filter_map(|id| self.peaks.get(&id))
            .collect()
    }

    fn peaks_of_experiment(&self, id: ExperimentId) -> Vec<&Peak> {
        self.peaks
            .values()
            .filter(|p| p.experiment_id == id)
            .collect()
    }

    fn observations(&self, peak: PeakId, filter: &IntensityFilter<'_>) -> Vec<Observation<'_>> {
        let Some(rows) = self.intensities.get(&peak) else {
            return Vec::new();
        };
        rows.iter()
            .filter(|row| row.value > 0.0)
            .filter_map(|row| {
                let sample = self.samples.get(&row.sample_id)?;
                filter.accepts(sample).then_some(Observation {
                    sample,
                    value: row.value,
                })
            })
            .collect()
    }

    fn cached_means(&self, peak: PeakId) -> Option<PeakMeans> {
        self.means.get(&peak).copied()
    }

    fn remove_experiment(&mut self, name: &str) -> Option<RemovalSummary> {
        let id = self.experiment_by_name(name)?.id;

        let peak_ids: Vec<PeakId> = self
            .peaks
            .values()
            .filter(|p| p.experiment_id == id)
            .map(|p| p.id)
            .collect();
        let mut summary = RemovalSummary {
            peaks: peak_ids.len(),
            ..Default::default()
        };
        for peak in &peak_ids {
            self.peaks.remove(peak);
            self.means.remove(peak);
            summary.intensities += self.intensities.remove(peak).map(|r| r.len()).unwrap_or(0);
        }
        let removed: std::collections::HashSet<PeakId> = peak_ids.into_iter().collect();
        self.mz_index.remove_where(|peak| removed.contains(&peak));

        let before = self.samples.len();
        self.samples.retain(|_, s| s.experiment_id != id);
        summary.samples = before - self.samples.len();

        self.experiments.remove(&id);

        info!(
            "Removed experiment '{}' ({} mode): {} samples, {} peaks, {} intensities",
            name, self.mode, summary.samples, summary.peaks, summary.intensities
        );
        Some(summary)
    }

    fn random_peak<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Peak> {
        if self.peaks.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.peaks.len());
        self.peaks.values().nth(idx)
    }
}
