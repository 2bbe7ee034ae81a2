use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::control::ControlGate;
use super::tolerance::{mz_window, within_tolerance, Feature, QueryPoint};
use super::{Cancellation, ConfigError, SearchConfig, SearchError};
use crate::model::{Experiment, ExperimentId, Peak, PeakId, Sample};
use crate::store::{IntensityFilter, Observation, PeakStore};

/// Query side of a match row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchSource<'a> {
    /// Coordinates of a point search
    Point(QueryPoint),
    /// A stored peak of the experiment being matched
    Peak {
        /// Source peak
        peak: &'a Peak,
        /// Its experiment
        experiment: &'a Experiment,
    },
}

impl MatchSource<'_> {
    /// Source experiment name; empty for point queries
    pub fn experiment_name(&self) -> Option<&str> {
        match self {
            MatchSource::Point(_) => None,
            MatchSource::Peak { experiment, .. } => Some(experiment.name.as_str()),
        }
    }

    /// Source m/z
    pub fn mz(&self) -> f64 {
        match self {
            MatchSource::Point(q) => q.mz,
            MatchSource::Peak { peak, .. } => peak.mz,
        }
    }

    /// Source retention time
    pub fn rt(&self) -> f64 {
        match self {
            MatchSource::Point(q) => q.rt,
            MatchSource::Peak { peak, .. } => peak.rt,
        }
    }

    /// Source annotation
    pub fn annotation(&self) -> Option<&str> {
        match self {
            MatchSource::Point(_) => None,
            MatchSource::Peak { peak, .. } => peak.annotation.as_deref(),
        }
    }

    /// Source peak id, if the source is a stored peak
    pub fn peak_id(&self) -> Option<PeakId> {
        match self {
            MatchSource::Point(_) => None,
            MatchSource::Peak { peak, .. } => Some(peak.id),
        }
    }
}

/// One qualifying sample intensity of a matched peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRow<'a> {
    /// Query side
    pub source: MatchSource<'a>,
    /// Matched stored peak
    pub matched: &'a Peak,
    /// Experiment of the matched peak
    pub matched_experiment: &'a Experiment,
    /// Sample the intensity was measured in
    pub sample: &'a Sample,
    /// Measured intensity (> 0)
    pub intensity: f64,
}

impl MatchRow<'_> {
    /// Total order used for every result set: source m/z, matched experiment
    /// name, source peak, matched m/z, matched peak, sample name
    pub fn output_order(&self, other: &Self) -> Ordering {
        self.source
            .mz()
            .total_cmp(&other.source.mz())
            .then_with(|| {
                self.matched_experiment
                    .name
                    .cmp(&other.matched_experiment.name)
            })
            .then_with(|| self.source.peak_id().cmp(&other.source.peak_id()))
            .then_with(|| self.matched.mz.total_cmp(&other.matched.mz))
            .then_with(|| self.matched.id.cmp(&other.matched.id))
            .then_with(|| self.sample.name.cmp(&other.sample.name))
    }
}

/// Point search and bulk match over one store partition.
///
/// The engine borrows the store immutably for its whole lifetime, so every
/// query sees one consistent snapshot. Results are fully computed and sorted
/// before they are returned.
pub struct MatchEngine<'a, S: PeakStore + Sync> {
    store: &'a S,
    config: &'a SearchConfig,
    cancellation: Cancellation,
}

impl<'a, S: PeakStore + Sync> MatchEngine<'a, S> {
    /// Create an engine
    pub fn new(store: &'a S, config: &'a SearchConfig) -> Self {
        Self {
            store,
            config,
            cancellation: Cancellation::new(),
        }
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Every stored peak matching the point `(mz, rt)`, expanded to one row per
    /// qualifying sample intensity
    pub fn point_search(&self, mz: f64, rt: f64) -> Result<Vec<MatchRow<'a>>, SearchError> {
        if !(mz.is_finite() && mz > 0.0 && rt.is_finite()) {
            return Err(ConfigError::InvalidQueryPoint { mz, rt }.into());
        }
        let started = Instant::now();
        let query = QueryPoint::new(mz, rt);

        let matched = self.candidates(&query, |_| true)?;
        let pairs: Vec<_> = matched
            .into_iter()
            .map(|peak| (MatchSource::Point(query), peak))
            .collect();
        let rows = self.expand(pairs)?;

        debug!(
            "Point search mz={} rt={}: {} rows in {:?}",
            mz,
            rt,
            rows.len(),
            started.elapsed()
        );
        if rows.is_empty() {
            warn!("No matches for mz={} rt={}", mz, rt);
        }
        Ok(rows)
    }

    /// Match every peak of `experiment` against all other experiments
    pub fn bulk_match(&self, experiment: &str) -> Result<Vec<MatchRow<'a>>, SearchError> {
        let started = Instant::now();
        let Some(source_experiment) = self.store.experiment_by_name(experiment) else {
            if self.config.strict() {
                return Err(SearchError::ExperimentNotFound(experiment.to_string()));
            }
            warn!("Experiment '{}' not found, nothing to match", experiment);
            return Ok(Vec::new());
        };

        let sources = self.store.peaks_of_experiment(source_experiment.id);
        let per_source = |source: &&'a Peak| -> Result<Vec<(MatchSource<'a>, &'a Peak)>, SearchError> {
            self.cancellation.check()?;
            check_peak(source)?;
            let matched = self.candidates(*source, |candidate| {
                candidate.id != source.id && candidate.experiment_id != source.experiment_id
            })?;
            let origin = MatchSource::Peak {
                peak: *source,
                experiment: source_experiment,
            };
            Ok(matched.into_iter().map(|m| (origin, m)).collect())
        };

        #[cfg(feature = "parallel")]
        let nested: Vec<Vec<_>> = sources
            .par_iter()
            .map(per_source)
            .collect::<Result<_, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let nested: Vec<Vec<_>> = sources
            .iter()
            .map(per_source)
            .collect::<Result<_, _>>()?;

        let pairs: Vec<_> = nested.into_iter().flatten().collect();
        debug!(
            "Bulk match '{}': {} source peaks, {} peak pairs",
            experiment,
            sources.len(),
            pairs.len()
        );
        let rows = self.expand(pairs)?;

        debug!(
            "Bulk match '{}': {} rows in {:?}",
            experiment,
            rows.len(),
            started.elapsed()
        );
        if rows.is_empty() {
            warn!("No matches for experiment '{}'", experiment);
        }
        Ok(rows)
    }

    /// Stored peaks within tolerance of `feature` that pass the MS2 requirement
    /// and `keep`
    fn candidates<F, K>(&self, feature: &F, keep: K) -> Result<Vec<&'a Peak>, SearchError>
    where
        F: Feature + ?Sized,
        K: Fn(&Peak) -> bool,
    {
        let tolerance = self.config.tolerance();
        let (lo, hi) = mz_window(feature.mz(), tolerance.ppm);
        let mut matched = Vec::new();
        for candidate in self.store.peaks_in_mz_range(lo, hi) {
            if !keep(candidate) {
                continue;
            }
            if self.config.require_ms2() && !candidate.has_ms2() {
                continue;
            }
            check_peak(candidate)?;
            if within_tolerance(feature, candidate, tolerance) {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    /// Expand peak pairs into per-sample rows and sort them
    fn expand(
        &self,
        pairs: Vec<(MatchSource<'a>, &'a Peak)>,
    ) -> Result<Vec<MatchRow<'a>>, SearchError> {
        let gate = ControlGate::new(self.store, self.config);
        let mut accepted: HashMap<PeakId, Vec<Observation<'a>>> = HashMap::new();
        let mut experiments: HashMap<ExperimentId, &'a Experiment> = HashMap::new();
        let mut rows = Vec::new();

        for (source, matched) in pairs {
            self.cancellation.check()?;

            if !accepted.contains_key(&matched.id) {
                if self
                    .store
                    .observations(matched.id, &IntensityFilter::all())
                    .is_empty()
                {
                    return Err(SearchError::integrity(
                        matched.id,
                        "peak has no positive intensity in any sample",
                    ));
                }
                accepted.insert(matched.id, gate.accepted(matched.id));
            }
            let matched_experiment = match experiments.get(&matched.experiment_id) {
                Some(e) => *e,
                None => {
                    let e = self.store.experiment(matched.experiment_id).ok_or_else(|| {
                        SearchError::integrity(matched.id, "peak refers to an unknown experiment")
                    })?;
                    experiments.insert(matched.experiment_id, e);
                    e
                }
            };

            if let Some(observations) = accepted.get(&matched.id) {
                rows.extend(observations.iter().map(|o| MatchRow {
                    source,
                    matched,
                    matched_experiment,
                    sample: o.sample,
                    intensity: o.value,
                }));
            }
        }

        rows.sort_by(MatchRow::output_order);
        Ok(rows)
    }
}

fn check_peak(peak: &Peak) -> Result<(), SearchError> {
    if peak.has_valid_mz() {
        Ok(())
    } else {
        Err(SearchError::integrity(
            peak.id,
            format!("mz must be finite and > 0, got {}", peak.mz),
        ))
    }
}
