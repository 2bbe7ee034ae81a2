//! Control-sample aggregation and the two control policies.

use std::collections::HashMap;

use super::{ControlPolicy, SearchConfig};
use crate::model::{GroupKey, PeakId};
use crate::store::{IntensityFilter, Observation, PeakStore};

/// Mean positive intensity of a peak over the control samples whose attribute
/// tuple over `attributes` equals `key`.
///
/// `None` when no control sample qualifies. With no attributes every control
/// sample of the peak is in the group, and the store's cached mean is used when
/// available.
pub fn average_control_intensity<S>(
    store: &S,
    peak: PeakId,
    attributes: &[String],
    key: &GroupKey,
) -> Option<f64>
where
    S: PeakStore + ?Sized,
{
    if attributes.is_empty() {
        if let Some(means) = store.cached_means(peak) {
            return means.control;
        }
    }

    let filter = IntensityFilter::controls().in_group(attributes, key);
    let controls = store.observations(peak, &filter);
    if controls.is_empty() {
        return None;
    }
    let sum: f64 = controls.iter().map(|o| o.value).sum();
    Some(sum / controls.len() as f64)
}

/// Applies the configured control policy and attribute exclusions to the
/// observations of one matched peak
pub struct ControlGate<'c, S: PeakStore + ?Sized> {
    store: &'c S,
    config: &'c SearchConfig,
}

impl<'c, S: PeakStore + ?Sized> ControlGate<'c, S> {
    /// Create a gate over a store
    pub fn new(store: &'c S, config: &'c SearchConfig) -> Self {
        Self { store, config }
    }

    /// Treatment observations of `peak` that survive the filters, in sample order.
    ///
    /// Control samples never appear in the output. Attribute exclusions only
    /// remove output rows; control averages are taken over every control of
    /// the group.
    pub fn accepted(&self, peak: PeakId) -> Vec<Observation<'c>> {
        let attributes = self.config.group_attributes();
        let excluded = self.config.excluded_attributes();

        let candidates = self
            .store
            .observations(peak, &IntensityFilter::all())
            .into_iter()
            .filter(|o| !o.sample.control && !o.sample.matches_any(excluded));

        // Presence in any control removes the whole peak when ungrouped
        if attributes.is_empty() && self.config.policy() == ControlPolicy::ExcludeControls {
            let empty = GroupKey::default();
            if average_control_intensity(self.store, peak, attributes, &empty).is_some() {
                return Vec::new();
            }
            return candidates.collect();
        }

        let mut averages: HashMap<GroupKey, Option<f64>> = HashMap::new();
        candidates
            .filter(|o| {
                let key = o.sample.group_key(attributes);
                let average = *averages.entry(key).or_insert_with_key(|key| {
                    average_control_intensity(self.store, peak, attributes, key)
                });
                match self.config.policy() {
                    ControlPolicy::ExcludeControls => average.is_none(),
                    ControlPolicy::RatioOverControls(ratio) => {
                        o.value > ratio * average.unwrap_or(0.0)
                    }
                }
            })
            .collect()
    }
}
