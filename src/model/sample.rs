use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ExperimentId;

/// Sample identifier, unique within a partition
pub type SampleId = u32;

/// Experiment-defined metadata value attached to a sample (e.g. `media=LB`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleAttribute {
    /// Attribute name as declared by the experiment's metadata header
    pub name: String,
    /// Attribute value
    pub value: String,
}

impl SampleAttribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One acquired data file of an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Identifier assigned by the store
    pub id: SampleId,
    /// Owning experiment
    pub experiment_id: ExperimentId,
    /// Sample name, usually the source data file name
    pub name: String,
    /// `true` for control/blank samples, `false` for treatment samples
    pub control: bool,
    /// Attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<SampleAttribute>,
}

impl Sample {
    /// Value of the named attribute, if the sample carries it
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Grouping key of this sample for the given attribute names.
    ///
    /// Attributes the sample does not carry contribute `None`, so samples that
    /// lack an attribute group together.
    pub fn group_key(&self, names: &[String]) -> GroupKey {
        GroupKey(
            names
                .iter()
                .map(|n| self.attribute(n).map(str::to_string))
                .collect(),
        )
    }

    /// Whether any attribute of this sample matches one of the forbidden pairs
    pub fn matches_any(&self, forbidden: &BTreeMap<String, String>) -> bool {
        !forbidden.is_empty()
            && self
                .attributes
                .iter()
                .any(|a| forbidden.get(&a.name).is_some_and(|v| *v == a.value))
    }
}

/// Ordered tuple of attribute values used to group samples.
///
/// The empty key groups every sample together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(Vec<Option<String>>);

impl GroupKey {
    /// Build a key from explicit values
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self(values)
    }

    /// Values in attribute order
    pub fn values(&self) -> &[Option<String>] {
        &self.0
    }

    /// `true` when no attributes participate in the grouping
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
