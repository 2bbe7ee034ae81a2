use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{ConfigError, Tolerance};

/// Default m/z window in ppm
pub const DEFAULT_PPM_DIFF: f64 = 0.5;
/// Default retention time window in seconds
pub const DEFAULT_RT_DIFF: f64 = 30.0;

/// Names accepted by [`SearchOptions::set_key`] and [`SearchOptions::reset_key`]
pub const SEARCH_KEYS: [&str; 8] = [
    "ppm_diff",
    "rt_diff",
    "with_ms2",
    "exclude_controls",
    "int_over_controls",
    "attrs",
    "exclude_attrs",
    "strict",
];

/// Raw search options as written in the `[search]` table of the config file.
///
/// Nothing is checked here; [`SearchOptions::validate`] turns the record into a
/// [`SearchConfig`] or a [`ConfigError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    /// m/z window, ppm of the matched peak's m/z
    pub ppm_diff: f64,
    /// Retention time window, seconds
    pub rt_diff: f64,
    /// Only peaks with an MS2 spectrum qualify
    pub with_ms2: bool,
    /// Presence/absence control policy; unset means "unless a ratio is given"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_controls: Option<bool>,
    /// Intensity-over-controls ratio; selects ratio mode when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int_over_controls: Option<f64>,
    /// Sample attributes that define control groups
    pub attrs: Vec<String>,
    /// Unknown experiment names are errors instead of empty results
    pub strict: bool,
    /// Samples carrying any of these attribute values are left out
    pub exclude_attrs: BTreeMap<String, String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            ppm_diff: DEFAULT_PPM_DIFF,
            rt_diff: DEFAULT_RT_DIFF,
            with_ms2: false,
            exclude_controls: None,
            int_over_controls: None,
            attrs: Vec::new(),
            strict: false,
            exclude_attrs: BTreeMap::new(),
        }
    }
}

/// How control samples restrict a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlPolicy {
    /// Drop a matched peak (or group) that shows any positive control intensity
    ExcludeControls,
    /// Keep treatment observations whose intensity exceeds `ratio` times the
    /// average control intensity of their group (an absent average counts as 0)
    RatioOverControls(f64),
}

/// Validated search configuration consumed by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    tolerance: Tolerance,
    require_ms2: bool,
    policy: ControlPolicy,
    group_attributes: Vec<String>,
    excluded_attributes: BTreeMap<String, String>,
    strict: bool,
}

impl SearchConfig {
    /// Matching windows
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Whether matches must carry an MS2 spectrum
    pub fn require_ms2(&self) -> bool {
        self.require_ms2
    }

    /// Selected control policy
    pub fn policy(&self) -> ControlPolicy {
        self.policy
    }

    /// Attribute names forming the control group key
    pub fn group_attributes(&self) -> &[String] {
        &self.group_attributes
    }

    /// Forbidden `(name, value)` pairs
    pub fn excluded_attributes(&self) -> &BTreeMap<String, String> {
        &self.excluded_attributes
    }

    /// Strict experiment lookup
    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::new(DEFAULT_PPM_DIFF, DEFAULT_RT_DIFF),
            require_ms2: false,
            policy: ControlPolicy::ExcludeControls,
            group_attributes: Vec::new(),
            excluded_attributes: BTreeMap::new(),
            strict: false,
        }
    }
}

impl TryFrom<&SearchOptions> for SearchConfig {
    type Error = ConfigError;

    fn try_from(options: &SearchOptions) -> Result<Self, Self::Error> {
        options.validate()
    }
}

fn check_window(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ConfigError::NegativeWindow { name, value });
    }
    Ok(value)
}

impl SearchOptions {
    /// Check every option and build the engine configuration
    pub fn validate(&self) -> Result<SearchConfig, ConfigError> {
        let ppm = check_window("ppm_diff", self.ppm_diff)?;
        let rt = check_window("rt_diff", self.rt_diff)?;

        let policy = match (self.exclude_controls, self.int_over_controls) {
            (Some(true), Some(_)) => return Err(ConfigError::ConflictingControlPolicies),
            (Some(false), None) => return Err(ConfigError::NoControlPolicy),
            (None | Some(true), None) => ControlPolicy::ExcludeControls,
            (None | Some(false), Some(ratio)) => {
                if !ratio.is_finite() {
                    return Err(ConfigError::NonFinite {
                        name: "int_over_controls",
                        value: ratio,
                    });
                }
                if ratio < 0.0 {
                    return Err(ConfigError::NegativeRatio(ratio));
                }
                ControlPolicy::RatioOverControls(ratio)
            }
        };

        let mut seen = HashSet::new();
        for attr in &self.attrs {
            if attr.is_empty() {
                return Err(ConfigError::EmptyAttributeName);
            }
            if !seen.insert(attr.as_str()) {
                return Err(ConfigError::DuplicateGroupAttribute(attr.clone()));
            }
        }
        if self.exclude_attrs.keys().any(String::is_empty) {
            return Err(ConfigError::EmptyAttributeName);
        }

        Ok(SearchConfig {
            tolerance: Tolerance::new(ppm, rt),
            require_ms2: self.with_ms2,
            policy,
            group_attributes: self.attrs.clone(),
            excluded_attributes: self.exclude_attrs.clone(),
            strict: self.strict,
        })
    }

    /// Set one option from its textual form.
    ///
    /// Lists are comma separated (`attrs = "media, time"`), excluded attributes
    /// are `name=value` pairs (`exclude_attrs = "media=LB,time=0h"`), and `none`
    /// clears an optional value.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "ppm_diff" => self.ppm_diff = value.parse().map_err(|_| invalid("expected a number"))?,
            "rt_diff" => self.rt_diff = value.parse().map_err(|_| invalid("expected a number"))?,
            "with_ms2" => self.with_ms2 = parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?,
            "strict" => self.strict = parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?,
            "exclude_controls" => {
                self.exclude_controls = if is_none(value) {
                    None
                } else {
                    Some(parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?)
                }
            }
            "int_over_controls" => {
                self.int_over_controls = if is_none(value) {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid("expected a number"))?)
                }
            }
            "attrs" => self.attrs = split_list(value).map(str::to_string).collect(),
            "exclude_attrs" => {
                let mut pairs = BTreeMap::new();
                for item in split_list(value) {
                    let (name, val) = item
                        .split_once('=')
                        .ok_or_else(|| invalid("expected name=value pairs"))?;
                    pairs.insert(name.trim().to_string(), val.trim().to_string());
                }
                self.exclude_attrs = pairs;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Restore one option to its default
    pub fn reset_key(&mut self, key: &str) -> Result<(), ConfigError> {
        let defaults = SearchOptions::default();
        match key {
            "ppm_diff" => self.ppm_diff = defaults.ppm_diff,
            "rt_diff" => self.rt_diff = defaults.rt_diff,
            "with_ms2" => self.with_ms2 = defaults.with_ms2,
            "exclude_controls" => self.exclude_controls = defaults.exclude_controls,
            "int_over_controls" => self.int_over_controls = defaults.int_over_controls,
            "attrs" => self.attrs = defaults.attrs,
            "exclude_attrs" => self.exclude_attrs = defaults.exclude_attrs,
            "strict" => self.strict = defaults.strict,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display form, in [`SEARCH_KEYS`] order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let exclude = self
            .exclude_attrs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        vec![
            ("ppm_diff", self.ppm_diff.to_string()),
            ("rt_diff", self.rt_diff.to_string()),
            ("with_ms2", self.with_ms2.to_string()),
            ("exclude_controls", display_option(self.exclude_controls)),
            ("int_over_controls", display_option(self.int_over_controls)),
            ("attrs", self.attrs.join(",")),
            ("exclude_attrs", exclude),
            ("strict", self.strict.to_string()),
        ]
    }
}

fn display_option<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

fn is_none(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
