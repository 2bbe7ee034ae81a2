use std::time::Duration;

/// Invalid or contradictory search configuration. Raised before any query runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A tolerance window is below zero
    #[error("{name} must be >= 0, got {value}")]
    NegativeWindow {
        /// Option name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// A numeric option is NaN or infinite
    #[error("{name} must be a finite number, got {value}")]
    NonFinite {
        /// Option name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// `exclude_controls = true` together with `int_over_controls`
    #[error("exclude_controls and int_over_controls are mutually exclusive")]
    ConflictingControlPolicies,

    /// `exclude_controls = false` without a ratio leaves no control policy
    #[error("exclude_controls is false but no int_over_controls ratio is set")]
    NoControlPolicy,

    /// Ratio below zero
    #[error("int_over_controls must be >= 0, got {0}")]
    NegativeRatio(f64),

    /// Empty name in `attrs` or `exclude_attrs`
    #[error("attribute names must not be empty")]
    EmptyAttributeName,

    /// The same attribute listed twice in `attrs`
    #[error("attribute '{0}' appears more than once in attrs")]
    DuplicateGroupAttribute(String),

    /// Point query with an unusable m/z or rt
    #[error("invalid query point: mz {mz} must be finite and > 0, rt {rt} must be finite")]
    InvalidQueryPoint {
        /// Query m/z
        mz: f64,
        /// Query retention time
        rt: f64,
    },

    /// Unrecognised option name
    #[error("unknown search option '{0}'")]
    UnknownKey(String),

    /// Option value that cannot be parsed
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Option name
        key: String,
        /// Raw value
        value: String,
        /// What was expected
        reason: String,
    },
}

/// Errors returned by the match engine
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Configuration rejected up front
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Unknown experiment in strict mode
    #[error("Experiment '{0}' not found")]
    ExperimentNotFound(String),

    /// The store returned a peak that breaks the ingestion invariants
    #[error("Data integrity error on peak {peak}: {reason}")]
    DataIntegrity {
        /// Offending peak id
        peak: u64,
        /// What was wrong
        reason: String,
    },

    /// The cancel flag was raised
    #[error("Search cancelled")]
    Cancelled,

    /// The deadline passed before the search finished
    #[error("Search exceeded its deadline after {0:?}")]
    DeadlineExceeded(Duration),
}

impl SearchError {
    pub(crate) fn integrity(peak: u64, reason: impl Into<String>) -> Self {
        SearchError::DataIntegrity {
            peak,
            reason: reason.into(),
        }
    }
}
