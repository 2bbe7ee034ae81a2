use crate::model::IonMode;

/// Errors that can occur in the peak store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An experiment batch violates the data integrity rules; nothing was stored
    #[error("Data integrity error in experiment '{experiment}': {reason}")]
    DataIntegrity {
        /// Experiment whose load was rejected
        experiment: String,
        /// What was wrong
        reason: String,
    },

    /// The experiment name is already taken in this partition
    #[error("Experiment '{name}' already exists in {mode} mode")]
    DuplicateExperiment {
        /// Experiment name
        name: String,
        /// Partition
        mode: IonMode,
    },

    /// The batch targets a different partition than the one it was given to
    #[error("Experiment '{name}' is tagged {found} but was inserted into the {expected} partition")]
    WrongPartition {
        /// Experiment name
        name: String,
        /// Partition the batch was given to
        expected: IonMode,
        /// Mode tag of the batch
        found: IonMode,
    },

    /// Snapshot written by an incompatible version
    #[error("Unsupported snapshot format version '{0}'")]
    UnsupportedVersion(String),

    /// I/O error reading or writing a snapshot
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Atomic snapshot replacement failed
    #[error("Failed to persist snapshot: {0}")]
    PersistError(#[from] tempfile::PersistError),
}
