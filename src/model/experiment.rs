use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Experiment identifier, unique within a partition
pub type ExperimentId = u32;

/// Ionization mode of an acquisition.
///
/// Positive and negative mode data are two independent universes: experiment
/// names, peaks and queries never cross between them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum IonMode {
    /// Positive ionization (`pos`)
    #[default]
    #[serde(rename = "pos")]
    Positive,
    /// Negative ionization (`neg`)
    #[serde(rename = "neg")]
    Negative,
}

impl IonMode {
    /// Both modes, in storage order
    pub const ALL: [IonMode; 2] = [IonMode::Positive, IonMode::Negative];

    /// Short tag used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            IonMode::Positive => "pos",
            IonMode::Negative => "neg",
        }
    }
}

impl fmt::Display for IonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an ionization mode tag cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ionization mode '{0}' (expected 'pos' or 'neg')")]
pub struct ParseIonModeError(pub String);

impl FromStr for IonMode {
    type Err = ParseIonModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pos" | "positive" | "+" => Ok(IonMode::Positive),
            "neg" | "negative" | "-" => Ok(IonMode::Negative),
            other => Err(ParseIonModeError(other.to_string())),
        }
    }
}

/// A named batch of samples and peaks loaded together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Identifier assigned by the store
    pub id: ExperimentId,
    /// Unique name within the ionization mode partition
    pub name: String,
    /// Ionization mode partition this experiment belongs to
    pub mode: IonMode,
    /// When the experiment was ingested
    pub loaded_at: DateTime<Utc>,
}
