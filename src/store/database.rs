use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::{Partition, PeakStore, RemovalSummary, StoreError};
use crate::ingest::ExperimentBatch;
use crate::model::{ExperimentId, IonMode};

/// Snapshot format version - bumped on incompatible layout changes
pub const SNAPSHOT_FORMAT_VERSION: &str = "1";

/// The whole peak database: one independent partition per ionization mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    format_version: String,
    positive: Partition,
    negative: Partition,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION.to_string(),
            positive: Partition::new(IonMode::Positive),
            negative: Partition::new(IonMode::Negative),
        }
    }

    /// Partition holding the given mode's data
    pub fn partition(&self, mode: IonMode) -> &Partition {
        match mode {
            IonMode::Positive => &self.positive,
            IonMode::Negative => &self.negative,
        }
    }

    /// Mutable access to a partition
    pub fn partition_mut(&mut self, mode: IonMode) -> &mut Partition {
        match mode {
            IonMode::Positive => &mut self.positive,
            IonMode::Negative => &mut self.negative,
        }
    }

    /// Store a batch in the partition named by its mode tag
    pub fn insert_experiment(&mut self, batch: ExperimentBatch) -> Result<ExperimentId, StoreError> {
        self.partition_mut(batch.mode).insert_experiment(batch)
    }

    /// Remove an experiment from one partition
    pub fn remove_experiment(&mut self, mode: IonMode, name: &str) -> Option<RemovalSummary> {
        self.partition_mut(mode).remove_experiment(name)
    }

    /// Read a snapshot
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut db: Database = serde_json::from_reader(reader)?;
        if db.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(db.format_version));
        }
        db.positive.rebuild_derived();
        db.negative.rebuild_derived();
        Ok(db)
    }

    /// Write a snapshot
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Load a snapshot file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path.as_ref())?;
        let db = Self::from_reader(BufReader::new(file))?;
        debug!(
            "Loaded snapshot {} ({} pos / {} neg peaks)",
            path.as_ref().display(),
            db.positive.peak_count(),
            db.negative.peak_count()
        );
        Ok(db)
    }

    /// Load a snapshot file, or start empty if it does not exist yet
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            info!(
                "No database at {}, starting empty",
                path.as_ref().display()
            );
            Ok(Self::new())
        }
    }

    /// Write a snapshot file atomically (temp file in the same directory, then rename)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.to_writer(&mut writer)?;
            writer.flush()?;
        }
        tmp.persist(path)?;
        debug!("Saved snapshot {}", path.display());
        Ok(())
    }
}
