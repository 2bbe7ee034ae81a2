use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Data and metadata files found for one experiment in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentFiles {
    /// Experiment name (lower-cased file name prefix)
    pub name: String,
    /// Peak table
    pub data: PathBuf,
    /// Sample metadata
    pub metadata: PathBuf,
}

/// Scan a directory for `{name}_{anything}.csv` experiment file pairs.
///
/// A file whose lower-cased name contains `metadata` is the metadata file,
/// any other is the data file. Experiments missing either file are skipped.
/// Results are sorted by experiment name.
pub fn discover_experiments<P: AsRef<Path>>(dir: P) -> io::Result<Vec<ExperimentFiles>> {
    let mut found: BTreeMap<String, (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();

    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let lower = file_name.to_lowercase();
        let name = lower
            .split('_')
            .next()
            .unwrap_or(&lower)
            .trim_end_matches(".csv")
            .to_string();

        let slot = found.entry(name).or_default();
        if lower.contains("metadata") {
            slot.1 = Some(path);
        } else {
            slot.0 = Some(path);
        }
    }

    Ok(found
        .into_iter()
        .filter_map(|(name, files)| match files {
            (Some(data), Some(metadata)) => Some(ExperimentFiles {
                name,
                data,
                metadata,
            }),
            _ => None,
        })
        .collect())
}
