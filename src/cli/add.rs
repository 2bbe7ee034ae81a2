use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::PathBuf;

use domdb::ingest::{discover_experiments, load_experiment};
use domdb::store::PeakStore;

use super::{AsciiTable, Session};

/// Load one experiment
pub fn run(session: &Session, name: &str, data: PathBuf, metadata: PathBuf) -> Result<()> {
    let mut db = session.open_database()?;

    let batch = load_experiment(name, session.mode, &data, &metadata).with_context(|| {
        format!(
            "Failed to read experiment '{}' from {} and {}",
            name,
            data.display(),
            metadata.display()
        )
    })?;
    let peaks = batch.peaks.len();
    db.insert_experiment(batch)
        .with_context(|| format!("Experiment '{}' was not loaded", name))?;
    session.save_database(&db)?;

    println!("Loaded '{}' ({} mode): {} peaks", name, session.mode, peaks);
    Ok(())
}

/// Load every experiment pair in a directory; a failing experiment is reported
/// and skipped, the others are kept
pub fn run_dir(session: &Session, dir: PathBuf) -> Result<()> {
    let found = discover_experiments(&dir)
        .with_context(|| format!("Failed to scan directory: {}", dir.display()))?;
    if found.is_empty() {
        warn!("No experiment file pairs in {}", dir.display());
        return Ok(());
    }

    let mut db = session.open_database()?;
    let mut loaded = 0usize;
    for files in &found {
        if db
            .partition(session.mode)
            .experiment_by_name(&files.name)
            .is_some()
        {
            warn!("Experiment '{}' already loaded, skipping", files.name);
            continue;
        }

        let result = load_experiment(&files.name, session.mode, &files.data, &files.metadata)
            .map_err(anyhow::Error::from)
            .and_then(|batch| db.insert_experiment(batch).map_err(anyhow::Error::from));
        match result {
            Ok(_) => {
                info!("Loaded '{}'", files.name);
                loaded += 1;
            }
            Err(e) => error!("Experiment '{}' was not loaded: {:#}", files.name, e),
        }
    }

    session.save_database(&db)?;
    println!(
        "Loaded {} of {} experiments from {}",
        loaded,
        found.len(),
        dir.display()
    );
    Ok(())
}

/// Show the experiment pairs a directory contains
pub fn preview_dir(dir: PathBuf) -> Result<()> {
    let found = discover_experiments(&dir)
        .with_context(|| format!("Failed to scan directory: {}", dir.display()))?;

    let mut table = AsciiTable::new(["experiment", "data", "metadata"]);
    for files in &found {
        table.push([
            files.name.clone(),
            file_name(&files.data),
            file_name(&files.metadata),
        ]);
    }
    table.print();
    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
