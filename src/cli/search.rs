use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use domdb::projection::ResultTable;
use domdb::search::{Cancellation, MatchEngine, MatchRow};

use super::Session;

fn cancellation(timeout: Option<f64>) -> Result<Cancellation> {
    match timeout {
        None => Ok(Cancellation::new()),
        Some(secs) => {
            let duration = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid timeout: {}", secs))?;
            Ok(Cancellation::with_timeout(duration))
        }
    }
}

fn write_rows(rows: &[MatchRow<'_>], output: &Path) -> Result<()> {
    let table = ResultTable::from_rows(rows).context("Failed to assemble result table")?;
    table
        .write_csv_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if table.is_empty() {
        warn!("No matches; wrote header only to {}", output.display());
    } else {
        info!(
            "Wrote {} rows ({} columns) to {}",
            table.len(),
            table.header().len(),
            output.display()
        );
    }
    Ok(())
}

/// Point search written to CSV
pub fn run_search(
    session: &Session,
    mz: f64,
    rt: f64,
    output: PathBuf,
    timeout: Option<f64>,
) -> Result<()> {
    let config = session.search_config()?;
    let db = session.open_database()?;
    let engine = MatchEngine::new(db.partition(session.mode), &config)
        .with_cancellation(cancellation(timeout)?);

    let rows = engine
        .point_search(mz, rt)
        .with_context(|| format!("Search for mz={} rt={} failed", mz, rt))?;
    write_rows(&rows, &output)?;
    println!("{} matches", rows.len());
    Ok(())
}

/// Bulk match of one experiment written to CSV
pub fn run_match(
    session: &Session,
    experiment: &str,
    output: PathBuf,
    timeout: Option<f64>,
) -> Result<()> {
    let config = session.search_config()?;
    let db = session.open_database()?;
    let engine = MatchEngine::new(db.partition(session.mode), &config)
        .with_cancellation(cancellation(timeout)?);

    let rows = engine
        .bulk_match(experiment)
        .with_context(|| format!("Matching experiment '{}' failed", experiment))?;
    write_rows(&rows, &output)?;
    println!("{} matches", rows.len());
    Ok(())
}
