use anyhow::{bail, Result};
use log::debug;

use domdb::model::Peak;
use domdb::projection::ResultTable;
use domdb::search::MatchEngine;
use domdb::store::PeakStore;

use super::{AsciiTable, Session};

fn peak_table(peak: &Peak, experiment: &str) -> AsciiTable {
    let mut table = AsciiTable::new(["experiment", "id", "mz", "rt", "annotation", "ms2"]);
    table.push([
        experiment.to_string(),
        peak.id.to_string(),
        peak.mz.to_string(),
        peak.rt.to_string(),
        peak.annotation.clone().unwrap_or_default(),
        if peak.has_ms2() { "1" } else { "0" }.to_string(),
    ]);
    table
}

/// Print one random peak of the active partition
pub fn run_random(session: &Session) -> Result<()> {
    let db = session.open_database()?;
    let partition = db.partition(session.mode);
    let mut rng = rand::thread_rng();

    let Some(peak) = partition.random_peak(&mut rng) else {
        bail!("No peaks in {} mode", session.mode);
    };
    let experiment = partition
        .experiment(peak.experiment_id)
        .map(|e| e.name.as_str())
        .unwrap_or_default();
    peak_table(peak, experiment).print();
    Ok(())
}

/// Search random peaks until one has matches, then print the query peak and
/// its match table
pub fn run_test(session: &Session, attempts: usize) -> Result<()> {
    let config = session.search_config()?;
    let db = session.open_database()?;
    let partition = db.partition(session.mode);
    let engine = MatchEngine::new(partition, &config);
    let mut rng = rand::thread_rng();

    for attempt in 1..=attempts {
        let Some(peak) = partition.random_peak(&mut rng) else {
            bail!("No peaks in {} mode", session.mode);
        };
        let rows = engine.point_search(peak.mz, peak.rt)?;
        debug!(
            "Attempt {}: peak {} (mz {}, rt {}) has {} rows",
            attempt,
            peak.id,
            peak.mz,
            peak.rt,
            rows.len()
        );
        if rows.is_empty() {
            continue;
        }

        let experiment = partition
            .experiment(peak.experiment_id)
            .map(|e| e.name.as_str())
            .unwrap_or_default();
        peak_table(peak, experiment).print();
        println!();

        let result = ResultTable::from_rows(&rows)?;
        let mut table = AsciiTable::new(result.header().iter().cloned());
        for row in result.rows() {
            table.push(row.iter().cloned());
        }
        table.print();
        return Ok(());
    }

    bail!("No matches found after {} random peaks", attempts)
}
