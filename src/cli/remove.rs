use anyhow::{bail, Result};

use super::Session;

/// Remove an experiment with all its samples, peaks and intensities
pub fn run(session: &Session, experiment: &str) -> Result<()> {
    let mut db = session.open_database()?;
    let Some(summary) = db.remove_experiment(session.mode, experiment) else {
        bail!("Experiment '{}' not found in {} mode", experiment, session.mode);
    };
    session.save_database(&db)?;

    println!(
        "Removed '{}': {} samples, {} peaks, {} intensities",
        experiment, summary.samples, summary.peaks, summary.intensities
    );
    Ok(())
}
