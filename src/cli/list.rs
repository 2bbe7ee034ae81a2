use anyhow::{bail, Result};

use domdb::store::PeakStore;

use super::{AsciiTable, Session};

/// List experiments of the active partition
pub fn run(session: &Session) -> Result<()> {
    let db = session.open_database()?;
    let summaries = db.partition(session.mode).summaries();

    let mut table = AsciiTable::new(["experiment", "samples", "controls", "peaks", "loaded"]);
    for s in &summaries {
        table.push([
            s.name.clone(),
            s.samples.to_string(),
            s.controls.to_string(),
            s.peaks.to_string(),
            s.loaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    table.print();
    Ok(())
}

/// List the samples of an experiment with their attributes as columns
pub fn run_samples(session: &Session, experiment: &str) -> Result<()> {
    let db = session.open_database()?;
    let partition = db.partition(session.mode);
    let Some(found) = partition.experiment_by_name(experiment) else {
        bail!("Experiment '{}' not found in {} mode", experiment, session.mode);
    };
    let samples = partition.samples_of(found.id);

    let mut attributes: Vec<&str> = Vec::new();
    for sample in &samples {
        for attr in &sample.attributes {
            if !attributes.contains(&attr.name.as_str()) {
                attributes.push(&attr.name);
            }
        }
    }

    let mut header = vec!["sample", "control"];
    header.extend(attributes.iter().copied());
    let mut table = AsciiTable::new(header);
    for sample in &samples {
        let mut row = vec![
            sample.name.clone(),
            if sample.control { "1" } else { "0" }.to_string(),
        ];
        row.extend(
            attributes
                .iter()
                .map(|a| sample.attribute(a).unwrap_or_default().to_string()),
        );
        table.push(row);
    }
    table.print();
    Ok(())
}

/// Count peaks in the partition or in one experiment
pub fn run_count(session: &Session, experiment: Option<&str>) -> Result<()> {
    let db = session.open_database()?;
    let partition = db.partition(session.mode);
    match experiment {
        Some(name) => {
            let Some(found) = partition.experiment_by_name(name) else {
                bail!("Experiment '{}' not found in {} mode", name, session.mode);
            };
            println!("{}", partition.peak_count_of(found.id));
        }
        None => println!("{}", partition.peak_count()),
    }
    Ok(())
}
