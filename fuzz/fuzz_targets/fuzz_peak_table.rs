#![no_main]

use domdb::ingest::{read_peak_table, read_sample_metadata, ExperimentBatch};
use domdb::model::IonMode;
use domdb::store::Database;
use libfuzzer_sys::fuzz_target;

// Input is `metadata CSV \0 peak table CSV`. Parsing and ingestion must either
// succeed or return an error, never panic.
fuzz_target!(|data: &[u8]| {
    let split = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (metadata, rest) = data.split_at(split);
    let peaks = rest.get(1..).unwrap_or_default();

    let Ok(samples) = read_sample_metadata(metadata) else {
        return;
    };
    let Ok(records) = read_peak_table(peaks, &samples) else {
        return;
    };

    let mut batch = ExperimentBatch::new("fuzz", IonMode::Positive);
    batch.samples = samples;
    batch.peaks = records;

    let mut db = Database::new();
    if db.insert_experiment(batch).is_ok() {
        let mut snapshot = Vec::new();
        if db.to_writer(&mut snapshot).is_ok() {
            let _ = Database::from_reader(snapshot.as_slice());
        }
    }
});
