//! Integration tests for domdb
//!
//! These tests run the full pipeline: CSV files on disk, ingestion into a
//! snapshot, reload, matching and CSV output.

use domdb::ingest::{discover_experiments, load_experiment};
use domdb::model::IonMode;
use domdb::projection::ResultTable;
use domdb::search::{MatchEngine, SearchError, SearchOptions};
use domdb::store::{Database, PeakStore, StoreError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const LB_METADATA: &str = "file name,control,media
lb_blank.mzXML,1,LB
lb_1.mzXML,0,LB
lb_2.mzXML,0,LB
";

const LB_DATA: &str = "mz,mzmin,mzmax,rt,rtmin,rtmax,annotated,withms2,lb_blank.mzXML,lb_1.mzXML,lb_2.mzXML
181.0707,181.07,181.0714,302.5,300,305,glucose,1,0,1500,1700
133.0142,133.0139,133.0145,120,118,122,,0,400,800,0
";

const TIME_METADATA: &str = "file name,control,time
t0.mzXML,1,0h
t24.mzXML,0,24h
";

const TIME_DATA: &str = "mz,mzmin,mzmax,rt,rtmin,rtmax,t0.mzXML,t24.mzXML
181.0708,181.07,181.0716,303,301,305,0,900
133.0142,133.014,133.0144,121,119,123,0,350
";

fn write_experiment_dir(dir: &Path) {
    fs::write(dir.join("lb_data.csv"), LB_DATA).unwrap();
    fs::write(dir.join("LB_metadata.csv"), LB_METADATA).unwrap();
    fs::write(dir.join("time_peaks.csv"), TIME_DATA).unwrap();
    fs::write(dir.join("time_metadata.csv"), TIME_METADATA).unwrap();
    // unpaired file is ignored
    fs::write(dir.join("orphan_data.csv"), TIME_DATA).unwrap();
}

fn load_dir(dir: &Path) -> Database {
    let mut db = Database::new();
    for files in discover_experiments(dir).unwrap() {
        let batch =
            load_experiment(&files.name, IonMode::Positive, &files.data, &files.metadata).unwrap();
        db.insert_experiment(batch).unwrap();
    }
    db
}

/// Directory scan, ingestion and snapshot reload
#[test]
fn test_ingest_and_reload() {
    let dir = tempdir().unwrap();
    write_experiment_dir(dir.path());

    let found = discover_experiments(dir.path()).unwrap();
    let names: Vec<&str> = found.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["lb", "time"]);

    let db = load_dir(dir.path());
    let snapshot = dir.path().join("domdb.json");
    db.save(&snapshot).unwrap();

    let restored = Database::load(&snapshot).unwrap();
    let partition = restored.partition(IonMode::Positive);
    assert_eq!(partition.peak_count(), 4);
    // the zero-intensity cells are not stored
    assert_eq!(partition.intensity_count(), 6);
    let lb = partition.experiment_by_name("lb").unwrap();
    assert_eq!(partition.samples_of(lb.id).len(), 3);
}

/// Bulk match output: fixed columns then the union of attribute columns
#[test]
fn test_bulk_match_csv() {
    let dir = tempdir().unwrap();
    write_experiment_dir(dir.path());
    let db = load_dir(dir.path());

    let config = SearchOptions {
        ppm_diff: 5.0,
        rt_diff: 2.0,
        int_over_controls: Some(0.0),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let engine = MatchEngine::new(db.partition(IonMode::Positive), &config);

    let rows = engine.bulk_match("time").unwrap();
    let out = dir.path().join("time_matches.csv");
    ResultTable::from_rows(&rows)
        .unwrap()
        .write_csv_file(&out)
        .unwrap();

    let csv = fs::read_to_string(&out).unwrap();
    let expected = "mtab_exp,mtab_mz,mtab_rt,mtab_annotation,match_exp,match_mz,match_rt,match_annotation,sample,intensity,control,media\n\
                    time,133.0142,121,,lb,133.0142,120,,lb_1.mzXML,800,0,LB\n\
                    time,181.0708,303,,lb,181.0707,302.5,glucose,lb_1.mzXML,1500,0,LB\n\
                    time,181.0708,303,,lb,181.0707,302.5,glucose,lb_2.mzXML,1700,0,LB\n";
    assert_eq!(csv, expected);
}

/// Exclude-controls drops the peak that shows up in the LB blank
#[test]
fn test_exclude_controls_end_to_end() {
    let dir = tempdir().unwrap();
    write_experiment_dir(dir.path());
    let db = load_dir(dir.path());

    let config = SearchOptions {
        ppm_diff: 5.0,
        rt_diff: 2.0,
        ..Default::default()
    }
    .validate()
    .unwrap();
    let engine = MatchEngine::new(db.partition(IonMode::Positive), &config);
    let rows = engine.bulk_match("time").unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.matched.mz == 181.0707));
}

/// Same query twice gives byte-identical output, including across a reload
#[test]
fn test_output_is_reproducible() {
    let dir = tempdir().unwrap();
    write_experiment_dir(dir.path());
    let db = load_dir(dir.path());
    let snapshot = dir.path().join("domdb.json");
    db.save(&snapshot).unwrap();
    let restored = Database::load(&snapshot).unwrap();

    let config = SearchOptions::default().validate().unwrap();
    let render = |db: &Database| {
        let rows = MatchEngine::new(db.partition(IonMode::Positive), &config)
            .point_search(181.0707, 302.0)
            .unwrap();
        ResultTable::from_rows(&rows)
            .unwrap()
            .to_csv_string()
            .unwrap()
    };

    let first = render(&db);
    assert_eq!(first, render(&db));
    assert_eq!(first, render(&restored));
}

/// A peak seen in no sample rejects the whole experiment
#[test]
fn test_unobserved_peak_rejects_experiment() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("bad_data.csv");
    let metadata = dir.path().join("bad_metadata.csv");
    fs::write(
        &data,
        "mz,mzmin,mzmax,rt,rtmin,rtmax,t0.mzXML,t24.mzXML\n\
         100,100,100,10,10,10,0,5\n\
         200,200,200,20,20,20,0,0\n",
    )
    .unwrap();
    fs::write(&metadata, TIME_METADATA).unwrap();

    let mut db = Database::new();
    let batch = load_experiment("bad", IonMode::Positive, &data, &metadata).unwrap();
    let err = db.insert_experiment(batch).unwrap_err();
    assert!(matches!(err, StoreError::DataIntegrity { ref experiment, .. } if experiment == "bad"));
    assert_eq!(db.partition(IonMode::Positive).peak_count(), 0);
}

/// Removing an experiment removes it from every later search
#[test]
fn test_remove_then_search() {
    let dir = tempdir().unwrap();
    write_experiment_dir(dir.path());
    let mut db = load_dir(dir.path());

    db.remove_experiment(IonMode::Positive, "lb").unwrap();
    let config = SearchOptions {
        strict: true,
        ..Default::default()
    }
    .validate()
    .unwrap();
    let engine = MatchEngine::new(db.partition(IonMode::Positive), &config);

    assert!(engine.bulk_match("time").unwrap().is_empty());
    assert!(matches!(
        engine.bulk_match("lb"),
        Err(SearchError::ExperimentNotFound(_))
    ));
}
