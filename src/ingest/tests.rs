use super::*;
use crate::model::IonMode;
use std::fs;
use tempfile::tempdir;

const SAMPLE_METADATA: &str = "File Name,Control,media,time
s0.mzXML,1,LB,24h
s1.mzXML,0,LB,
s2.mzXML,no,M9,48h
";

const PEAK_TABLE: &str = "mz,mzmin,mzmax,rt,rtmin,rtmax,annotated,withms2,pcgroup,npeaks,s0.mzXML,s1.mzXML,s2.mzXML
100.0,99.999,100.001,90,88,92,glucose,1,3,2,0,50,NA
200.5,200.49,200.51,300.5,299,302,,0,4,1,12.5,,7
";

#[test]
fn test_sample_metadata_parsing() {
    let samples = read_sample_metadata(SAMPLE_METADATA.as_bytes()).unwrap();
    assert_eq!(samples.len(), 3);

    assert_eq!(samples[0].name, "s0.mzXML");
    assert!(samples[0].control);
    assert_eq!(samples[0].attributes.len(), 2);
    assert_eq!(samples[0].attributes[0].name, "media");
    assert_eq!(samples[0].attributes[1].value, "24h");

    // Empty cells are not stored as attributes
    assert!(!samples[1].control);
    assert_eq!(samples[1].attributes.len(), 1);

    assert!(!samples[2].control);
}

#[test]
fn test_metadata_missing_control_column() {
    let err = read_sample_metadata("file name,media\ns1,LB\n".as_bytes()).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn(ref c) if c == "control"));
}

#[test]
fn test_metadata_invalid_control_flag() {
    let err = read_sample_metadata("file name,control\ns1,maybe\n".as_bytes()).unwrap_err();
    match err {
        IngestError::InvalidValue { line, value, .. } => {
            assert_eq!(line, 2);
            assert_eq!(value, "maybe");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_peak_table_parsing() {
    let samples = read_sample_metadata(SAMPLE_METADATA.as_bytes()).unwrap();
    let peaks = read_peak_table(PEAK_TABLE.as_bytes(), &samples).unwrap();
    assert_eq!(peaks.len(), 2);

    let first = &peaks[0];
    assert_eq!(first.mz, 100.0);
    assert_eq!(first.rtmax, 92.0);
    assert_eq!(first.annotation.as_deref(), Some("glucose"));
    assert_eq!(first.with_ms2, Some(true));
    assert_eq!(first.cluster_id, Some(3));
    assert_eq!(first.intensities, vec![0.0, 50.0, 0.0]);

    let second = &peaks[1];
    assert_eq!(second.annotation, None);
    assert_eq!(second.with_ms2, Some(false));
    assert_eq!(second.intensities, vec![12.5, 0.0, 7.0]);
}

#[test]
fn test_peak_table_missing_sample_column() {
    let samples = vec![SampleRecord::new("absent.mzXML", false)];
    let err = read_peak_table(PEAK_TABLE.as_bytes(), &samples).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn(ref c) if c == "absent.mzXML"));
}

#[test]
fn test_peak_table_bad_number() {
    let samples = vec![SampleRecord::new("s1", false)];
    let table = "mz,mzmin,mzmax,rt,rtmin,rtmax,s1\nabc,1,1,1,1,1,5\n";
    let err = read_peak_table(table.as_bytes(), &samples).unwrap_err();
    assert!(matches!(err, IngestError::InvalidValue { ref column, .. } if column == "mz"));
}

#[test]
fn test_contract_rejects_unobserved_peak() {
    let mut batch = ExperimentBatch::new("a", IonMode::Positive);
    batch.samples.push(SampleRecord::new("s0", true));
    batch.peaks.push(PeakRecord::new(100.0, 90.0, vec![0.0]));
    let err = batch.validate_contract().unwrap_err();
    assert!(err.to_string().contains("not observed"));
}

#[test]
fn test_contract_rejects_invalid_mz() {
    let mut batch = ExperimentBatch::new("a", IonMode::Positive);
    batch.samples.push(SampleRecord::new("s1", false));
    batch.peaks.push(PeakRecord::new(0.0, 90.0, vec![5.0]));
    assert!(batch.validate_contract().is_err());

    batch.peaks[0].mz = f64::NAN;
    assert!(batch.validate_contract().is_err());
}

#[test]
fn test_contract_rejects_duplicates_and_misaligned_rows() {
    let mut batch = ExperimentBatch::new("a", IonMode::Positive);
    batch.samples.push(SampleRecord::new("s1", false));
    batch.samples.push(SampleRecord::new("s1", true));
    assert!(batch.validate_contract().is_err());

    batch.samples.pop();
    batch.peaks.push(PeakRecord::new(100.0, 90.0, vec![5.0, 1.0]));
    assert!(batch.validate_contract().is_err());

    batch.peaks[0].intensities = vec![-1.0];
    assert!(batch.validate_contract().is_err());

    batch.peaks[0].intensities = vec![1.0];
    assert!(batch.validate_contract().is_ok());
    assert_eq!(batch.observation_count(), 1);
}

#[test]
fn test_load_experiment_from_files() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("tps4_pos.csv");
    let metadata = dir.path().join("tps4_metadata.csv");
    fs::write(&data, PEAK_TABLE).unwrap();
    fs::write(&metadata, SAMPLE_METADATA).unwrap();

    let batch = load_experiment("tps4", IonMode::Negative, &data, &metadata).unwrap();
    assert_eq!(batch.name, "tps4");
    assert_eq!(batch.mode, IonMode::Negative);
    assert_eq!(batch.samples.len(), 3);
    assert_eq!(batch.peaks.len(), 2);
    assert!(batch.validate_contract().is_ok());
}

#[test]
fn test_discover_experiment_pairs() {
    let dir = tempdir().unwrap();
    for name in [
        "Tps4_pos_2014.05.23.csv",
        "Tps4_metadata.csv",
        "Tps6_pos_2014.05.23.csv",
        "Lonely_metadata.csv",
        "notes.txt",
    ] {
        fs::write(dir.path().join(name), "").unwrap();
    }

    let found = discover_experiments(dir.path()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "tps4");
    assert!(found[0].data.ends_with("Tps4_pos_2014.05.23.csv"));
    assert!(found[0].metadata.ends_with("Tps4_metadata.csv"));
}

#[test]
fn test_parse_flag() {
    assert_eq!(parse_flag("Yes"), Some(true));
    assert_eq!(parse_flag(" 0 "), Some(false));
    assert_eq!(parse_flag("2"), None);
}
