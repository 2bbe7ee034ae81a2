use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{ExperimentBatch, IngestError, PeakRecord, SampleRecord};
use crate::model::{IonMode, SampleAttribute};

/// Metadata column holding the sample (data file) name
pub const FILE_NAME_COLUMN: &str = "file name";
/// Metadata column holding the control flag
pub const CONTROL_COLUMN: &str = "control";

const PEAK_COLUMNS: [&str; 6] = ["mz", "mzmin", "mzmax", "rt", "rtmin", "rtmax"];

/// Load one experiment from its peak table and sample metadata files
pub fn load_experiment<P: AsRef<Path>, Q: AsRef<Path>>(
    name: &str,
    mode: IonMode,
    data_path: P,
    metadata_path: Q,
) -> Result<ExperimentBatch, IngestError> {
    let metadata = BufReader::new(File::open(metadata_path.as_ref())?);
    let samples = read_sample_metadata(metadata)?;
    debug!(
        "{} samples declared in {}",
        samples.len(),
        metadata_path.as_ref().display()
    );

    let data = BufReader::new(File::open(data_path.as_ref())?);
    let peaks = read_peak_table(data, &samples)?;
    debug!("{} peaks read from {}", peaks.len(), data_path.as_ref().display());

    Ok(ExperimentBatch {
        name: name.to_string(),
        mode,
        samples,
        peaks,
    })
}

/// Parse a sample metadata CSV.
///
/// Requires `file name` and `control` columns. Every other column is a sample
/// attribute, kept in header order; empty cells are skipped.
pub fn read_sample_metadata<R: Read>(reader: R) -> Result<Vec<SampleRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let normalized: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    let name_idx = normalized
        .iter()
        .position(|h| h == FILE_NAME_COLUMN)
        .ok_or_else(|| IngestError::MissingColumn(FILE_NAME_COLUMN.to_string()))?;
    let control_idx = normalized
        .iter()
        .position(|h| h == CONTROL_COLUMN)
        .ok_or_else(|| IngestError::MissingColumn(CONTROL_COLUMN.to_string()))?;

    let mut samples = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let name = record.get(name_idx).unwrap_or("");
        if name.is_empty() {
            warn!("skipping metadata line {line} without a file name");
            continue;
        }

        let control_cell = record.get(control_idx).unwrap_or("");
        let control = parse_flag(control_cell).ok_or_else(|| IngestError::InvalidValue {
            line,
            column: headers[control_idx].clone(),
            value: control_cell.to_string(),
        })?;

        let attributes = record
            .iter()
            .enumerate()
            .filter(|(i, value)| *i != name_idx && *i != control_idx && !value.is_empty())
            .filter_map(|(i, value)| {
                headers
                    .get(i)
                    .filter(|h| !h.is_empty())
                    .map(|h| SampleAttribute::new(h.as_str(), value))
            })
            .collect();

        samples.push(SampleRecord {
            name: name.to_string(),
            control,
            attributes,
        });
    }

    Ok(samples)
}

/// Parse a peak table CSV against the declared samples.
///
/// Requires `mz, mzmin, mzmax, rt, rtmin, rtmax` plus one intensity column per
/// sample, headed by the sample name. `annotation`/`annotated`, `withms2` and
/// `pcgroup` are read when present; any other column is ignored. Empty and
/// `NA` intensity cells read as zero.
pub fn read_peak_table<R: Read>(
    reader: R,
    samples: &[SampleRecord],
) -> Result<Vec<PeakRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let lookup: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase(), i))
        .collect();

    let mut fixed = [0usize; 6];
    for (slot, column) in fixed.iter_mut().zip(PEAK_COLUMNS) {
        *slot = *lookup
            .get(column)
            .ok_or_else(|| IngestError::MissingColumn(column.to_string()))?;
    }
    let annotation_idx = lookup
        .get("annotation")
        .or_else(|| lookup.get("annotated"))
        .copied();
    let ms2_idx = lookup.get("withms2").copied();
    let cluster_idx = lookup.get("pcgroup").copied();

    // Sample columns are matched on the exact header text
    let sample_idx = samples
        .iter()
        .map(|s| {
            headers
                .iter()
                .position(|h| *h == s.name)
                .ok_or_else(|| IngestError::MissingColumn(s.name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut peaks = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let number = |idx: usize| -> Result<f64, IngestError> {
            cell(idx).parse::<f64>().map_err(|_| IngestError::InvalidValue {
                line,
                column: headers[idx].clone(),
                value: cell(idx).to_string(),
            })
        };

        let intensities = sample_idx
            .iter()
            .map(|&idx| match cell(idx) {
                "" | "NA" | "na" | "NaN" | "nan" => Ok(0.0),
                _ => number(idx),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let with_ms2 = match ms2_idx.map(cell) {
            None | Some("") => None,
            Some(value) => Some(parse_flag(value).ok_or_else(|| IngestError::InvalidValue {
                line,
                column: "withms2".to_string(),
                value: value.to_string(),
            })?),
        };

        peaks.push(PeakRecord {
            mz: number(fixed[0])?,
            mzmin: number(fixed[1])?,
            mzmax: number(fixed[2])?,
            rt: number(fixed[3])?,
            rtmin: number(fixed[4])?,
            rtmax: number(fixed[5])?,
            annotation: annotation_idx
                .map(cell)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            with_ms2,
            cluster_id: cluster_idx.and_then(|idx| cell(idx).parse().ok()),
            intensities,
        });
    }

    Ok(peaks)
}

/// Interpret a boolean-ish cell (`1/0`, `true/false`, `yes/no`, `t/f`, `y/n`)
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}
