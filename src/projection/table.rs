use log::debug;
use std::io::Write;
use std::path::Path;

use super::{ColumnSchema, ProjectionError};
use crate::search::MatchRow;

/// A finished match table: header plus rendered rows, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    schema: ColumnSchema,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Build the table in two passes: first collect every attribute name of
    /// every row into the schema, then render each row against it.
    pub fn from_rows(rows: &[MatchRow<'_>]) -> Result<Self, ProjectionError> {
        let mut schema = ColumnSchema::new();
        for row in rows {
            for attr in &row.sample.attributes {
                schema.register_attribute(&attr.name);
            }
        }

        let width = schema.len();
        let mut rendered = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let mut cells = vec![
                row.source.experiment_name().unwrap_or_default().to_string(),
                row.source.mz().to_string(),
                row.source.rt().to_string(),
                row.source.annotation().unwrap_or_default().to_string(),
                row.matched_experiment.name.clone(),
                row.matched.mz.to_string(),
                row.matched.rt.to_string(),
                row.matched.annotation.clone().unwrap_or_default(),
                row.sample.name.clone(),
                row.intensity.to_string(),
                if row.sample.control { "1" } else { "0" }.to_string(),
            ];
            cells.resize(width, String::new());
            for attr in &row.sample.attributes {
                match schema.attribute_index(&attr.name) {
                    Some(column) if column < width => cells[column] = attr.value.clone(),
                    _ => {
                        return Err(ProjectionError::SchemaMismatch {
                            row: index,
                            expected: width,
                            found: cells.len(),
                        })
                    }
                }
            }
            rendered.push(cells);
        }

        debug!(
            "Projected {} rows into {} columns",
            rendered.len(),
            schema.len()
        );
        Ok(Self {
            schema,
            rows: rendered,
        })
    }

    /// Column names
    pub fn header(&self) -> &[String] {
        self.schema.columns()
    }

    /// Rendered rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when there were no matches; the table still has a header
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write header and rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ProjectionError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(self.header())?;
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.schema.len() {
                return Err(ProjectionError::SchemaMismatch {
                    row: index,
                    expected: self.schema.len(),
                    found: row.len(),
                });
            }
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the CSV to `path` atomically (temp file in the same directory,
    /// then rename)
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ProjectionError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.write_csv(std::io::BufWriter::new(tmp.as_file_mut()))?;
        tmp.persist(path)?;
        debug!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// The CSV as a string
    pub fn to_csv_string(&self) -> Result<String, ProjectionError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            ProjectionError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}
