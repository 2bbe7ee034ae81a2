/// Errors raised while assembling or writing a match table
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// CSV encoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error on the destination
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Atomic replacement of the output file failed
    #[error("Failed to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),

    /// A rendered row does not fit the header
    #[error("Schema mismatch: row {row} has {found} cells, header has {expected}")]
    SchemaMismatch {
        /// Row index
        row: usize,
        /// Header width
        expected: usize,
        /// Row width
        found: usize,
    },
}
