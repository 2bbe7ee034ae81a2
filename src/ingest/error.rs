/// Errors that can occur while reading experiment files
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error reading an input file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A required column is absent from a header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A cell could not be interpreted
    #[error("Invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        /// 1-based line number in the file, header included
        line: u64,
        /// Column header
        column: String,
        /// Offending cell content
        value: String,
    },

    /// A batch breaks the ingestion contract
    #[error("ingest contract violation: {0}")]
    ContractViolation(String),
}

impl IngestError {
    pub(crate) fn violation(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}
