/// Errors that can occur while writing or re-reading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value for '{field}' on line {line}: {message}")]
    InvalidField {
        line: u64,
        field: &'static str,
        message: String,
    },
}

impl DatasetError {
    pub fn invalid_field(line: u64, field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            line,
            field,
            message: message.into(),
        }
    }
}
