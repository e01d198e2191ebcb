use thiserror::Error;

/// Result type alias for BCSV operations
pub type Result<T> = std::result::Result<T, BcsvError>;

/// Errors that can occur while decoding or rendering a BCSV table
#[derive(Error, Debug)]
pub enum BcsvError {
    /// The stream ended before a structure was fully read
    #[error("Unexpected end of stream while reading {context}")]
    Truncated { context: &'static str },

    /// CSV rendering error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Lookup file not found
    #[error("Lookup file not found: {0}")]
    LookupFileNotFound(String),
}

impl BcsvError {
    /// Map an I/O error raised while reading `context`, turning end-of-stream into `Truncated`
    pub(crate) fn reading(context: &'static str) -> impl FnOnce(std::io::Error) -> BcsvError {
        move |err| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                BcsvError::Truncated { context }
            } else {
                BcsvError::IoError(err)
            }
        }
    }
}

impl From<csv::Error> for BcsvError {
    fn from(err: csv::Error) -> Self {
        BcsvError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for BcsvError {
    fn from(err: serde_json::Error) -> Self {
        BcsvError::JsonError(err.to_string())
    }
}
