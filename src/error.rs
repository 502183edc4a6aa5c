use thiserror::Error;

/// Fatal failures of a pipeline run. Malformed individual fields are never
/// reported here; the normalizer absorbs them.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("input is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("input is not valid {encoding} (first malformed byte near offset {offset})")]
    Decoding { encoding: &'static str, offset: usize },

    #[error("unknown text encoding label: {0}")]
    UnknownEncoding(String),

    #[error("unknown category label in [keywords]: {0}")]
    UnknownCategory(String),

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
