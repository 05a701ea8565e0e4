// File: crates/stream-core/src/error.rs
// Summary: Error type shared by normalization, configuration and CSV ingestion.

pub type StreamResult<T> = Result<T, StreamError>;

#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    /// A record's date field is missing or cannot be parsed. Fails the whole dataset.
    #[error("malformed date in row {row}: {value:?}")]
    MalformedDate { row: usize, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl StreamError {
    pub fn malformed_date(row: usize, value: impl Into<String>) -> Self {
        Self::MalformedDate { row, value: value.into() }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        let e = StreamError::malformed_date(3, "yesterday");
        assert_eq!(e.to_string(), "malformed date in row 3: \"yesterday\"");
        assert!(StreamError::invalid_config("x").to_string().starts_with("invalid configuration:"));
    }
}
