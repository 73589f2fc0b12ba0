/// Broad classification of a [`RollupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed over data that breaks the input contract.
    InvalidInput,
    Internal,
}

/// Errors that can occur while aggregating or exporting
#[derive(Debug, thiserror::Error)]
pub enum RollupError {
    #[error("Invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Event {index} has an empty location")]
    EmptyLocation { index: usize },

    #[error("Event counts overflow a 64-bit total")]
    CountOverflow,

    #[error("No records to export")]
    EmptyRecords,

    #[error("Record {index} has a different field set than the first record")]
    InconsistentFields { index: usize },

    #[error("Row {index} does not serialize to a key-value record")]
    NotARecord { index: usize },

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RollupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RollupError::Serialization(_) => ErrorKind::Internal,
            _ => ErrorKind::InvalidInput,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

pub type Result<T> = std::result::Result<T, RollupError>;
