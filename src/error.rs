use thiserror::Error;

/// Error type for every codec operation.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("input contains no symbols")]
    EmptyInput,
    #[error("malformed stream: {0}")]
    MalformedStream(String),
    #[error("symbol {0} has no code in the current table")]
    UnknownSymbol(String),
    #[error("no code table available for decompression")]
    MissingCodeTable,
    #[error("invalid frequency table: {0}")]
    InvalidFrequencyTable(String),
    #[error("frequency table serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("bit stream I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedStream(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
