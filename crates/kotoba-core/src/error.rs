use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not a script directory: {0}")]
    InvalidInputDir(String),

    #[error("Translation record does not match extraction for {file}: {message}")]
    RecordMismatch { file: String, message: String },

    #[error("{count} translation(s) overflow their original byte ranges in {file}")]
    FileRejected { file: String, count: usize },

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Create a RecordMismatch error
    pub fn record_mismatch(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordMismatch {
            file: file.into(),
            message: message.into(),
        }
    }
}
