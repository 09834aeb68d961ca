//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error from a handle destination
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File destination could not be opened
    #[error("file sink error for '{path}': {message}")]
    FileSink { path: String, message: String },
}

impl LoggerError {
    /// Create a file sink error with its path
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSink {
            path: path.into(),
            message: message.into(),
        }
    }
}
