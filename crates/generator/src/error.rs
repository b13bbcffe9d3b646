use thiserror::Error;

/// Result type for generation
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that abort script generation
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The model request failed
    #[error("Generation request failed: {0}")]
    Request(String),

    /// The model answered without any text
    #[error("Generator returned no usable text")]
    Empty,

    /// Invalid generator configuration
    #[error("Invalid generator configuration: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
