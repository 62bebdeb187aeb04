use thiserror::Error;

/// Bad local input. Never reaches the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("cannot read {path}: {message}")]
    UnreadableFile { path: String, message: String },
    #[error("file {name} is empty")]
    EmptyFile { name: String },
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("card count must be a positive integer")]
    NonPositiveCount,
}

/// Network failure or a response body that could not be understood.
/// `raw_body` keeps whatever the server sent for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
    pub raw_body: Option<String>,
}

impl TransportError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            raw_body: None,
        }
    }

    pub(crate) fn malformed(status: u16, raw_body: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            raw_body: Some(raw_body.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("upload rejected: {message}")]
    Rejected { status: u16, message: String },
    #[error("upload failed: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("processing failed: {message}")]
    JobFailed { message: String },
    #[error("progress query failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("processing failed: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("generation failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("generation failed: {message}")]
    Server { message: String },
    #[error("generation failed: {0}")]
    Transport(#[from] TransportError),
}

/// Failure to start the background engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
