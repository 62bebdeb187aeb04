use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{GenerationError, ProcessingError, UploadError, ValidationError};

/// Caller-chosen id used to correlate engine events with commands.
pub type RequestId = u64;

/// Server-assigned identifier of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    file_id: String,
}

impl JobHandle {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }
}

/// A document ready to be sent as multipart form content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    contents: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Reads a file from disk. A blank path counts as no selection.
    pub async fn read(path: &Path) -> Result<Self, ValidationError> {
        if path.as_os_str().is_empty() {
            return Err(ValidationError::NoFileSelected);
        }
        let contents = tokio::fs::read(path)
            .await
            .map_err(|err| ValidationError::UnreadableFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &Bytes {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// How the server acknowledged an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReceipt {
    /// Processing runs in the background; poll `job` for progress.
    Started { job: JobHandle, message: String },
    /// The server finished processing before replying.
    Processed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Progress reached 100 after `polls` successful queries.
    Completed { polls: u32 },
    Cancelled,
}

/// Wire form of a card. `question` separates the prompt from any
/// supplementary lines with `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// Result of a generation request that the server did not reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckOutcome {
    Complete(Vec<Flashcard>),
    /// Fewer cards than requested. Not an error, but worth telling the user.
    Partial {
        cards: Vec<Flashcard>,
        requested: u32,
    },
    /// The server produced no cards at all.
    Empty,
}

impl DeckOutcome {
    pub fn cards(&self) -> &[Flashcard] {
        match self {
            DeckOutcome::Complete(cards) | DeckOutcome::Partial { cards, .. } => cards,
            DeckOutcome::Empty => &[],
        }
    }

    pub fn into_cards(self) -> Vec<Flashcard> {
        match self {
            DeckOutcome::Complete(cards) | DeckOutcome::Partial { cards, .. } => cards,
            DeckOutcome::Empty => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadAccepted {
        request: RequestId,
        receipt: UploadReceipt,
    },
    UploadFailed {
        request: RequestId,
        error: UploadError,
    },
    Progress {
        request: RequestId,
        progress: u8,
    },
    /// Polling reached 100 or failed. Cancelled loops report nothing.
    ProcessingFinished {
        request: RequestId,
        result: Result<u32, ProcessingError>,
    },
    DeckFinished {
        request: RequestId,
        requested: u32,
        result: Result<DeckOutcome, GenerationError>,
    },
}
