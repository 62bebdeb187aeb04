use crate::{Flashcard, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked (or cleared) the document to upload.
    FileSelected(String),
    /// User asked to upload the selected document.
    UploadClicked,
    /// User abandoned the current upload/processing job.
    CancelUploadClicked,
    /// User edited the topic input.
    TopicChanged(String),
    /// User edited the card count input.
    CountChanged(String),
    /// User asked for a new deck.
    GenerateClicked,
    NextCard,
    PreviousCard,
    ToggleReveal,
    /// Server accepted an upload. `file_id` is `None` when the server already
    /// finished processing and there is nothing to poll.
    UploadAccepted {
        ticket: Ticket,
        file_id: Option<String>,
    },
    /// Upload was rejected locally or by the server.
    UploadFailed { ticket: Ticket, message: String },
    /// A successful poll of the processing job.
    ProcessingProgress { ticket: Ticket, progress: u8 },
    /// The processing job reached 100.
    ProcessingDone { ticket: Ticket },
    /// Polling stopped with an error.
    ProcessingFailed { ticket: Ticket, message: String },
    /// Generation finished. `cards` may be empty or shorter than `requested`.
    DeckReceived {
        ticket: Ticket,
        cards: Vec<Flashcard>,
        requested: u32,
    },
    /// Generation was rejected locally or by the server.
    DeckFailed { ticket: Ticket, message: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
