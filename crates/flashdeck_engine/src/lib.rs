//! Flashdeck engine: upload, progress polling and deck generation against
//! the flashcard server.
mod config;
mod engine;
mod error;
mod generate;
mod poll;
mod transport;
mod types;
mod upload;

pub use config::{EngineConfig, Routes, DEFAULT_POLL_INTERVAL};
pub use engine::{EngineEvents, EngineHandle};
pub use error::{
    EngineError, GenerationError, ProcessingError, TransportError, UploadError, ValidationError,
};
pub use generate::DeckRequester;
pub use poll::{Delay, ProgressPoller, TokioDelay};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::{
    DeckOutcome, EngineEvent, Flashcard, JobHandle, PollOutcome, RequestId, UploadFile,
    UploadReceipt,
};
pub use upload::{UploadSubmitter, UPLOAD_FIELD};
