//! Flashdeck core: pure session state machine and view-model helpers.
mod browser;
mod deck;
mod effect;
mod job;
mod msg;
mod state;
mod update;
mod view_model;

pub use browser::{BrowserState, DeckBrowser};
pub use deck::{Deck, Flashcard, QuestionLines};
pub use effect::Effect;
pub use job::{JobStatus, Ticket, UploadJob};
pub use msg::Msg;
pub use state::{AppState, Notice, NoticeLevel, DEFAULT_CARD_COUNT};
pub use update::update;
pub use view_model::{AppViewModel, CardView, UploadView};
