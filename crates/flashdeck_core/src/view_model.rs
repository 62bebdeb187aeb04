use crate::Notice;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadView {
    #[default]
    Idle,
    Submitting {
        path: String,
    },
    Processing {
        file_id: String,
        progress: u8,
    },
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// 1-based position in the deck.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub supplementary: Vec<String>,
    /// Present only while the answer is revealed.
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub upload: UploadView,
    pub file_input: String,
    pub topic_input: String,
    pub count_input: String,
    pub generating: bool,
    /// The uploaded document finished processing. Generation is allowed
    /// without it; the front end only uses this as a hint.
    pub generate_ready: bool,
    pub card: Option<CardView>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}
