use crate::view_model::{AppViewModel, CardView, UploadView};
use crate::{DeckBrowser, JobStatus, Ticket, UploadJob};

/// Card count pre-filled in the count input.
pub const DEFAULT_CARD_COUNT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Last user-facing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum UploadSlot {
    #[default]
    Idle,
    Submitting {
        ticket: Ticket,
        path: String,
    },
    Tracking(UploadJob),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    file_input: String,
    topic_input: String,
    count_input: String,
    upload: UploadSlot,
    pending_deck: Option<Ticket>,
    browser: DeckBrowser,
    notice: Option<Notice>,
    next_ticket: Ticket,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            file_input: String::new(),
            topic_input: String::new(),
            count_input: DEFAULT_CARD_COUNT.to_string(),
            upload: UploadSlot::Idle,
            pending_deck: None,
            browser: DeckBrowser::new(),
            notice: None,
            next_ticket: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let upload = match &self.upload {
            UploadSlot::Idle => UploadView::Idle,
            UploadSlot::Submitting { path, .. } => UploadView::Submitting { path: path.clone() },
            UploadSlot::Tracking(job) => match job.status() {
                JobStatus::Pending => UploadView::Processing {
                    file_id: job.file_id().unwrap_or_default().to_string(),
                    progress: job.progress(),
                },
                JobStatus::Complete => UploadView::Complete,
                JobStatus::Failed => UploadView::Failed,
            },
        };

        let card = self.browser.current().and_then(|current| {
            let index = self.browser.cursor()?;
            let lines = current.question_lines();
            let revealed = self.browser.is_revealed(index);
            Some(CardView {
                number: index + 1,
                total: self.browser.deck().len(),
                prompt: lines.prompt.to_string(),
                supplementary: lines.supplementary.iter().map(|s| s.to_string()).collect(),
                answer: revealed.then(|| current.answer().to_string()),
            })
        });

        AppViewModel {
            upload,
            file_input: self.file_input.clone(),
            topic_input: self.topic_input.clone(),
            count_input: self.count_input.clone(),
            generating: self.pending_deck.is_some(),
            generate_ready: matches!(
                &self.upload,
                UploadSlot::Tracking(job) if job.status() == JobStatus::Complete
            ),
            card,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn browser(&self) -> &DeckBrowser {
        &self.browser
    }

    pub fn upload_job(&self) -> Option<&UploadJob> {
        match &self.upload {
            UploadSlot::Tracking(job) => Some(job),
            _ => None,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn file_input(&self) -> &str {
        &self.file_input
    }

    pub(crate) fn topic_input(&self) -> &str {
        &self.topic_input
    }

    pub(crate) fn count_input(&self) -> &str {
        &self.count_input
    }

    pub(crate) fn set_file_input(&mut self, value: String) {
        self.file_input = value;
        self.mark_dirty();
    }

    pub(crate) fn set_topic_input(&mut self, value: String) {
        self.topic_input = value;
        self.mark_dirty();
    }

    pub(crate) fn set_count_input(&mut self, value: String) {
        self.count_input = value;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn browser_mut(&mut self) -> &mut DeckBrowser {
        &mut self.browser
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Ticket of the upload or polling loop that would need cancelling.
    pub(crate) fn active_upload_ticket(&self) -> Option<Ticket> {
        match &self.upload {
            UploadSlot::Idle => None,
            UploadSlot::Submitting { ticket, .. } => Some(*ticket),
            UploadSlot::Tracking(job) if job.status() == JobStatus::Pending => Some(job.ticket()),
            UploadSlot::Tracking(_) => None,
        }
    }

    /// Starts a new upload, discarding whatever job was tracked before.
    pub(crate) fn begin_upload(&mut self, path: String) -> Ticket {
        let ticket = self.issue_ticket();
        self.upload = UploadSlot::Submitting { ticket, path };
        self.mark_dirty();
        ticket
    }

    pub(crate) fn clear_upload(&mut self) {
        self.upload = UploadSlot::Idle;
        self.mark_dirty();
    }

    pub(crate) fn is_submitting(&self, ticket: Ticket) -> bool {
        matches!(&self.upload, UploadSlot::Submitting { ticket: current, .. } if *current == ticket)
    }

    pub(crate) fn track_job(&mut self, job: UploadJob) {
        self.upload = UploadSlot::Tracking(job);
        self.mark_dirty();
    }

    /// The pending job for `ticket`, if that is still the job being tracked.
    pub(crate) fn tracked_job_mut(&mut self, ticket: Ticket) -> Option<&mut UploadJob> {
        match &mut self.upload {
            UploadSlot::Tracking(job)
                if job.ticket() == ticket && job.status() == JobStatus::Pending =>
            {
                Some(job)
            }
            _ => None,
        }
    }

    pub(crate) fn deck_request_pending(&self) -> bool {
        self.pending_deck.is_some()
    }

    pub(crate) fn begin_deck_request(&mut self) -> Ticket {
        let ticket = self.issue_ticket();
        self.pending_deck = Some(ticket);
        self.mark_dirty();
        ticket
    }

    /// Clears the in-flight marker if `ticket` is the request being waited on.
    pub(crate) fn finish_deck_request(&mut self, ticket: Ticket) -> bool {
        if self.pending_deck == Some(ticket) {
            self.pending_deck = None;
            self.mark_dirty();
            true
        } else {
            false
        }
    }
}
