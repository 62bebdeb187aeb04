/// Correlates engine results with the request that produced them. Results
/// carrying a ticket that is no longer current are dropped.
pub type Ticket = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Complete,
    Failed,
}

/// The server-side job created by an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    ticket: Ticket,
    file_id: Option<String>,
    progress: u8,
    status: JobStatus,
}

impl UploadJob {
    pub(crate) fn pending(ticket: Ticket, file_id: String) -> Self {
        Self {
            ticket,
            file_id: Some(file_id),
            progress: 0,
            status: JobStatus::Pending,
        }
    }

    /// A job the server finished while answering the upload itself.
    pub(crate) fn already_processed(ticket: Ticket) -> Self {
        Self {
            ticket,
            file_id: None,
            progress: 100,
            status: JobStatus::Complete,
        }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Records a poll result. Progress never decreases, even if the server
    /// reports a lower value than before.
    pub(crate) fn apply_progress(&mut self, value: u8) -> bool {
        if self.status != JobStatus::Pending {
            return false;
        }
        let value = value.min(100);
        if value > self.progress {
            self.progress = value;
            true
        } else {
            false
        }
    }

    pub(crate) fn complete(&mut self) {
        self.progress = 100;
        self.status = JobStatus::Complete;
    }

    pub(crate) fn fail(&mut self) {
        self.status = JobStatus::Failed;
    }
}
