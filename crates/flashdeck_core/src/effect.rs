use crate::Ticket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the file at `path`, then poll the resulting job.
    SubmitUpload { ticket: Ticket, path: String },
    /// Tear down the upload or polling loop started under `ticket`.
    CancelUpload { ticket: Ticket },
    RequestDeck {
        ticket: Ticket,
        topic: String,
        count: u32,
    },
}
