use crate::{AppState, Deck, Effect, Msg, Notice, UploadJob};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(path) => {
            state.set_file_input(path);
            Vec::new()
        }
        Msg::TopicChanged(topic) => {
            state.set_topic_input(topic);
            Vec::new()
        }
        Msg::CountChanged(count) => {
            state.set_count_input(count);
            Vec::new()
        }
        Msg::UploadClicked => {
            let path = state.file_input().trim().to_string();
            if path.is_empty() {
                state.set_notice(Notice::error("Validation error: no file selected"));
                return (state, Vec::new());
            }
            // A new upload supersedes the previous one; its late results are
            // ignored because they carry a stale ticket.
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = state.active_upload_ticket() {
                effects.push(Effect::CancelUpload { ticket: previous });
            }
            let ticket = state.begin_upload(path.clone());
            state.set_notice(Notice::info(format!("Uploading {path}")));
            effects.push(Effect::SubmitUpload { ticket, path });
            effects
        }
        Msg::CancelUploadClicked => match state.active_upload_ticket() {
            Some(ticket) => {
                state.clear_upload();
                state.set_notice(Notice::info("Upload cancelled"));
                vec![Effect::CancelUpload { ticket }]
            }
            None => Vec::new(),
        },
        Msg::GenerateClicked => {
            if state.deck_request_pending() {
                state.set_notice(Notice::warning("A deck is already being generated"));
                return (state, Vec::new());
            }
            let Some(count) = parse_count(state.count_input()) else {
                state.set_notice(Notice::error(
                    "Validation error: card count must be a positive integer",
                ));
                return (state, Vec::new());
            };
            let topic = state.topic_input().trim().to_string();
            let ticket = state.begin_deck_request();
            vec![Effect::RequestDeck {
                ticket,
                topic,
                count,
            }]
        }
        Msg::NextCard => {
            if state.browser_mut().next() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PreviousCard => {
            if state.browser_mut().previous() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ToggleReveal => {
            if state.browser_mut().toggle_reveal() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadAccepted { ticket, file_id } => {
            if state.is_submitting(ticket) {
                match file_id {
                    Some(file_id) => {
                        state.set_notice(Notice::info(format!(
                            "Upload accepted, processing job {file_id}"
                        )));
                        state.track_job(UploadJob::pending(ticket, file_id));
                    }
                    None => {
                        state.set_notice(Notice::info("File uploaded and processed"));
                        state.track_job(UploadJob::already_processed(ticket));
                    }
                }
            }
            Vec::new()
        }
        Msg::UploadFailed { ticket, message } => {
            if state.is_submitting(ticket) {
                state.clear_upload();
                state.set_notice(Notice::error(message));
            }
            Vec::new()
        }
        Msg::ProcessingProgress { ticket, progress } => {
            let changed = state
                .tracked_job_mut(ticket)
                .is_some_and(|job| job.apply_progress(progress));
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ProcessingDone { ticket } => {
            if let Some(job) = state.tracked_job_mut(ticket) {
                job.complete();
                state.set_notice(Notice::info(
                    "Document processed, ready to generate flashcards",
                ));
            }
            Vec::new()
        }
        Msg::ProcessingFailed { ticket, message } => {
            if let Some(job) = state.tracked_job_mut(ticket) {
                job.fail();
                state.set_notice(Notice::error(message));
            }
            Vec::new()
        }
        Msg::DeckReceived {
            ticket,
            cards,
            requested,
        } => {
            if state.finish_deck_request(ticket) {
                apply_deck(&mut state, cards, requested);
            }
            Vec::new()
        }
        Msg::DeckFailed { ticket, message } => {
            if state.finish_deck_request(ticket) {
                state.set_notice(Notice::error(message));
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_deck(state: &mut AppState, cards: Vec<crate::Flashcard>, requested: u32) {
    if cards.is_empty() {
        // The current deck stays on screen; an empty result is not assigned.
        state.set_notice(Notice::warning("No flashcards were produced"));
        return;
    }
    let produced = cards.len();
    state.browser_mut().assign(Deck::new(cards));
    if produced < requested as usize {
        state.set_notice(Notice::warning(format!(
            "Only {produced} of {requested} requested flashcards were produced"
        )));
    } else {
        state.set_notice(Notice::info(format!("Generated {produced} flashcards")));
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}
