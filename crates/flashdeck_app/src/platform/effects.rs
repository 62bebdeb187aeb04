use std::sync::mpsc;
use std::thread;

use flashdeck_core::{Effect, Flashcard, Msg};
use flashdeck_engine::{
    EngineConfig, EngineError, EngineEvent, EngineEvents, EngineHandle, UploadReceipt,
};
use flashdeck_logging::deck_info;

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, app_tx: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(config)?;
        spawn_event_loop(events, app_tx);
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitUpload { ticket, path } => {
                    deck_info!("SubmitUpload ticket={} path={}", ticket, path);
                    self.engine.upload(ticket, path);
                }
                Effect::CancelUpload { ticket } => {
                    deck_info!("CancelUpload ticket={}", ticket);
                    self.engine.cancel_upload(ticket);
                }
                Effect::RequestDeck {
                    ticket,
                    topic,
                    count,
                } => {
                    deck_info!(
                        "RequestDeck ticket={} topic_len={} count={}",
                        ticket,
                        topic.len(),
                        count
                    );
                    self.engine.generate_deck(ticket, topic, count);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if app_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadAccepted { request, receipt } => Msg::UploadAccepted {
            ticket: request,
            file_id: match receipt {
                UploadReceipt::Started { job, .. } => Some(job.file_id().to_string()),
                UploadReceipt::Processed { .. } => None,
            },
        },
        EngineEvent::UploadFailed { request, error } => Msg::UploadFailed {
            ticket: request,
            message: error.to_string(),
        },
        EngineEvent::Progress { request, progress } => Msg::ProcessingProgress {
            ticket: request,
            progress,
        },
        EngineEvent::ProcessingFinished { request, result } => match result {
            Ok(_) => Msg::ProcessingDone { ticket: request },
            Err(error) => Msg::ProcessingFailed {
                ticket: request,
                message: error.to_string(),
            },
        },
        EngineEvent::DeckFinished {
            request,
            requested,
            result,
        } => match result {
            Ok(outcome) => Msg::DeckReceived {
                ticket: request,
                cards: outcome.into_cards().into_iter().map(map_card).collect(),
                requested,
            },
            Err(error) => Msg::DeckFailed {
                ticket: request,
                message: error.to_string(),
            },
        },
    }
}

fn map_card(card: flashdeck_engine::Flashcard) -> Flashcard {
    Flashcard::new(card.question, card.answer)
}
