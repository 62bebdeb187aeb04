use std::sync::Arc;

use flashdeck_logging::{deck_info, deck_warn};
use serde::Deserialize;
use serde_json::json;

use crate::transport::{HttpResponse, Transport};
use crate::{DeckOutcome, Flashcard, GenerationError, TransportError, ValidationError};

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    flashcards: Option<Vec<Flashcard>>,
    #[serde(default)]
    error: Option<String>,
}

/// Requests a deck of `count` cards about `topic`.
#[derive(Clone)]
pub struct DeckRequester {
    transport: Arc<dyn Transport>,
    route: String,
}

impl DeckRequester {
    pub fn new(transport: Arc<dyn Transport>, route: impl Into<String>) -> Self {
        Self {
            transport,
            route: route.into(),
        }
    }

    /// Validates locally before sending anything. A deck longer than `count`
    /// is truncated, so the returned deck never exceeds the request.
    pub async fn request_deck(
        &self,
        topic: &str,
        count: u32,
    ) -> Result<DeckOutcome, GenerationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic.into());
        }
        if count == 0 {
            return Err(ValidationError::NonPositiveCount.into());
        }

        deck_info!("Requesting {} flashcards about {:?}", count, topic);
        let payload = json!({ "topic": topic, "num_cards": count });
        let response = self.transport.post_json(&self.route, &payload).await?;
        read_deck(&response, count)
    }
}

fn read_deck(response: &HttpResponse, requested: u32) -> Result<DeckOutcome, GenerationError> {
    if !response.is_success() {
        let message = response.failure_message();
        deck_warn!(
            "Generation failed with status {}: {}",
            response.status,
            message
        );
        return Err(GenerationError::Status {
            status: response.status,
            message,
        });
    }

    let body: GenerateBody = response.json()?;
    if let Some(message) = body.error {
        deck_warn!("Generation failed: {}", message);
        return Err(GenerationError::Server { message });
    }
    let Some(mut cards) = body.flashcards else {
        return Err(TransportError::malformed(
            response.status,
            &response.body,
            "generation response has neither flashcards nor error",
        )
        .into());
    };

    let limit = requested as usize;
    if cards.len() > limit {
        deck_warn!(
            "Server returned {} flashcards for {} requested; keeping the first {}",
            cards.len(),
            requested,
            requested
        );
        cards.truncate(limit);
    }

    let outcome = if cards.is_empty() {
        deck_warn!("Generation produced no flashcards");
        DeckOutcome::Empty
    } else if cards.len() < limit {
        deck_warn!(
            "Generation produced {} of {} requested flashcards",
            cards.len(),
            requested
        );
        DeckOutcome::Partial { cards, requested }
    } else {
        deck_info!("Generation produced {} flashcards", cards.len());
        DeckOutcome::Complete(cards)
    };
    Ok(outcome)
}
