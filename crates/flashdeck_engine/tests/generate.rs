use std::sync::{Arc, Once};

use flashdeck_engine::{
    DeckOutcome, DeckRequester, EngineConfig, Flashcard, GenerationError, ReqwestTransport,
    ValidationError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(flashdeck_logging::initialize_for_tests);
}

fn requester(server: &MockServer) -> DeckRequester {
    let transport =
        ReqwestTransport::new(&EngineConfig::with_base_url(server.uri())).expect("transport");
    DeckRequester::new(Arc::new(transport), "/generate_flashcards")
}

fn card_json(i: usize) -> Value {
    json!({"question": format!("Question {i}"), "answer": format!("Answer {i}")})
}

async fn mount_response(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/generate_flashcards"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_deck_preserves_order_and_question_text() {
    init_logging();
    let server = MockServer::start().await;
    let mut cards: Vec<Value> = (2..=5).map(card_json).collect();
    cards.insert(
        0,
        json!({
            "question": "What is the primary pigment?\nA) Chlorophyll\nB) Carotene",
            "answer": "A) Chlorophyll"
        }),
    );
    Mock::given(method("POST"))
        .and(path("/generate_flashcards"))
        .and(body_json(json!({"topic": "Photosynthesis", "num_cards": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "flashcards": cards })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = requester(&server)
        .request_deck(" Photosynthesis ", 5)
        .await
        .expect("deck");

    let cards = match outcome {
        DeckOutcome::Complete(cards) => cards,
        other => panic!("expected complete deck, got {other:?}"),
    };
    assert_eq!(cards.len(), 5);
    assert_eq!(
        cards[0],
        Flashcard {
            question: "What is the primary pigment?\nA) Chlorophyll\nB) Carotene".to_string(),
            answer: "A) Chlorophyll".to_string(),
        }
    );
    assert_eq!(cards[4].question, "Question 5");
}

#[tokio::test]
async fn short_deck_is_partial_not_error() {
    init_logging();
    let server = MockServer::start().await;
    let cards: Vec<Value> = (1..=3).map(card_json).collect();
    mount_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "flashcards": cards })),
    )
    .await;

    let outcome = requester(&server).request_deck("Cells", 5).await.unwrap();
    assert!(matches!(
        &outcome,
        DeckOutcome::Partial { cards, requested: 5 } if cards.len() == 3
    ));
    assert_eq!(outcome.cards().len(), 3);
}

#[tokio::test]
async fn oversized_deck_is_truncated_to_request() {
    init_logging();
    let server = MockServer::start().await;
    let cards: Vec<Value> = (1..=7).map(card_json).collect();
    mount_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "flashcards": cards })),
    )
    .await;

    let outcome = requester(&server).request_deck("Cells", 4).await.unwrap();
    let cards = outcome.into_cards();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[3].question, "Question 4");
}

#[tokio::test]
async fn empty_deck_is_distinct_from_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "flashcards": [] })),
    )
    .await;

    let outcome = requester(&server).request_deck("Cells", 5).await.unwrap();
    assert_eq!(outcome, DeckOutcome::Empty);
}

#[tokio::test]
async fn error_field_is_generation_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_response(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "error": "No flashcards could be generated. Please try again or upload more diverse content."
        })),
    )
    .await;

    let err = requester(&server).request_deck("Cells", 5).await.unwrap_err();
    assert_eq!(
        err,
        GenerationError::Server {
            message: "No flashcards could be generated. Please try again or upload more diverse content."
                .to_string()
        }
    );
}

#[tokio::test]
async fn http_status_is_included_in_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_response(
        &server,
        ResponseTemplate::new(503).set_body_string("model unavailable"),
    )
    .await;

    let err = requester(&server).request_deck("Cells", 5).await.unwrap_err();
    assert_eq!(
        err,
        GenerationError::Status {
            status: 503,
            message: "model unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn non_json_success_is_transport_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_response(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let err = requester(&server).request_deck("Cells", 5).await.unwrap_err();
    match err {
        GenerationError::Transport(transport) => {
            assert_eq!(transport.raw_body.as_deref(), Some("not json"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_input_fails_before_any_request() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let requester = requester(&server);

    assert_eq!(
        requester.request_deck("", 5).await.unwrap_err(),
        GenerationError::Validation(ValidationError::EmptyTopic)
    );
    assert_eq!(
        requester.request_deck("   \t", 5).await.unwrap_err(),
        GenerationError::Validation(ValidationError::EmptyTopic)
    );
    assert_eq!(
        requester.request_deck("Cells", 0).await.unwrap_err(),
        GenerationError::Validation(ValidationError::NonPositiveCount)
    );
}
