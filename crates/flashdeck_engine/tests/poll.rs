use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use flashdeck_engine::{
    Delay, EngineConfig, JobHandle, PollOutcome, ProcessingError, ProgressPoller,
    ReqwestTransport, Transport, DEFAULT_POLL_INTERVAL,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(flashdeck_logging::initialize_for_tests);
}

/// Answers successive requests with successive bodies, repeating the last.
struct Sequence {
    bodies: Vec<Value>,
    calls: AtomicUsize,
}

impl Sequence {
    fn new(bodies: Vec<Value>) -> Self {
        Self {
            bodies,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self
            .calls
            .fetch_add(1, Ordering::SeqCst)
            .min(self.bodies.len() - 1);
        ResponseTemplate::new(200).set_body_json(&self.bodies[index])
    }
}

/// Records requested waits and returns immediately.
#[derive(Default)]
struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Cancels the token on the first wait and then never finishes.
struct CancellingDelay {
    token: CancellationToken,
}

#[async_trait::async_trait]
impl Delay for CancellingDelay {
    async fn wait(&self, _duration: Duration) {
        self.token.cancel();
        std::future::pending::<()>().await;
    }
}

fn transport(server: &MockServer) -> Arc<dyn Transport> {
    Arc::new(ReqwestTransport::new(&EngineConfig::with_base_url(server.uri())).unwrap())
}

fn poller(server: &MockServer, delay: Arc<dyn Delay>) -> ProgressPoller {
    ProgressPoller::new(transport(server), delay, "/progress", DEFAULT_POLL_INTERVAL)
}

async fn mount_progress(server: &MockServer, bodies: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(Sequence::new(bodies))
        .mount(server)
        .await;
}

#[tokio::test]
async fn polls_until_progress_reaches_100() {
    init_logging();
    let server = MockServer::start().await;
    mount_progress(
        &server,
        vec![
            json!({"progress": 10}),
            json!({"progress": 45}),
            json!({"progress": 80}),
            json!({"progress": 100}),
        ],
    )
    .await;

    let delay = Arc::new(RecordingDelay::default());
    let poller = poller(&server, delay.clone());
    let mut seen = Vec::new();
    let outcome = poller
        .poll_until_done(&JobHandle::new("abc"), &CancellationToken::new(), |p| {
            seen.push(p)
        })
        .await
        .expect("poll ok");

    assert_eq!(outcome, PollOutcome::Completed { polls: 4 });
    assert_eq!(seen, vec![10, 45, 80, 100]);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
    assert_eq!(
        *delay.waits.lock().unwrap(),
        vec![Duration::from_millis(1000); 3]
    );
}

#[tokio::test]
async fn repeated_and_fractional_values_are_reported() {
    init_logging();
    let server = MockServer::start().await;
    mount_progress(
        &server,
        vec![
            json!({"progress": 12.5}),
            json!({"progress": 12.5}),
            json!({"progress": 99.9}),
            json!({"progress": 140}),
        ],
    )
    .await;

    let poller = poller(&server, Arc::new(RecordingDelay::default()));
    let mut seen = Vec::new();
    let outcome = poller
        .poll_until_done(&JobHandle::new("abc"), &CancellationToken::new(), |p| {
            seen.push(p)
        })
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Completed { polls: 4 });
    assert_eq!(seen, vec![12, 12, 99, 100]);
}

#[tokio::test]
async fn http_failure_ends_loop_without_retry() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "unknown job"})))
        .expect(1)
        .mount(&server)
        .await;

    let poller = poller(&server, Arc::new(RecordingDelay::default()));
    let mut calls = 0;
    let err = poller
        .poll_until_done(&JobHandle::new("abc"), &CancellationToken::new(), |_| {
            calls += 1
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProcessingError::Status {
            status: 404,
            message: "unknown job".to_string(),
        }
    );
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn job_error_field_fails_processing() {
    init_logging();
    let server = MockServer::start().await;
    mount_progress(
        &server,
        vec![json!({"progress": 30}), json!({"error": "ocr crashed"})],
    )
    .await;

    let poller = poller(&server, Arc::new(RecordingDelay::default()));
    let mut seen = Vec::new();
    let err = poller
        .poll_until_done(&JobHandle::new("abc"), &CancellationToken::new(), |p| {
            seen.push(p)
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProcessingError::JobFailed {
            message: "ocr crashed".to_string()
        }
    );
    assert_eq!(seen, vec![30]);
}

#[tokio::test]
async fn non_json_body_is_a_transport_failure_with_raw_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let poller = poller(&server, Arc::new(RecordingDelay::default()));
    let err = poller
        .poll_until_done(&JobHandle::new("abc"), &CancellationToken::new(), |_| {})
        .await
        .unwrap_err();

    match err {
        ProcessingError::Transport(transport) => {
            assert_eq!(transport.raw_body.as_deref(), Some("<html>gateway</html>"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_during_wait_stops_callbacks() {
    init_logging();
    let server = MockServer::start().await;
    mount_progress(&server, vec![json!({"progress": 10}), json!({"progress": 50})]).await;

    let token = CancellationToken::new();
    let delay = Arc::new(CancellingDelay {
        token: token.clone(),
    });
    let poller = poller(&server, delay);
    let mut seen = Vec::new();
    let outcome = poller
        .poll_until_done(&JobHandle::new("abc"), &token, |p| seen.push(p))
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Cancelled);
    assert_eq!(seen, vec![10]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancellation_abandons_in_flight_query() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/progress/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(10))
                .set_body_json(json!({"progress": 50})),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let poller = poller(&server, Arc::new(RecordingDelay::default()));
    let mut calls = 0;
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        poller.poll_until_done(&JobHandle::new("abc"), &token, |_| calls += 1),
    )
    .await
    .expect("cancellation should end the loop promptly")
    .unwrap();

    assert_eq!(outcome, PollOutcome::Cancelled);
    assert_eq!(calls, 0);
}
