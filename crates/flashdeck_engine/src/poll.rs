use std::sync::Arc;
use std::time::Duration;

use flashdeck_logging::{deck_debug, deck_info, deck_warn};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::transport::{HttpResponse, Transport};
use crate::{JobHandle, PollOutcome, ProcessingError, TransportError};

/// Waits between polls. Injected so tests can run the loop without real time.
#[async_trait::async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait::async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Deserialize)]
struct ProgressBody {
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Polls a job's progress until it reaches 100, fails, or is cancelled.
#[derive(Clone)]
pub struct ProgressPoller {
    transport: Arc<dyn Transport>,
    delay: Arc<dyn Delay>,
    route: String,
    interval: Duration,
}

impl ProgressPoller {
    pub fn new(
        transport: Arc<dyn Transport>,
        delay: Arc<dyn Delay>,
        route: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            transport,
            delay,
            route: route.into(),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Queries one at a time, `interval` apart, calling `on_progress` after
    /// every successful query. The first error ends the loop; nothing is
    /// retried. Once `cancel` fires, the pending query or wait is dropped and
    /// `on_progress` is not called again.
    pub async fn poll_until_done<F>(
        &self,
        job: &JobHandle,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<PollOutcome, ProcessingError>
    where
        F: FnMut(u8) + Send,
    {
        let mut polls = 0u32;
        loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(cancelled(job)),
                response = self.transport.get(&self.route, job.file_id()) => response,
            };
            let progress = match response
                .map_err(ProcessingError::from)
                .and_then(|response| read_progress(&response))
            {
                Ok(progress) => progress,
                Err(err) => return Err(failed(job, err)),
            };
            polls += 1;

            if cancel.is_cancelled() {
                return Ok(cancelled(job));
            }
            deck_debug!("Job {} progress {} (poll {})", job.file_id(), progress, polls);
            on_progress(progress);

            if progress >= 100 {
                deck_info!("Job {} completed after {} polls", job.file_id(), polls);
                return Ok(PollOutcome::Completed { polls });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(cancelled(job)),
                _ = self.delay.wait(self.interval) => {}
            }
        }
    }
}

fn cancelled(job: &JobHandle) -> PollOutcome {
    deck_info!("Polling for job {} cancelled", job.file_id());
    PollOutcome::Cancelled
}

fn failed(job: &JobHandle, err: ProcessingError) -> ProcessingError {
    deck_warn!("Polling for job {} failed: {}", job.file_id(), err);
    err
}

fn read_progress(response: &HttpResponse) -> Result<u8, ProcessingError> {
    if !response.is_success() {
        return Err(ProcessingError::Status {
            status: response.status,
            message: response.failure_message(),
        });
    }

    let body: ProgressBody = response.json()?;
    if let Some(message) = body.error {
        return Err(ProcessingError::JobFailed { message });
    }
    if let Some(status) = body.status.as_deref() {
        if status.eq_ignore_ascii_case("failed") || status.eq_ignore_ascii_case("error") {
            return Err(ProcessingError::JobFailed {
                message: format!("job reported status {status}"),
            });
        }
    }

    match body.progress {
        Some(value) if value.is_finite() => Ok(value.clamp(0.0, 100.0).floor() as u8),
        _ => Err(TransportError::malformed(
            response.status,
            &response.body,
            "progress response has no numeric progress",
        )
        .into()),
    }
}
