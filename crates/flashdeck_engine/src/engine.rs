use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use flashdeck_logging::{deck_info, deck_warn};
use tokio_util::sync::CancellationToken;

use crate::poll::{Delay, TokioDelay};
use crate::transport::{ReqwestTransport, Transport};
use crate::{
    DeckRequester, EngineConfig, EngineError, EngineEvent, PollOutcome, ProgressPoller,
    RequestId, UploadReceipt, UploadSubmitter,
};

enum EngineCommand {
    Upload { request: RequestId, path: PathBuf },
    CancelUpload { request: RequestId },
    GenerateDeck {
        request: RequestId,
        topic: String,
        count: u32,
    },
}

struct Pipelines {
    submitter: UploadSubmitter,
    poller: ProgressPoller,
    requester: DeckRequester,
}

/// Command side of the background engine. Cheap to clone; the worker stops
/// and cancels any active upload once every handle is dropped.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the background engine.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<(Self, EngineEvents), EngineError> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_parts(config, transport, Arc::new(TokioDelay))
    }

    /// Builds the engine on a caller-supplied transport and delay.
    pub fn with_parts(
        config: EngineConfig,
        transport: Arc<dyn Transport>,
        delay: Arc<dyn Delay>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let pipelines = Arc::new(Pipelines {
            submitter: UploadSubmitter::new(transport.clone(), config.routes.upload.clone()),
            poller: ProgressPoller::new(
                transport.clone(),
                delay,
                config.routes.progress.clone(),
                config.poll_interval,
            ),
            requester: DeckRequester::new(transport, config.routes.generate.clone()),
        });

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("flashdeck-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            // At most one upload/poll pipeline is live; a new upload cancels it.
            let mut active_upload: Option<(RequestId, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Upload { request, path } => {
                        if let Some((previous, token)) = active_upload.take() {
                            deck_info!("Upload {} superseded by {}", previous, request);
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        active_upload = Some((request, token.clone()));
                        runtime.spawn(run_upload(
                            pipelines.clone(),
                            request,
                            path,
                            token,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::CancelUpload { request } => match active_upload.take() {
                        Some((active, token)) if active == request => token.cancel(),
                        other => active_upload = other,
                    },
                    EngineCommand::GenerateDeck {
                        request,
                        topic,
                        count,
                    } => {
                        runtime.spawn(run_generate(
                            pipelines.clone(),
                            request,
                            topic,
                            count,
                            event_tx.clone(),
                        ));
                    }
                }
            }
            if let Some((_, token)) = active_upload {
                token.cancel();
            }
            deck_info!("Engine worker stopped");
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn upload(&self, request: RequestId, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Upload {
            request,
            path: path.into(),
        });
    }

    /// Cancels `request` if it is still the active upload; otherwise a no-op.
    pub fn cancel_upload(&self, request: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelUpload { request });
    }

    pub fn generate_deck(&self, request: RequestId, topic: impl Into<String>, count: u32) {
        let _ = self.cmd_tx.send(EngineCommand::GenerateDeck {
            request,
            topic: topic.into(),
            count,
        });
    }
}

async fn run_upload(
    pipelines: Arc<Pipelines>,
    request: RequestId,
    path: PathBuf,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let submitted = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            deck_info!("Upload {} cancelled before the server answered", request);
            return;
        }
        result = pipelines.submitter.submit_path(&path) => result,
    };

    let receipt = match submitted {
        Ok(receipt) => receipt,
        Err(error) => {
            deck_warn!("Upload {} failed: {}", request, error);
            let _ = event_tx.send(EngineEvent::UploadFailed { request, error });
            return;
        }
    };
    let job = match &receipt {
        UploadReceipt::Started { job, .. } => Some(job.clone()),
        UploadReceipt::Processed { .. } => None,
    };
    let _ = event_tx.send(EngineEvent::UploadAccepted { request, receipt });
    let Some(job) = job else {
        return;
    };

    let progress_tx = event_tx.clone();
    let result = pipelines
        .poller
        .poll_until_done(&job, &cancel, move |progress| {
            let _ = progress_tx.send(EngineEvent::Progress { request, progress });
        })
        .await;
    let result = match result {
        Ok(PollOutcome::Cancelled) => return,
        Ok(PollOutcome::Completed { polls }) => Ok(polls),
        Err(error) => Err(error),
    };
    let _ = event_tx.send(EngineEvent::ProcessingFinished { request, result });
}

async fn run_generate(
    pipelines: Arc<Pipelines>,
    request: RequestId,
    topic: String,
    count: u32,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = pipelines.requester.request_deck(&topic, count).await;
    let _ = event_tx.send(EngineEvent::DeckFinished {
        request,
        requested: count,
        result,
    });
}
