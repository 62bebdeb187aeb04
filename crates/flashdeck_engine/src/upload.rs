use std::path::Path;
use std::sync::Arc;

use flashdeck_logging::{deck_info, deck_warn};
use serde::Deserialize;

use crate::transport::{HttpResponse, Transport};
use crate::{JobHandle, TransportError, UploadError, UploadFile, UploadReceipt, ValidationError};

/// Multipart field the server reads the document from.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    file_id: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Sends a document to the server and returns the job it started.
#[derive(Clone)]
pub struct UploadSubmitter {
    transport: Arc<dyn Transport>,
    route: String,
}

impl UploadSubmitter {
    pub fn new(transport: Arc<dyn Transport>, route: impl Into<String>) -> Self {
        Self {
            transport,
            route: route.into(),
        }
    }

    /// Reads `path` and submits it.
    pub async fn submit_path(&self, path: &Path) -> Result<UploadReceipt, UploadError> {
        let file = UploadFile::read(path).await?;
        self.submit(&file).await
    }

    pub async fn submit(&self, file: &UploadFile) -> Result<UploadReceipt, UploadError> {
        if file.is_empty() {
            return Err(ValidationError::EmptyFile {
                name: file.name().to_string(),
            }
            .into());
        }

        deck_info!(
            "Uploading {} ({} bytes) to {}",
            file.name(),
            file.contents().len(),
            self.route
        );
        let response = self
            .transport
            .post_file(&self.route, UPLOAD_FIELD, file)
            .await?;
        let receipt = read_receipt(&response)?;
        deck_info!("Upload of {} accepted: {:?}", file.name(), receipt);
        Ok(receipt)
    }
}

fn read_receipt(response: &HttpResponse) -> Result<UploadReceipt, UploadError> {
    if !response.is_success() {
        let message = response.failure_message();
        deck_warn!("Upload rejected with status {}: {}", response.status, message);
        return Err(UploadError::Rejected {
            status: response.status,
            message,
        });
    }

    let body: UploadBody = response.json()?;
    if let Some(message) = body.error {
        deck_warn!("Upload rejected: {}", message);
        return Err(UploadError::Rejected {
            status: response.status,
            message,
        });
    }

    let message = body.message.unwrap_or_default();
    match body.file_id.as_ref().and_then(file_id_text) {
        Some(file_id) => Ok(UploadReceipt::Started {
            job: JobHandle::new(file_id),
            message,
        }),
        None if signals_processed(&message) => Ok(UploadReceipt::Processed { message }),
        None => Err(TransportError::malformed(
            response.status,
            &response.body,
            "upload response has no file_id",
        )
        .into()),
    }
}

fn file_id_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn signals_processed(message: &str) -> bool {
    message.to_ascii_lowercase().contains("processed")
}
