use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{EngineConfig, TransportError, UploadFile};

/// Status and body of a completed exchange. Non-2xx statuses are returned
/// here rather than as errors so callers can read the server's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|err| {
            TransportError::malformed(self.status, &self.body, format!("invalid JSON body: {err}"))
        })
    }

    /// Best human-readable failure description: an `error` (or `detail`)
    /// field, else the trimmed body, else the status code.
    pub fn failure_message(&self) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&self.body) {
            for key in ["error", "detail", "message"] {
                if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                    return text.to_string();
                }
            }
        }
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            format!("server returned status {}", self.status)
        } else {
            trimmed.to_string()
        }
    }
}

/// Request/response seam between the pipelines and the network.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// POST `file` as multipart form content under `field`.
    async fn post_file(
        &self,
        route: &str,
        field: &str,
        file: &UploadFile,
    ) -> Result<HttpResponse, TransportError>;

    /// GET `route/{id}`, with `id` encoded as one path segment.
    async fn get(&self, route: &str, id: &str) -> Result<HttpResponse, TransportError>;

    async fn post_json(
        &self,
        route: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(config: &EngineConfig) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|err| {
            TransportError::new(format!("invalid base url {}: {err}", config.base_url))
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| TransportError::new(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, route: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|err| TransportError::new(format!("invalid route {route}: {err}")))
    }

    async fn finish(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| TransportError {
            status: Some(status),
            ..map_reqwest_error(err)
        })?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn post_file(
        &self,
        route: &str,
        field: &str,
        file: &UploadFile,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.endpoint(route)?;
        let part = Part::bytes(file.contents().to_vec()).file_name(file.name().to_string());
        let form = Form::new().part(field.to_string(), part);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::finish(response).await
    }

    async fn get(&self, route: &str, id: &str) -> Result<HttpResponse, TransportError> {
        let mut url = self.endpoint(route)?;
        url.path_segments_mut()
            .map_err(|_| TransportError::new(format!("route {route} cannot take a path segment")))?
            .pop_if_empty()
            .push(id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::finish(response).await
    }

    async fn post_json(
        &self,
        route: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.endpoint(route)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        Self::finish(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(format!("request timed out: {err}"));
    }
    if err.is_connect() {
        return TransportError::new(format!("could not connect: {err}"));
    }
    TransportError::new(err.to_string())
}
