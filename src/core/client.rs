use async_trait::async_trait;
use serde::Deserialize;

use crate::config::settings::Settings;
use crate::error::WatchError;

/// Fire-and-forget triggers. Their completion never changes progress state;
/// only the events that follow on the stream do.
#[async_trait]
pub trait ScanControl: Send + Sync {
    async fn scan(&self) -> Result<(), WatchError>;
    async fn interrupt(&self) -> Result<(), WatchError>;
}

pub struct HttpScanControl {
    client: reqwest::Client,
    scan_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    description: Option<String>,
}

impl HttpScanControl {
    pub fn new(client: reqwest::Client, scan_url: impl Into<String>) -> Self {
        Self {
            client,
            scan_url: scan_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, WatchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self::new(client, settings.scan_url()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(), WatchError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(WatchError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }
}

#[async_trait]
impl ScanControl for HttpScanControl {
    async fn scan(&self) -> Result<(), WatchError> {
        tracing::info!("Requesting scan: POST {}", self.scan_url);
        self.send(self.client.post(&self.scan_url)).await
    }

    async fn interrupt(&self) -> Result<(), WatchError> {
        tracing::info!("Requesting interrupt: DELETE {}", self.scan_url);
        self.send(self.client.delete(&self.scan_url)).await
    }
}

/// Message for a non-2xx response: the server's `{error, description}` body
/// when it sent one.
pub fn error_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error,
            description: Some(description),
        }) if !description.is_empty() => format!("{}: {}", error, description),
        Ok(ErrorBody { error, .. }) => error,
        Err(_) => format!("Unexpected response status {}", status),
    }
}
