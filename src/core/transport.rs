use futures::stream::{self, BoxStream, StreamExt};
use reqwest_eventsource::retry::Never;
use reqwest_eventsource::{Event as SseEvent, EventSource};

use crate::config::settings::Settings;
use crate::error::SourceError;

/// Raw framed payloads in delivery order. Ends when the far end closes.
pub type PayloadStream = BoxStream<'static, Result<String, SourceError>>;

/// Opens one push subscription. Dropping the returned stream releases it.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self) -> PayloadStream;
}

/// Server-Sent Events subscription over HTTP.
pub struct SseConnector {
    client: reqwest::Client,
    url: String,
}

impl SseConnector {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(reqwest::Client::new(), settings.events_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for SseConnector {
    fn connect(&self) -> PayloadStream {
        tracing::info!("Opening event stream: {}", self.url);

        let mut source = match EventSource::new(self.client.get(&self.url)) {
            Ok(source) => source,
            Err(_) => {
                let err = SourceError::Transport(format!("cannot build request for {}", self.url));
                return stream::once(async move { Err(err) }).boxed();
            }
        };
        // One subscription per session: never reconnect.
        source.set_retry_policy(Box::new(Never));

        stream::unfold(Some(source), |state| async move {
            let mut source = state?;
            loop {
                match source.next().await {
                    Some(Ok(SseEvent::Open)) => {
                        tracing::debug!("Event stream opened");
                    }
                    Some(Ok(SseEvent::Message(message))) => {
                        return Some((Ok(message.data), Some(source)));
                    }
                    Some(Err(reqwest_eventsource::Error::StreamEnded)) | None => {
                        tracing::debug!("Event stream ended by server");
                        source.close();
                        return None;
                    }
                    Some(Err(e)) => {
                        source.close();
                        return Some((Err(SourceError::Transport(e.to_string())), None));
                    }
                }
            }
        })
        .boxed()
    }
}
