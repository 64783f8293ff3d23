//! Push-to-pull bridge over a single event subscription.
//!
//! The transport delivers frames whenever it likes; callers pull them one at a
//! time with [`EventSource::get`]. At any moment at most one of the two
//! internal queues is non-empty: frames that arrived with nobody waiting, or
//! `get()` calls waiting for a frame.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::events::Event;
use super::transport::{Connector, PayloadStream};
use crate::error::SourceError;

type Reply = Result<Option<Event>, SourceError>;

#[derive(Default)]
struct Queue {
    events: VecDeque<Event>,
    requests: VecDeque<oneshot::Sender<Reply>>,
    /// Closed locally; everything buffered is discarded.
    closed: bool,
    /// The far end went away; buffered events are still handed out.
    ended: bool,
    /// Failure nobody was waiting for, reported once to the next caller.
    failure: Option<SourceError>,
}

struct Shared {
    queue: Mutex<Queue>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn queue(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pump(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pump.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, mut event: Event) {
        let mut queue = self.queue();
        if queue.closed || queue.ended {
            return;
        }
        loop {
            let Some(request) = queue.requests.pop_front() else {
                queue.events.push_back(event);
                return;
            };
            match request.send(Ok(Some(event))) {
                Ok(()) => return,
                // Caller gave up waiting; offer the event to the next one.
                Err(Ok(Some(returned))) => event = returned,
                Err(_) => return,
            }
        }
    }

    fn finish(&self, failure: Option<SourceError>) {
        let mut queue = self.queue();
        if queue.closed || queue.ended {
            return;
        }
        queue.ended = true;
        queue.requests.retain(|request| !request.is_closed());
        let requests: Vec<_> = queue.requests.drain(..).collect();

        match failure {
            Some(err) if requests.is_empty() => queue.failure = Some(err),
            Some(err) => {
                for request in requests {
                    let _ = request.send(Err(err.clone()));
                }
            }
            None => {
                for request in requests {
                    let _ = request.send(Ok(None));
                }
            }
        }
    }
}

/// Pull-based, cancellable queue of events from one subscription.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct EventSource {
    shared: Arc<Shared>,
}

impl EventSource {
    /// Subscribe through `connector` and start pumping frames. Must be called
    /// inside a tokio runtime.
    pub fn open(connector: &dyn Connector) -> Self {
        Self::from_stream(connector.connect())
    }

    pub fn from_stream(payloads: PayloadStream) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue::default()),
            pump: Mutex::new(None),
        });
        let handle = tokio::spawn(pump(payloads, Arc::downgrade(&shared)));
        *shared.pump() = Some(handle);
        Self { shared }
    }

    /// Next event in arrival order, or `None` once the stream is closed and
    /// drained. Concurrent callers are served in call order.
    pub async fn get(&self) -> Result<Option<Event>, SourceError> {
        let reply = {
            let mut queue = self.shared.queue();
            if queue.closed {
                return Ok(None);
            }
            if let Some(event) = queue.events.pop_front() {
                return Ok(Some(event));
            }
            if queue.ended {
                return match queue.failure.take() {
                    Some(err) => Err(err),
                    None => Ok(None),
                };
            }
            let (tx, rx) = oneshot::channel();
            queue.requests.push_back(tx);
            rx
        };
        reply.await.unwrap_or(Ok(None))
    }

    /// Release the subscription and resolve every waiting `get()` with `None`.
    /// Buffered events are dropped. Safe to call repeatedly.
    pub fn close(&self) {
        let requests = {
            let mut queue = self.shared.queue();
            if queue.closed {
                return;
            }
            queue.closed = true;
            queue.events.clear();
            queue.failure = None;
            std::mem::take(&mut queue.requests)
        };

        if let Some(pump) = self.shared.pump().take() {
            pump.abort();
        }
        tracing::debug!(waiting = requests.len(), "Event source closed");

        for request in requests {
            let _ = request.send(Ok(None));
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.queue().closed
    }

    /// Events received but not yet pulled.
    pub fn buffered_events(&self) -> usize {
        self.shared.queue().events.len()
    }

    /// `get()` calls currently waiting for an event.
    pub fn pending_requests(&self) -> usize {
        self.shared
            .queue()
            .requests
            .iter()
            .filter(|request| !request.is_closed())
            .count()
    }

    pub fn same_source(&self, other: &EventSource) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queue = self.shared.queue();
        f.debug_struct("EventSource")
            .field("buffered", &queue.events.len())
            .field("waiting", &queue.requests.len())
            .field("closed", &queue.closed)
            .field("ended", &queue.ended)
            .finish()
    }
}

async fn pump(mut payloads: PayloadStream, shared: Weak<Shared>) {
    while let Some(item) = payloads.next().await {
        // Every handle dropped: nobody can pull anymore.
        let Some(shared) = shared.upgrade() else {
            return;
        };
        match item.and_then(|payload| Event::from_json(&payload)) {
            Ok(event) => {
                tracing::debug!(kind = event.kind(), "Event received");
                shared.deliver(event);
            }
            Err(e) => {
                tracing::error!("Event stream failed: {}", e);
                shared.finish(Some(e));
                return;
            }
        }
    }
    if let Some(shared) = shared.upgrade() {
        shared.finish(None);
    }
}
