use crate::error::Error;
use crate::negotiator::MediaStream;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Tag distinguishing connection flavors on the signaling channel.
/// Collaborators use it to dispatch incoming messages to the right
/// session type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Media,
    Data,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Media => "media",
            ConnectionKind::Data => "data",
        }
    }

    /// Prefix stamped onto generated connection ids of this flavor.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ConnectionKind::Media => "mc_",
            ConnectionKind::Data => "dc_",
        }
    }
}

/// Closed set of events a session can emit to its listeners.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// Remote media became available.
    Stream(MediaStream),
    /// The session was closed.
    Close,
    /// Something failed on behalf of this session.
    Error(Error),
}

/// Generic per-session state shared by all connection flavors: identifier,
/// flavor tag, remote peer, open flag and the emitting half of the event
/// channel.
///
/// Session types embed it instead of inheriting from it, and delegate the
/// generic behaviors here.
pub struct ConnectionBase {
    kind: ConnectionKind,
    id: Arc<str>,
    peer: Arc<str>,
    label: Arc<str>,
    open: bool,
    events: UnboundedSender<ConnectionEvent>,
}

impl ConnectionBase {
    /// Creates the shared state together with the consuming half of its
    /// event channel. When no explicit id is given, one is generated from
    /// the flavor prefix and a random token.
    pub fn new(
        kind: ConnectionKind,
        peer: Arc<str>,
        connection_id: Option<String>,
        label: Option<String>,
    ) -> (Self, ConnectionEvents) {
        let id: Arc<str> = match connection_id {
            Some(id) => id.into(),
            None => format!("{}{}", kind.id_prefix(), Uuid::new_v4().simple()).into(),
        };
        let label: Arc<str> = match label {
            Some(label) => label.into(),
            None => id.clone(),
        };
        let (sender, receiver) = unbounded_channel();
        let base = ConnectionBase {
            kind,
            id,
            peer,
            label,
            open: false,
            events: sender,
        };
        (base, ConnectionEvents::new(receiver))
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Delivers an event to whoever consumes this session's events. Events
    /// emitted after the consumer is gone are dropped.
    pub fn emit(&self, event: ConnectionEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) fn shared_id(&self) -> Arc<str> {
        self.id.clone()
    }

    pub(crate) fn event_sender(&self) -> UnboundedSender<ConnectionEvent> {
        self.events.clone()
    }
}

impl std::fmt::Debug for ConnectionBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBase")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("peer", &self.peer)
            .field("open", &self.open)
            .finish()
    }
}

/// Consuming half of a session's event channel.
#[derive(Debug)]
pub struct ConnectionEvents(Mutex<UnboundedReceiver<ConnectionEvent>>);

impl ConnectionEvents {
    fn new(receiver: UnboundedReceiver<ConnectionEvent>) -> Self {
        ConnectionEvents(Mutex::new(receiver))
    }

    /// Awaits the next event emitted by the session. Returns `None` once the
    /// session is gone and all buffered events have been consumed.
    pub async fn next(&self) -> Option<ConnectionEvent> {
        let mut guard = self.0.lock().await;
        guard.recv().await
    }
}

impl Stream for ConnectionEvents {
    type Item = ConnectionEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // exclusive access, the lock cannot be contended
        self.get_mut().0.get_mut().poll_recv(cx)
    }
}
