use crate::connection::{ConnectionBase, ConnectionEvent, ConnectionEvents, ConnectionKind};
use crate::negotiator::{MediaStream, Negotiator, SessionDescriptor, SignalingMessage};
use arc_swap::ArcSwapOption;
use log::{debug, warn};
use std::collections::VecDeque;
use std::fmt::Formatter;
use std::sync::Arc;
use webrtc::peer_connection::configuration::RTCConfiguration;

/// Options accepted by [MediaConnection::new].
#[derive(Default)]
pub struct MediaConnectionOptions {
    /// Explicit correlation id, generated when absent.
    pub connection_id: Option<String>,
    /// Human-readable tag, defaults to the connection id.
    pub label: Option<String>,
    /// Transport configuration handed to the negotiation engine as-is.
    pub pc_config: RTCConfiguration,
    /// Local outbound media. Supplying it makes this side the initiator and
    /// starts negotiation right away.
    pub stream: Option<MediaStream>,
    /// Messages addressed to this session that arrived before it existed.
    pub queued_messages: Vec<SignalingMessage>,
    /// The offer message that triggered creating this session, when it was
    /// opened by the remote peer.
    pub payload: Option<SignalingMessage>,
}

/// One media exchange with a specific remote peer.
///
/// Created by the owning connection registry either with a local stream
/// (caller side, negotiation starts immediately) or with a held remote offer
/// (callee side, negotiation starts once [MediaConnection::answer] provides
/// a stream). Signaling messages that arrive before the negotiation engine
/// has been started are buffered and replayed to it in arrival order.
pub struct MediaConnection {
    base: ConnectionBase,
    negotiator: Arc<dyn Negotiator>,
    pc_config: RTCConfiguration,
    local_stream: Option<MediaStream>,
    remote_stream: Arc<ArcSwapOption<MediaStream>>,
    pending_messages: VecDeque<SignalingMessage>,
    pending_offer: Option<SignalingMessage>,
    negotiation_ready: bool,
    events: ConnectionEvents,
}

impl MediaConnection {
    pub fn new(
        remote_peer: impl Into<Arc<str>>,
        negotiator: Arc<dyn Negotiator>,
        options: MediaConnectionOptions,
    ) -> Self {
        let MediaConnectionOptions {
            connection_id,
            label,
            pc_config,
            stream,
            queued_messages,
            payload,
        } = options;
        let (base, events) =
            ConnectionBase::new(ConnectionKind::Media, remote_peer.into(), connection_id, label);
        let mut conn = MediaConnection {
            base,
            negotiator,
            pc_config,
            local_stream: stream,
            remote_stream: Arc::new(ArcSwapOption::empty()),
            pending_messages: VecDeque::from(queued_messages),
            pending_offer: payload,
            negotiation_ready: false,
            events,
        };

        // Install the subscriptions before negotiation can start, so an
        // engine that signals early cannot slip past the session.
        conn.subscribe_remote_stream();
        conn.subscribe_errors();

        if let Some(stream) = conn.local_stream.clone() {
            conn.start_negotiation(SessionDescriptor {
                kind: ConnectionKind::Media,
                stream,
                originator: true,
                offer: None,
            });
            conn.base.set_open(true);
        }
        conn
    }

    /// Provides the local stream for a remote-initiated call, producing the
    /// answer. When a local stream is already attached, or no remote offer is
    /// held, the call is ignored with a warning and leaves the session
    /// untouched.
    pub fn answer(&mut self, stream: MediaStream) {
        if self.local_stream.is_some() {
            warn!(
                "connection {}: local stream already exists, answering a call twice?",
                self.base.id()
            );
            return;
        }
        let offer = match self.pending_offer.take() {
            Some(offer) => offer,
            None => {
                warn!("connection {}: no held offer to answer", self.base.id());
                return;
            }
        };

        self.local_stream = Some(stream.clone());
        self.start_negotiation(SessionDescriptor {
            kind: ConnectionKind::Media,
            stream,
            originator: false,
            offer: Some(offer),
        });
        self.base.set_open(true);
    }

    /// Routes a signaling message to the negotiation engine, buffering it
    /// while the engine has not been started yet.
    pub fn handle_message(&mut self, message: SignalingMessage) {
        if self.negotiation_ready {
            self.negotiator.handle_message(message);
        } else {
            self.pending_messages.push_back(message);
        }
    }

    /// Marks the session closed and notifies listeners. Repeated calls are
    /// no-ops; actual transport teardown belongs to the owning registry.
    pub fn close(&mut self) {
        if !self.base.is_open() {
            return;
        }
        self.base.set_open(false);
        self.base.emit(ConnectionEvent::Close);
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    pub fn peer(&self) -> &str {
        self.base.peer()
    }

    pub fn label(&self) -> &str {
        self.base.label()
    }

    pub fn kind(&self) -> ConnectionKind {
        self.base.kind()
    }

    pub fn is_open(&self) -> bool {
        self.base.is_open()
    }

    /// True once the negotiation engine has been started for this session.
    pub fn negotiation_started(&self) -> bool {
        self.negotiation_ready
    }

    pub fn local_stream(&self) -> Option<&MediaStream> {
        self.local_stream.as_ref()
    }

    /// Remote media, absent until the negotiation engine reports arrival.
    pub fn remote_stream(&self) -> Option<MediaStream> {
        self.remote_stream.load_full().map(|s| (*s).clone())
    }

    /// Events emitted by this session.
    pub fn events(&self) -> &ConnectionEvents {
        &self.events
    }

    /// Starts the engine exactly once and drains the messages buffered so
    /// far, in arrival order.
    fn start_negotiation(&mut self, descriptor: SessionDescriptor) {
        self.negotiator
            .start_connection(descriptor, self.pc_config.clone());
        self.negotiation_ready = true;
        for message in self.pending_messages.drain(..) {
            self.negotiator.handle_message(message);
        }
    }

    fn subscribe_remote_stream(&self) {
        let remote = Arc::downgrade(&self.remote_stream);
        let events = self.base.event_sender();
        let id = self.base.shared_id();
        self.negotiator.on_remote_stream(Box::new(move |stream| {
            if let Some(remote) = remote.upgrade() {
                // first arrival wins
                let previous = remote.rcu(|current| match current {
                    Some(_) => current.clone(),
                    None => Some(Arc::new(stream.clone())),
                });
                if previous.is_some() {
                    warn!(
                        "connection {}: remote stream arrived twice, keeping the first one",
                        id
                    );
                } else {
                    debug!("connection {}: receiving remote stream {}", id, stream.id());
                    let _ = events.send(ConnectionEvent::Stream(stream));
                }
            }
        }));
    }

    fn subscribe_errors(&self) {
        let events = self.base.event_sender();
        let id = self.base.shared_id();
        self.negotiator.on_error(Box::new(move |error| {
            warn!("connection {}: negotiation engine failed: {}", id, error);
            let _ = events.send(ConnectionEvent::Error(error));
        }));
    }
}

impl std::fmt::Debug for MediaConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConnection")
            .field("id", &self.base.id())
            .field("peer", &self.base.peer())
            .field("open", &self.base.is_open())
            .field("negotiation_ready", &self.negotiation_ready)
            .finish()
    }
}
