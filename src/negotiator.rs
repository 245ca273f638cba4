use crate::connection::ConnectionKind;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use webrtc::peer_connection::configuration::RTCConfiguration;

/// Opaque handle to a media stream. Capture and rendering live elsewhere;
/// the signaling layer only passes the handle around by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaStream {
    id: Arc<str>,
}

impl MediaStream {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        MediaStream { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Signaling message ferried between peers. Its contents are opaque to the
/// session and handed to the negotiation engine verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalingMessage(pub serde_json::Value);

/// Everything the negotiation engine needs to set up one transport leg.
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    pub kind: ConnectionKind,
    /// Local outbound media offered to the remote peer.
    pub stream: MediaStream,
    /// True when this side opens the exchange.
    pub originator: bool,
    /// Remote offer to respond to, absent on the originator side.
    pub offer: Option<SignalingMessage>,
}

/// Callback invoked by the engine when remote media arrives.
pub type RemoteStreamCallback = Box<dyn Fn(MediaStream) + Send + Sync>;

/// Callback invoked by the engine when negotiation fails.
pub type ErrorCallback = Box<dyn Fn(Error) + Send + Sync>;

/// Connection setup engine driving transport negotiation (ICE/SDP) on behalf
/// of a session.
///
/// Implementations wrap the actual transport stack. A session starts the
/// engine at most once, feeds it the signaling messages addressed to it and
/// listens for the remote peer's media. Transport and codec failures are the
/// engine's to surface; the session only reacts to the notifications it
/// subscribes to here.
pub trait Negotiator: Send + Sync {
    /// Kicks off transport negotiation for the described session. Called at
    /// most once per session.
    fn start_connection(&self, descriptor: SessionDescriptor, config: RTCConfiguration);

    /// Forwards a signaling message received from the remote peer.
    fn handle_message(&self, message: SignalingMessage);

    /// Registers the callback fired when the remote peer's media arrives.
    /// The notification may come at an arbitrary point after negotiation
    /// started, including never.
    fn on_remote_stream(&self, callback: RemoteStreamCallback);

    /// Registers the callback fired when transport negotiation fails.
    fn on_error(&self, callback: ErrorCallback);
}
