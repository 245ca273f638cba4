//! `peer-media` implements the media-session half of a peer-to-peer signaling
//! library:
//! - A [MediaConnection] represents one media exchange with a remote peer,
//!   on either the calling or the answering side.
//! - Negotiation sequencing is handled for you: messages that arrive before
//!   the underlying engine exists are buffered and replayed in order once it
//!   starts.
//! - Transport-level setup (ICE/SDP) is delegated to a [Negotiator]
//!   implementation, so the session logic stays independent of the actual
//!   transport stack.
//!
//! Media stream handles are opaque here: capture and rendering belong to the
//! application, the session only carries the handles between the peers.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use peer_media::{
//!     ErrorCallback, MediaConnection, MediaConnectionOptions, MediaStream, Negotiator,
//!     RemoteStreamCallback, SessionDescriptor, SignalingMessage,
//! };
//! use webrtc::peer_connection::configuration::RTCConfiguration;
//!
//! // Stand-in for the transport stack; a real implementation would drive an
//! // RTCPeerConnection and fire the callback when remote tracks show up.
//! struct LoopbackNegotiator;
//!
//! impl Negotiator for LoopbackNegotiator {
//!     fn start_connection(&self, descriptor: SessionDescriptor, _config: RTCConfiguration) {
//!         assert!(descriptor.originator);
//!     }
//!     fn handle_message(&self, _message: SignalingMessage) {}
//!     fn on_remote_stream(&self, _callback: RemoteStreamCallback) {}
//!     fn on_error(&self, _callback: ErrorCallback) {}
//! }
//!
//! let negotiator = Arc::new(LoopbackNegotiator);
//! let options = MediaConnectionOptions {
//!     stream: Some(MediaStream::new("camera")),
//!     ..Default::default()
//! };
//!
//! // Supplying a stream makes this side the caller: negotiation starts
//! // immediately and the session is considered open.
//! let call = MediaConnection::new("remote-peer", negotiator, options);
//! assert!(call.is_open());
//! assert!(call.negotiation_started());
//! ```

pub mod connection;
pub mod error;
pub mod media_connection;
pub mod negotiator;

pub use connection::{ConnectionBase, ConnectionEvent, ConnectionEvents, ConnectionKind};
pub use error::Error;
pub use media_connection::{MediaConnection, MediaConnectionOptions};
pub use negotiator::{
    ErrorCallback, MediaStream, Negotiator, RemoteStreamCallback, SessionDescriptor,
    SignalingMessage,
};
