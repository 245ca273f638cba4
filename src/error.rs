use std::sync::Arc;
use thiserror::Error as ThisError;

/// Error surfaced to session listeners through the event channel.
///
/// Cloneable so a single failure can be handed to every observer.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// Failure reported by the underlying transport stack.
    #[error(transparent)]
    Transport(Arc<webrtc::Error>),
    /// Negotiation broke down before the session became usable.
    #[error("negotiation failed: {0}")]
    Negotiation(Arc<str>),
}

impl Error {
    pub fn negotiation(reason: impl Into<Arc<str>>) -> Self {
        Error::Negotiation(reason.into())
    }
}

impl From<webrtc::Error> for Error {
    fn from(value: webrtc::Error) -> Self {
        Error::Transport(Arc::new(value))
    }
}
