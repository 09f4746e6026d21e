//! Unified error type for the server crate.

use kondeck_protocol::ProtocolError;
use kondeck_session::SessionError;
use kondeck_transport::TransportError;

/// Top-level error wrapping the layer-specific ones, so callers of the
/// server crate deal with a single type and `?` converts automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (hub unavailable).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Transport(_)));
        assert!(server_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Unavailable;
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Session(_)));
    }
}
