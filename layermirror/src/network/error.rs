//! Error types for the control and notify channels.

use thiserror::Error;

/// Errors raised by the network layer.
///
/// `RemoteOffline`, `HandshakeRejected` and `ChannelFailed` are fatal for the
/// viewer process; the remaining variants describe a single failed operation.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Failed to bind the local notify endpoint.
    #[error("Failed to bind notify endpoint {address}: {reason}")]
    Bind { address: String, reason: String },

    /// Failed to open a control connection.
    #[error("Failed to connect to control endpoint {address}: {reason}")]
    Connect { address: String, reason: String },

    /// Failed to send a request frame.
    #[error("Failed to send request: {0}")]
    Send(String),

    /// Failed to receive from a socket.
    #[error("Failed to receive message: {0}")]
    Receive(String),

    /// No reply after every allowed attempt; the remote tool is offline.
    #[error("Remote tool is offline: no reply to '{request}' after {attempts} attempt(s)")]
    RemoteOffline { request: &'static str, attempts: u32 },

    /// The remote tool answered the handshake with something other than `ok`.
    #[error("Handshake rejected by remote tool: {0}")]
    HandshakeRejected(String),

    /// A reply that does not match the request.
    #[error("Unexpected reply to '{request}': {reply}")]
    UnexpectedReply { request: &'static str, reply: String },

    /// The control channel already failed permanently.
    #[error("Control channel has failed permanently")]
    ChannelFailed,
}

impl NetworkError {
    /// Whether this error means the remote tool can no longer be reached.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NetworkError::RemoteOffline { .. }
                | NetworkError::HandshakeRejected(_)
                | NetworkError::ChannelFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(NetworkError::RemoteOffline {
            request: "connect",
            attempts: 3
        }
        .is_fatal());
        assert!(NetworkError::HandshakeRejected("fail".into()).is_fatal());
        assert!(NetworkError::ChannelFailed.is_fatal());
        assert!(!NetworkError::Send("broken pipe".into()).is_fatal());
    }

    #[test]
    fn test_remote_offline_message() {
        let error = NetworkError::RemoteOffline {
            request: "getStage",
            attempts: 3,
        };
        assert_eq!(
            error.to_string(),
            "Remote tool is offline: no reply to 'getStage' after 3 attempt(s)"
        );
    }
}
