//! ZeroMQ transports built on the pure-Rust `zeromq` crate.
//!
//! The control channel is a REQ socket per connection; the notify channel
//! is a PULL socket bound once for the lifetime of the process.

use std::time::Duration;

use bytes::Bytes;
use tracing::info;
use zeromq::{PullSocket, ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use super::error::NetworkError;
use super::transport::{ControlConnection, ControlConnector, NotifySource, PollMode};

/// Opens REQ sockets to the remote control endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZmqControlConnector;

/// A connected REQ socket.
pub struct ZmqControlConnection {
    socket: ReqSocket,
}

impl ControlConnector for ZmqControlConnector {
    type Connection = ZmqControlConnection;

    async fn connect(&self, address: &str) -> Result<ZmqControlConnection, NetworkError> {
        let mut socket = ReqSocket::new();
        socket
            .connect(address)
            .await
            .map_err(|e| NetworkError::Connect {
                address: address.to_string(),
                reason: e.to_string(),
            })?;
        Ok(ZmqControlConnection { socket })
    }
}

impl ControlConnection for ZmqControlConnection {
    async fn send(&mut self, frames: Vec<Bytes>) -> Result<(), NetworkError> {
        let message = ZmqMessage::try_from(frames).map_err(|e| NetworkError::Send(e.to_string()))?;
        self.socket
            .send(message)
            .await
            .map_err(|e| NetworkError::Send(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Bytes, NetworkError> {
        let message = self
            .socket
            .recv()
            .await
            .map_err(|e| NetworkError::Receive(e.to_string()))?;
        message
            .into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| NetworkError::Receive("empty reply".to_string()))
    }
}

/// PULL socket the remote tool pushes layer notifications to.
pub struct ZmqNotifySource {
    socket: PullSocket,
    endpoint: String,
}

impl ZmqNotifySource {
    /// Bind to `address` (use port 0 for an ephemeral port).
    ///
    /// The resolved endpoint, including the chosen port, is available from
    /// [`NotifySource::endpoint`].
    pub async fn bind(address: &str) -> Result<Self, NetworkError> {
        let mut socket = PullSocket::new();
        let endpoint = socket.bind(address).await.map_err(|e| NetworkError::Bind {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        let endpoint = endpoint.to_string();

        info!(endpoint = %endpoint, "Notify socket bound");
        Ok(Self { socket, endpoint })
    }
}

impl NotifySource for ZmqNotifySource {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn receive(&mut self, mode: PollMode) -> Result<Option<Vec<Bytes>>, NetworkError> {
        let received = match mode {
            PollMode::Wait => self.socket.recv().await,
            // A zero timeout still polls the receive once, so a message that
            // is already queued is returned.
            PollMode::Immediate => {
                match tokio::time::timeout(Duration::ZERO, self.socket.recv()).await {
                    Ok(received) => received,
                    Err(_) => return Ok(None),
                }
            }
        };

        let message = received.map_err(|e| NetworkError::Receive(e.to_string()))?;
        Ok(Some(message.into_vec()))
    }
}
