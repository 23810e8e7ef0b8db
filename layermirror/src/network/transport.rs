//! Transport seams for the control and notify channels.
//!
//! The control client and the reconciliation loop only see these traits, so
//! the retry policy and the drain/rebuild batching can be exercised with
//! in-memory transports. [`super::zmq`] provides the production ones.

use std::future::Future;

use bytes::Bytes;

use super::error::NetworkError;

/// How long a notify poll may wait for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Wait until a message arrives.
    Wait,
    /// Take a message only if one is already available.
    Immediate,
}

/// One request/reply connection to the remote control endpoint.
///
/// Dropping the connection closes it without lingering on unsent data.
pub trait ControlConnection: Send {
    /// Send a request made of `frames`.
    fn send(&mut self, frames: Vec<Bytes>)
        -> impl Future<Output = Result<(), NetworkError>> + Send;

    /// Wait for the reply to the last request. Returns its first frame.
    fn recv(&mut self) -> impl Future<Output = Result<Bytes, NetworkError>> + Send;
}

/// Opens control connections to a fixed address.
pub trait ControlConnector: Send + Sync {
    type Connection: ControlConnection;

    fn connect(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Self::Connection, NetworkError>> + Send;
}

/// The inbound endpoint the remote tool pushes notifications to.
pub trait NotifySource: Send {
    /// Bound address, advertised to the remote tool in the handshake.
    fn endpoint(&self) -> &str;

    /// Receive one complete multi-part message.
    ///
    /// Returns `Ok(None)` when `mode` is [`PollMode::Immediate`] and nothing
    /// is pending.
    fn receive(
        &mut self,
        mode: PollMode,
    ) -> impl Future<Output = Result<Option<Vec<Bytes>>, NetworkError>> + Send;
}
