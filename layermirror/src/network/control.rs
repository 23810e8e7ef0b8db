//! Control channel client with bounded retry.

use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use super::config::ControlSettings;
use super::error::NetworkError;
use super::protocol::{ControlRequest, COMMAND_PING, REPLY_OK};
use super::transport::{ControlConnection, ControlConnector};

/// Lifecycle of the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// A connection is open (or the last request was answered).
    Connected,
    /// The last request went unanswered; the next attempt opens a new connection.
    Reconnecting,
    /// Retries were exhausted. Terminal.
    Failed,
}

/// Why a single request attempt produced no reply.
enum AttemptFailure {
    TimedOut(Duration),
    Transport(NetworkError),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::TimedOut(limit) => {
                write!(f, "no reply within {}ms", limit.as_millis())
            }
            AttemptFailure::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl From<NetworkError> for AttemptFailure {
    fn from(e: NetworkError) -> Self {
        AttemptFailure::Transport(e)
    }
}

/// Request/reply client for the remote tool's control endpoint.
///
/// Owns the single control connection and replaces it after every
/// unanswered request. Once every attempt of a request goes unanswered the
/// client enters [`ControlState::Failed`] and rejects further requests.
pub struct ControlClient<C: ControlConnector> {
    connector: C,
    address: String,
    settings: ControlSettings,
    connection: Option<C::Connection>,
    state: ControlState,
}

impl<C: ControlConnector> ControlClient<C> {
    /// Open the first connection to `address`.
    ///
    /// The connect is bounded by the handshake timeout. A failed or timed
    /// out first connection is not an error here: the first request retries
    /// it as part of its normal attempt budget.
    pub async fn connect(
        connector: C,
        address: impl Into<String>,
        settings: ControlSettings,
    ) -> Self {
        let address = address.into();
        let limit = settings.handshake_timeout;
        let connected = tokio::time::timeout(limit, connector.connect(&address)).await;
        let (connection, state) = match connected {
            Ok(Ok(connection)) => {
                info!(address = %address, "Control socket connected");
                (Some(connection), ControlState::Connected)
            }
            Ok(Err(e)) => {
                warn!(address = %address, error = %e, "Control socket connect failed");
                (None, ControlState::Reconnecting)
            }
            Err(_) => {
                warn!(
                    address = %address,
                    timeout_ms = limit.as_millis() as u64,
                    "Control socket connect timed out"
                );
                (None, ControlState::Reconnecting)
            }
        };

        Self {
            connector,
            address,
            settings,
            connection,
            state,
        }
    }

    /// Address of the remote control endpoint.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    /// Register `notify_address` with the remote tool.
    ///
    /// Any reply other than `ok` is a protocol error and is not retried.
    pub async fn handshake(&mut self, notify_address: &str) -> Result<(), NetworkError> {
        info!(notify_address, "Sending connect command");
        let request = ControlRequest::Handshake {
            notify_address: notify_address.to_string(),
        };
        let timeout = Some(self.settings.handshake_timeout);
        let reply = self
            .try_request(&request, self.settings.max_retries, timeout)
            .await?;

        let reply = String::from_utf8_lossy(&reply);
        if reply != REPLY_OK {
            return Err(NetworkError::HandshakeRejected(reply.into_owned()));
        }

        info!("Handshake accepted");
        Ok(())
    }

    /// Ask the remote tool to re-emit its full stage on the notify channel.
    ///
    /// Waits without a timeout for each attempt. The reply is discarded.
    pub async fn request_stage(&mut self) -> Result<(), NetworkError> {
        let reply = self
            .try_request(&ControlRequest::StageRequest, self.settings.max_retries, None)
            .await?;
        debug!(reply_bytes = reply.len(), "Stage requested");
        Ok(())
    }

    /// Check that the remote tool answers; returns the round trip time.
    pub async fn ping(&mut self) -> Result<Duration, NetworkError> {
        let started = Instant::now();
        let timeout = Some(self.settings.handshake_timeout);
        let reply = self
            .try_request(&ControlRequest::Ping, self.settings.max_retries, timeout)
            .await?;

        if reply.as_ref() != COMMAND_PING.as_bytes() {
            return Err(NetworkError::UnexpectedReply {
                request: COMMAND_PING,
                reply: String::from_utf8_lossy(&reply).into_owned(),
            });
        }
        Ok(started.elapsed())
    }

    /// Tell the remote tool to stop notifying. Single attempt.
    pub async fn disconnect(&mut self) -> Result<(), NetworkError> {
        let request = ControlRequest::Disconnect;
        let timeout = Some(self.settings.handshake_timeout);
        let reply = self.try_request(&request, 1, timeout).await?;

        if reply.as_ref() != REPLY_OK.as_bytes() {
            return Err(NetworkError::UnexpectedReply {
                request: request.name(),
                reply: String::from_utf8_lossy(&reply).into_owned(),
            });
        }
        info!("Disconnected from remote tool");
        Ok(())
    }

    /// Send `request` up to `max_retries` times until a reply arrives.
    ///
    /// Each attempt waits up to `timeout` (forever when `None`). An
    /// unanswered attempt closes the connection; the next attempt opens a
    /// new one to the same address. When the last attempt goes unanswered
    /// the channel fails permanently with [`NetworkError::RemoteOffline`].
    pub async fn try_request(
        &mut self,
        request: &ControlRequest,
        max_retries: u32,
        timeout: Option<Duration>,
    ) -> Result<Bytes, NetworkError> {
        if self.state == ControlState::Failed {
            return Err(NetworkError::ChannelFailed);
        }

        for attempt in 1..=max_retries {
            debug!(request = request.name(), attempt, "Sending control request");

            match self.attempt(request, timeout).await {
                Ok(reply) => {
                    self.state = ControlState::Connected;
                    return Ok(reply);
                }
                Err(failure) => {
                    // Dropping the connection closes it without linger.
                    self.connection = None;
                    self.state = ControlState::Reconnecting;

                    if attempt < max_retries {
                        warn!(
                            request = request.name(),
                            attempt,
                            max_retries,
                            reason = %failure,
                            "No response from remote tool, retrying"
                        );
                    } else {
                        warn!(
                            request = request.name(),
                            attempt,
                            reason = %failure,
                            "No response from remote tool"
                        );
                    }
                }
            }
        }

        self.state = ControlState::Failed;
        error!(
            address = %self.address,
            request = request.name(),
            attempts = max_retries,
            "Remote tool is offline"
        );
        Err(NetworkError::RemoteOffline {
            request: request.name(),
            attempts: max_retries,
        })
    }

    /// One attempt: connect if needed, send, wait for the reply.
    ///
    /// With a `timeout` the whole attempt, connect included, is bounded by
    /// it. Without one only the connect is bounded (by the handshake
    /// timeout) and the reply is awaited indefinitely.
    async fn attempt(
        &mut self,
        request: &ControlRequest,
        timeout: Option<Duration>,
    ) -> Result<Bytes, AttemptFailure> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request, limit))
                .await
                .map_err(|_| AttemptFailure::TimedOut(limit))?,
            None => {
                let connect_limit = self.settings.handshake_timeout;
                self.exchange(request, connect_limit).await
            }
        }
    }

    async fn exchange(
        &mut self,
        request: &ControlRequest,
        connect_limit: Duration,
    ) -> Result<Bytes, AttemptFailure> {
        if self.connection.is_none() {
            let connection =
                tokio::time::timeout(connect_limit, self.connector.connect(&self.address))
                    .await
                    .map_err(|_| AttemptFailure::TimedOut(connect_limit))??;
            debug!(address = %self.address, "Control socket reconnected");
            self.connection = Some(connection);
        }
        let Some(connection) = self.connection.as_mut() else {
            return Err(AttemptFailure::Transport(NetworkError::ChannelFailed));
        };

        connection.send(request.frames()).await?;
        Ok(connection.recv().await?)
    }
}
