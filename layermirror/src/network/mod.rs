//! Control and notification channels to the remote authoring tool.
//!
//! # Architecture
//!
//! ```text
//! ControlClient ──(REQ: connect / getStage / ping / disconnect)──► remote tool
//!      │
//!      └── ControlConnector trait → ZmqControlConnector (zeromq ReqSocket)
//!
//! remote tool ──(PUSH: layer / layerRemove)──► NotifySource trait
//!                                                  └── ZmqNotifySource (zeromq PullSocket)
//! ```
//!
//! The control channel is used at startup (handshake, initial stage pull)
//! and on shutdown. It retries a bounded number of times, replacing the
//! underlying connection after every unanswered request, and fails
//! permanently once the retries run out. The notify channel is bound once
//! to an ephemeral local port whose address is advertised in the handshake.

mod config;
mod control;
mod error;
mod protocol;
mod transport;
pub mod zmq;

pub use config::{
    ControlSettings, DEFAULT_HANDSHAKE_TIMEOUT_MS, DEFAULT_MAX_RETRIES, DEFAULT_NOTIFY_BIND,
};
pub use control::{ControlClient, ControlState};
pub use error::NetworkError;
pub use protocol::{
    ControlRequest, NotifyMessage, COMMAND_CONNECT, COMMAND_DISCONNECT, COMMAND_GET_STAGE,
    COMMAND_LAYER, COMMAND_LAYER_REMOVE, COMMAND_PING, REPLY_OK,
};
pub use transport::{ControlConnection, ControlConnector, NotifySource, PollMode};
