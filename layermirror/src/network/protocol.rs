//! Wire vocabulary shared with the remote authoring tool.
//!
//! Every message is a sequence of frames. Control requests are answered by a
//! single frame; notifications are one-directional.

use bytes::Bytes;

/// Handshake command; second frame carries the notify endpoint address.
pub const COMMAND_CONNECT: &str = "connect";
/// Ask the remote tool to re-emit its whole stage as notifications.
pub const COMMAND_GET_STAGE: &str = "getStage";
/// Liveness check; the remote tool echoes it back.
pub const COMMAND_PING: &str = "ping";
/// Stop notifications to the advertised endpoint.
pub const COMMAND_DISCONNECT: &str = "disconnect";
/// Notification: add or replace a layer (command, path, payload).
pub const COMMAND_LAYER: &str = "layer";
/// Notification: remove a layer (command, path).
pub const COMMAND_LAYER_REMOVE: &str = "layerRemove";
/// Success reply token.
pub const REPLY_OK: &str = "ok";

/// A request sent on the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Register the notify endpoint with the remote tool.
    Handshake { notify_address: String },
    /// Request a full stage burst.
    StageRequest,
    Ping,
    Disconnect,
}

impl ControlRequest {
    /// Command token of this request.
    pub fn name(&self) -> &'static str {
        match self {
            ControlRequest::Handshake { .. } => COMMAND_CONNECT,
            ControlRequest::StageRequest => COMMAND_GET_STAGE,
            ControlRequest::Ping => COMMAND_PING,
            ControlRequest::Disconnect => COMMAND_DISCONNECT,
        }
    }

    /// Frames that make up this request on the wire.
    pub fn frames(&self) -> Vec<Bytes> {
        let command = Bytes::from_static(self.name().as_bytes());
        match self {
            ControlRequest::Handshake { notify_address } => {
                vec![command, Bytes::from(notify_address.clone())]
            }
            ControlRequest::StageRequest | ControlRequest::Ping | ControlRequest::Disconnect => {
                vec![command]
            }
        }
    }
}

/// An inbound notification, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyMessage {
    /// Add or replace the layer at `path`.
    Layer { path: String, payload: Bytes },

    /// Remove the layer at `path`.
    LayerRemove { path: String },

    /// A known command with the wrong number of frames, or frames that are
    /// not valid UTF-8 where text is expected. Dropped.
    Malformed { command: String, parts: usize },

    /// A command token this viewer does not handle. Dropped.
    Unknown { command: String },
}

impl NotifyMessage {
    /// Classify a multi-part message received on the notify channel.
    pub fn parse(frames: Vec<Bytes>) -> Self {
        let parts = frames.len();
        let mut frames = frames.into_iter();

        let Some(command) = frames.next() else {
            return NotifyMessage::Malformed {
                command: String::new(),
                parts,
            };
        };
        let command = match std::str::from_utf8(&command) {
            Ok(command) => command.to_string(),
            Err(_) => {
                return NotifyMessage::Malformed {
                    command: String::from_utf8_lossy(&command).into_owned(),
                    parts,
                }
            }
        };

        let expected_parts = match command.as_str() {
            COMMAND_LAYER => 3,
            COMMAND_LAYER_REMOVE => 2,
            _ => return NotifyMessage::Unknown { command },
        };
        if parts != expected_parts {
            return NotifyMessage::Malformed { command, parts };
        }

        let path = frames
            .next()
            .and_then(|path| String::from_utf8(path.to_vec()).ok());
        let Some(path) = path else {
            return NotifyMessage::Malformed { command, parts };
        };

        match frames.next() {
            Some(payload) => NotifyMessage::Layer { path, payload },
            None => NotifyMessage::LayerRemove { path },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(parts: &[&'static [u8]]) -> Vec<Bytes> {
        parts.iter().map(|p| Bytes::from_static(p)).collect()
    }

    #[test]
    fn test_handshake_frames() {
        let request = ControlRequest::Handshake {
            notify_address: "tcp://127.0.0.1:5000".to_string(),
        };
        assert_eq!(request.name(), "connect");
        assert_eq!(
            request.frames(),
            frames(&[b"connect", b"tcp://127.0.0.1:5000"])
        );
    }

    #[test]
    fn test_single_frame_requests() {
        assert_eq!(ControlRequest::StageRequest.frames(), frames(&[b"getStage"]));
        assert_eq!(ControlRequest::Ping.frames(), frames(&[b"ping"]));
        assert_eq!(ControlRequest::Disconnect.frames(), frames(&[b"disconnect"]));
    }

    #[test]
    fn test_parse_layer() {
        let message = NotifyMessage::parse(frames(&[b"layer", b"/a", b"X"]));
        assert_eq!(
            message,
            NotifyMessage::Layer {
                path: "/a".to_string(),
                payload: Bytes::from_static(b"X"),
            }
        );
    }

    #[test]
    fn test_parse_layer_with_binary_payload() {
        let message = NotifyMessage::parse(frames(&[b"layer", b"/bin", &[0xff, 0x00, 0xfe]]));
        assert_eq!(
            message,
            NotifyMessage::Layer {
                path: "/bin".to_string(),
                payload: Bytes::from_static(&[0xff, 0x00, 0xfe]),
            }
        );
    }

    #[test]
    fn test_parse_layer_remove() {
        let message = NotifyMessage::parse(frames(&[b"layerRemove", b"/a"]));
        assert_eq!(
            message,
            NotifyMessage::LayerRemove {
                path: "/a".to_string()
            }
        );
    }

    #[test]
    fn test_parse_layer_missing_payload_is_malformed() {
        let message = NotifyMessage::parse(frames(&[b"layer", b"/a"]));
        assert_eq!(
            message,
            NotifyMessage::Malformed {
                command: "layer".to_string(),
                parts: 2
            }
        );
    }

    #[test]
    fn test_parse_layer_extra_frame_is_malformed() {
        let message = NotifyMessage::parse(frames(&[b"layer", b"/a", b"X", b"Y"]));
        assert!(matches!(message, NotifyMessage::Malformed { parts: 4, .. }));
    }

    #[test]
    fn test_parse_layer_remove_extra_frame_is_malformed() {
        let message = NotifyMessage::parse(frames(&[b"layerRemove", b"/a", b"X"]));
        assert!(matches!(message, NotifyMessage::Malformed { parts: 3, .. }));
    }

    #[test]
    fn test_parse_empty_message_is_malformed() {
        let message = NotifyMessage::parse(Vec::new());
        assert!(matches!(message, NotifyMessage::Malformed { parts: 0, .. }));
    }

    #[test]
    fn test_parse_non_utf8_path_is_malformed() {
        let message = NotifyMessage::parse(frames(&[b"layerRemove", &[0xc3, 0x28]]));
        assert!(matches!(message, NotifyMessage::Malformed { .. }));
    }

    #[test]
    fn test_parse_non_utf8_command_is_malformed() {
        let message = NotifyMessage::parse(frames(&[&[0xff], b"/a"]));
        assert!(matches!(message, NotifyMessage::Malformed { parts: 2, .. }));
    }

    #[test]
    fn test_parse_unknown_command() {
        let message = NotifyMessage::parse(frames(&[b"shutdown", b"/a"]));
        assert_eq!(
            message,
            NotifyMessage::Unknown {
                command: "shutdown".to_string()
            }
        );
    }
}
