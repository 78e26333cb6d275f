//! JSON codec for [`Frame`]s.
//!
//! The wire format is JSON text (one frame per websocket text message),
//! so encoding produces a `String` rather than bytes. Frames that need
//! to be relayed verbatim (chat, draw data) are forwarded as the original
//! text without a decode/encode round trip; this codec covers everything
//! the server authors itself.

use crate::{Frame, ProtocolError};

/// Encodes and decodes [`Frame`]s as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Serializes a frame to its wire form.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self, frame: &Frame) -> Result<String, ProtocolError> {
        serde_json::to_string(frame).map_err(ProtocolError::Encode)
    }

    /// Parses one wire message into a frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the text is malformed, the
    /// `type` tag is unknown, or a required field is missing.
    pub fn decode(&self, text: &str) -> Result<Frame, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
