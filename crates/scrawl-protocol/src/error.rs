//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed — a frame could not be turned into JSON text.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed — malformed JSON, an unknown `type` tag,
    /// or a missing required field.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
