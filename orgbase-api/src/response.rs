/// Success envelope for API responses
///
/// Every successful response uses the same JSON shape:
/// `{"status": "success", "message": ..., "data": ...}` with `data` omitted
/// when an operation has nothing to return. Handlers build this value and
/// return it with their status code; together with `ApiError` it forms the
/// single boundary between domain results and the wire.

use serde::Serialize;

/// Success response envelope
#[derive(Debug, Serialize)]
pub struct Success<T> {
    /// Always "success"
    pub status: &'static str,

    /// Human-readable outcome description
    pub message: String,

    /// Operation payload, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Success<T> {
    /// Envelope with a payload
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Success<()> {
    /// Envelope with no payload
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}
