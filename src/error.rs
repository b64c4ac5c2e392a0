use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::fmt;

/// Errors surfaced by the broker and its transport adapters
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastError {
    /// The connection cannot carry a flushed event stream
    TransportUnsupported,
    /// The coordinating task has stopped
    BrokerClosed,
    /// An outbound message could not be encoded
    Encode(String),
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastError::TransportUnsupported => write!(f, "Streaming unsupported!"),
            BroadcastError::BrokerClosed => write!(f, "broker is not running"),
            BroadcastError::Encode(msg) => write!(f, "unable to encode data: {}", msg),
        }
    }
}

impl std::error::Error for BroadcastError {}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for BroadcastError {
    fn into_response(self) -> Response {
        let status = match self {
            BroadcastError::TransportUnsupported => StatusCode::INTERNAL_SERVER_ERROR,
            BroadcastError::BrokerClosed => StatusCode::SERVICE_UNAVAILABLE,
            BroadcastError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            BroadcastError::TransportUnsupported.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BroadcastError::BrokerClosed.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_transport_unsupported_message() {
        assert_eq!(
            BroadcastError::TransportUnsupported.to_string(),
            "Streaming unsupported!"
        );
    }
}
