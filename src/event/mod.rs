use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// TickEvent triggers one broadcast round.
///
/// The payload is opaque to the broker; it is copied verbatim into the `time`
/// field of every position update produced by the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    pub payload: String,
}

impl TickEvent {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Tick stamped with the current UTC time (RFC 3339, millisecond precision)
    pub fn now() -> Self {
        Self::new(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
