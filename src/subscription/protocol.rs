use crate::error::BroadcastError;
use serde::Serialize;

/// Server → Client: periodic entity position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionUpdate {
    /// Identity whose entity moved (not necessarily the recipient's own)
    pub id: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub time: String,
    pub x: u32,
    pub y: u32,
}

impl PositionUpdate {
    pub fn new(id: impl Into<String>, time: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            id: id.into(),
            msg_type: "position".to_string(),
            time: time.into(),
            x,
            y,
        }
    }
}

/// Server → Client: connection identity announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionNotice {
    pub id: String,
}

/// Server → Client: subscriber count update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCount {
    #[serde(rename = "numClients")]
    pub num_clients: usize,
}

/// Server → Client: Error message
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: String) -> Self {
        Self {
            msg_type: "error".to_string(),
            error,
        }
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    event: &'a str,
    data: &'a T,
}

/// Everything a subscriber can receive, independent of transport framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Position(PositionUpdate),
    NewConnection(ConnectionNotice),
    NumClients(ClientCount),
    RemoveConnection(ConnectionNotice),
}

impl ServerMessage {
    pub fn new_connection(id: impl Into<String>) -> Self {
        ServerMessage::NewConnection(ConnectionNotice { id: id.into() })
    }

    pub fn remove_connection(id: impl Into<String>) -> Self {
        ServerMessage::RemoveConnection(ConnectionNotice { id: id.into() })
    }

    pub fn num_clients(num_clients: usize) -> Self {
        ServerMessage::NumClients(ClientCount { num_clients })
    }

    /// Named event for SSE framing. Position updates use the unnamed default
    /// event so browser `onmessage` handlers see them.
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            ServerMessage::Position(_) => None,
            ServerMessage::NewConnection(_) => Some("newConnection"),
            ServerMessage::NumClients(_) => Some("numClients"),
            ServerMessage::RemoveConnection(_) => Some("removeConnection"),
        }
    }

    /// Event tag used where every frame must be named (WebSocket envelopes)
    pub fn kind(&self) -> &'static str {
        self.event_name().unwrap_or("position")
    }

    /// JSON body of the message
    pub fn to_json(&self) -> Result<String, BroadcastError> {
        let encoded = match self {
            ServerMessage::Position(update) => serde_json::to_string(update),
            ServerMessage::NewConnection(notice) | ServerMessage::RemoveConnection(notice) => {
                serde_json::to_string(notice)
            }
            ServerMessage::NumClients(count) => serde_json::to_string(count),
        };
        encoded.map_err(|e| BroadcastError::Encode(e.to_string()))
    }

    /// WebSocket frame body: `{"event": <kind>, "data": {...}}`
    pub fn to_envelope_json(&self) -> Result<String, BroadcastError> {
        let event = self.kind();
        let encoded = match self {
            ServerMessage::Position(update) => serde_json::to_string(&Envelope { event, data: update }),
            ServerMessage::NewConnection(notice) | ServerMessage::RemoveConnection(notice) => {
                serde_json::to_string(&Envelope { event, data: notice })
            }
            ServerMessage::NumClients(count) => serde_json::to_string(&Envelope { event, data: count }),
        };
        encoded.map_err(|e| BroadcastError::Encode(e.to_string()))
    }
}
