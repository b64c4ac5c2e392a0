// Subscriber side: outbound protocol, queues and the WebSocket connection loop

pub mod manager;
pub mod protocol;
mod subscriber;

pub use manager::ConnectionManager;
pub use protocol::{ClientCount, ConnectionNotice, ErrorMessage, PositionUpdate, ServerMessage};
pub use subscriber::Subscription;
