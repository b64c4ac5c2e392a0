use crate::subscription::protocol::{ErrorMessage, ServerMessage};
use crate::subscription::Subscription;
use axum::extract::ws::{Message, WebSocket};
use tracing::{error, info, warn};

/// Drives one WebSocket connection: forwards broker messages, watches for close
pub struct ConnectionManager {
    subscription: Subscription,
}

impl ConnectionManager {
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Handle WebSocket connection lifecycle.
    ///
    /// Returns when the peer closes, the socket errors, or the broker ends the
    /// subscription. Dropping `self` afterwards unregisters the subscriber.
    pub async fn handle(mut self, mut socket: WebSocket) {
        let connection_id = self.subscription.id().to_string();
        info!(connection_id = %connection_id, "WebSocket connection established");

        loop {
            tokio::select! {
                // Client frames only matter for liveness
                incoming = socket.recv() => {
                    match incoming {
                        Some(Ok(Message::Close(_))) | None => {
                            info!(connection_id = %connection_id, "WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore text, binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                outgoing = self.subscription.next() => {
                    match outgoing {
                        Some(message) => {
                            if let Err(e) = send_message(&mut socket, &message).await {
                                error!(connection_id = %connection_id, error = %e, "Failed to send update");
                                break;
                            }
                        }
                        None => {
                            warn!(connection_id = %connection_id, "Subscription ended by broker");
                            break;
                        }
                    }
                }
            }
        }

        info!(connection_id = %connection_id, "WebSocket connection closed");
    }
}

/// Send one message. Encoding failures are reported to the client as an
/// error frame and do not end the connection.
async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> anyhow::Result<()> {
    let text = match message.to_envelope_json() {
        Ok(json) => json,
        Err(e) => {
            error!(kind = message.kind(), error = %e, "Unable to encode message");
            serde_json::to_string(&ErrorMessage::new(e.to_string()))?
        }
    };
    socket.send(Message::Text(text)).await?;
    Ok(())
}
