use crate::api::AppState;
use crate::error::BroadcastError;
use crate::subscription::{ErrorMessage, ServerMessage};
use axum::{
    extract::State,
    http::{header::ACCEPT, HeaderMap},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};

/// GET /api/sse - Server-Sent Events stream of broker messages.
///
/// The subscription lives inside the response stream; when the client goes
/// away hyper drops the stream, which unregisters the subscriber.
pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, BroadcastError> {
    if !accepts_event_stream(&headers) {
        return Err(BroadcastError::TransportUnsupported);
    }

    let subscription = state.broker.subscribe().await?;
    info!(connection_id = %subscription.id(), "SSE client connected");

    let stream = stream::unfold(subscription, |mut subscription| async move {
        let message = subscription.next().await?;
        Some((Ok(to_sse_event(&message)), subscription))
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(state.keep_alive)
            .text("ping"),
    ))
}

/// Frame a message as an SSE event. Position updates go out as the unnamed
/// default event; notices carry their event name.
pub fn to_sse_event(message: &ServerMessage) -> Event {
    match message.to_json() {
        Ok(json) => {
            let event = Event::default().data(json);
            match message.event_name() {
                Some(name) => event.event(name),
                None => event,
            }
        }
        Err(e) => {
            error!(kind = message.kind(), error = %e, "Unable to encode message");
            let body = serde_json::to_string(&ErrorMessage::new(e.to_string()))
                .unwrap_or_else(|_| r#"{"type":"error"}"#.to_string());
            Event::default().event("error").data(body)
        }
    }
}

/// True unless the client explicitly asks for something other than an event stream
fn accepts_event_stream(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT) else {
        return true;
    };
    let Ok(accept) = accept.to_str() else {
        return false;
    };

    accept
        .split(',')
        .filter_map(|part| part.split(';').next())
        .map(str::trim)
        .any(|media| media == "text/event-stream" || media == "text/*" || media == "*/*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_accepts_event_stream() {
        assert!(accepts_event_stream(&HeaderMap::new()));
        assert!(accepts_event_stream(&with_accept("text/event-stream")));
        assert!(accepts_event_stream(&with_accept("*/*")));
        assert!(accepts_event_stream(&with_accept(
            "application/json, text/event-stream;q=0.9"
        )));
    }

    #[test]
    fn test_rejects_non_streaming_accept() {
        assert!(!accepts_event_stream(&with_accept("application/json")));
        assert!(!accepts_event_stream(&with_accept("text/html, image/png")));
    }
}
