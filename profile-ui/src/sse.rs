//! Server-Sent Events stream for session notifications.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use profile::core::types::Notification;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

use crate::state::{AppState, SessionEvent};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct SsePayload {
    #[serde(rename = "type")]
    event_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<&SessionEvent> for SsePayload {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::ModeChanged { mode } => SsePayload {
                event_type: "mode_changed",
                mode: Some(mode.as_str()),
                kind: None,
                message: None,
            },
            SessionEvent::Notification(notification) => SsePayload {
                event_type: "notification",
                mode: None,
                kind: Some(match notification {
                    Notification::Success(_) => "success",
                    Notification::Failure(_) => "failure",
                }),
                message: Some(notification.message().to_string()),
            },
        }
    }
}

/// SSE endpoint handler.
pub async fn events_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.event_tx.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default().event("connected").data("{}"));

        loop {
            match rx.recv().await {
                Ok(session_event) => {
                    let payload = SsePayload::from(&session_event);
                    if let Ok(json) = serde_json::to_string(&payload) {
                        yield Ok(Event::default().event(payload.event_type).data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "SSE client lagged, some events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
