//! Shared application state for the session server.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use profile::core::session::{Mode, SessionState, Validation};
use profile::core::types::Notification;
use profile::io::init::ProfilePaths;
use tokio::sync::{Mutex, broadcast};

/// Events broadcast to SSE clients after session transitions.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The form switched between viewing and editing.
    ModeChanged { mode: Mode },
    /// A save attempt finished.
    Notification(Notification),
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one form session this server hosts.
    pub session: Arc<Mutex<SessionState>>,
    pub validation: Arc<Validation>,
    /// Where committed snapshots are persisted; `None` keeps them in memory.
    pub paths: Option<ProfilePaths>,
    /// Fixed evaluation date; the local date is used when unset.
    pub today: Option<NaiveDate>,
    /// Broadcast sender for session events.
    pub event_tx: Arc<broadcast::Sender<SessionEvent>>,
}

impl AppState {
    pub fn new(session: SessionState, validation: Validation, paths: Option<ProfilePaths>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            session: Arc::new(Mutex::new(session)),
            validation: Arc::new(validation),
            paths,
            today: None,
            event_tx: Arc::new(event_tx),
        }
    }

    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    /// Evaluation date for age rules.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Broadcast an event; having no subscribers is not an error.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}
