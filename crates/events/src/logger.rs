use std::collections::VecDeque;

use playkit_core::Session;
use playkit_graph::{GraphConnection, GraphRequest, HttpMethod};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::EventsError;
use crate::event::{ACTIVATE_APP_EVENT, AppEvent};

/// Queued events that trigger a flush under [`FlushBehavior::Auto`].
pub const AUTO_FLUSH_THRESHOLD: usize = 100;

/// Oldest events are dropped beyond this many.
pub const MAX_QUEUED_EVENTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushBehavior {
    /// Flush once [`AUTO_FLUSH_THRESHOLD`] events are queued.
    #[default]
    Auto,
    /// Flush only when [`AppEventsLogger::flush`] is called.
    ExplicitOnly,
}

/// Validates, queues and sends app events.
pub struct AppEventsLogger<'a> {
    conn: &'a dyn GraphConnection,
    behavior: FlushBehavior,
    queue: VecDeque<AppEvent>,
}

impl<'a> AppEventsLogger<'a> {
    pub fn new(conn: &'a dyn GraphConnection) -> Self {
        Self {
            conn,
            behavior: FlushBehavior::default(),
            queue: VecDeque::new(),
        }
    }

    pub fn flush_behavior(mut self, behavior: FlushBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Queues `event`. Invalid events are dropped and reported as an error.
    /// A failed automatic flush keeps the events queued and is not an error.
    pub async fn log_event(
        &mut self,
        session: &Session,
        mut event: AppEvent,
    ) -> Result<(), EventsError> {
        if let Err(e) = event.validate() {
            warn!(event = %event.name, error = %e, "dropping invalid app event");
            return Err(e);
        }
        event.truncate_values();
        debug!(event = %event.name, "app event queued");
        self.enqueue_back(event);

        if self.behavior == FlushBehavior::Auto
            && self.queue.len() >= AUTO_FLUSH_THRESHOLD
            && self.flush(session).await.is_err()
        {
            debug!(queued = self.queue.len(), "automatic flush deferred");
        }
        Ok(())
    }

    /// Logs the activation event unless automatic logging is disabled.
    pub async fn log_activate_app(&mut self, session: &Session) -> Result<(), EventsError> {
        if !session.settings().auto_log_app_events_enabled {
            debug!("automatic app events disabled");
            return Ok(());
        }
        self.log_event(session, AppEvent::new(ACTIVATE_APP_EVENT).implicit())
            .await
    }

    /// POSTs every queued event to `{appID}/activities` and returns how many
    /// were sent. On failure the events go back to the front of the queue.
    pub async fn flush(&mut self, session: &Session) -> Result<usize, EventsError> {
        if self.queue.is_empty() {
            return Ok(0);
        }
        let app_id = session.settings().require_app_id()?;

        let events: Vec<AppEvent> = self.queue.drain(..).collect();
        let custom_events = Value::Array(events.iter().map(AppEvent::to_json).collect());
        let request = GraphRequest::for_session(session, format!("{app_id}/activities"))
            .method(HttpMethod::Post)
            .param("event", "CUSTOM_APP_EVENTS")
            .param("custom_events", custom_events.to_string())
            .param(
                "application_tracking_enabled",
                !session.settings().limit_event_and_data_usage,
            );

        match self.conn.start(request).await {
            Ok(_) => {
                info!(count = events.len(), "app events flushed");
                Ok(events.len())
            }
            Err(e) => {
                warn!(error = %e, count = events.len(), "app event flush failed, re-queueing");
                for event in events.into_iter().rev() {
                    self.queue.push_front(event);
                }
                self.trim();
                Err(e.into())
            }
        }
    }

    fn enqueue_back(&mut self, event: AppEvent) {
        self.queue.push_back(event);
        self.trim();
    }

    fn trim(&mut self) {
        while self.queue.len() > MAX_QUEUED_EVENTS {
            if let Some(dropped) = self.queue.pop_front() {
                warn!(event = %dropped.name, "app event queue full, dropping oldest");
            }
        }
    }
}
