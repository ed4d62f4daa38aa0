//! Bridges push and notification-click events to the notification backend and
//! the window broker. Events are handled one at a time; the show, focus, or
//! open call settles before the next event is taken, so an event never counts
//! as handled while its display work is still pending.

use std::sync::Arc;

use lockbadge_shared::push::{self, ClickOutcome, NotificationRequest, PushError};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clients::WindowBroker;
use crate::notify::NotificationBackend;

/// Inbound worker events, JSON-tagged the way the intake delivers them.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerEvent {
    /// A push message. `data` is absent when the push carried no payload; a
    /// JSON string is treated as a raw payload still to be parsed.
    #[serde(rename = "push")]
    Push {
        #[serde(default)]
        data: Option<serde_json::Value>,
    },
    /// The user clicked the shown notification.
    #[serde(rename = "notificationclick")]
    NotificationClick,
}

pub struct Relay {
    backend: Box<dyn NotificationBackend + Send>,
    broker: Arc<dyn WindowBroker>,
    /// Data attached to the currently shown notification: its target URL.
    shown_url: Option<String>,
}

impl Relay {
    pub fn new(backend: Box<dyn NotificationBackend + Send>, broker: Arc<dyn WindowBroker>) -> Self {
        Self {
            backend,
            broker,
            shown_url: None,
        }
    }

    pub async fn run(mut self, mut rx: mpsc::Receiver<WorkerEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = rx.recv() => {
                    let Some(event) = event else {
                        info!("relay: event channel closed; exiting");
                        break;
                    };
                    self.handle(event).await;
                }
            }
        }
    }

    pub async fn handle(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Push { data } => self.on_push(data.as_ref()).await,
            WorkerEvent::NotificationClick => self.on_click().await,
        }
    }

    async fn on_push(&mut self, data: Option<&serde_json::Value>) {
        match push_request(data) {
            Ok(request) => {
                debug!(title = %request.title, url = %request.url, "push: showing notification");
                self.shown_url = Some(request.url.clone());
                self.backend.show(&request).await;
            }
            Err(e) => {
                // The event fails as a whole; no fallback notification.
                error!(error = %e, "push: dropping event with malformed payload");
            }
        }
    }

    async fn on_click(&mut self) {
        self.backend.close().await;
        let target = self.shown_url.take();
        let windows = self.broker.match_all().await;
        match push::route_click(target.as_deref(), &windows, self.broker.can_open()) {
            ClickOutcome::Focus(id) => {
                if let Err(e) = self.broker.focus(id).await {
                    warn!(error = %e, id, "click: focus failed");
                }
            }
            ClickOutcome::Open(url) => {
                if let Err(e) = self.broker.open(&url).await {
                    warn!(error = %e, url = %url, "click: open failed");
                }
            }
            ClickOutcome::Ignore => {
                debug!("click: no matching window and opening unsupported");
            }
        }
    }
}

fn push_request(data: Option<&serde_json::Value>) -> Result<NotificationRequest, PushError> {
    match data {
        None => push::handle_push(None),
        // A string payload is the raw body of the push message.
        Some(serde_json::Value::String(raw)) => push::handle_push(Some(raw)),
        Some(value) => {
            let payload: push::PushPayload = serde_json::from_value(value.clone())?;
            Ok(payload.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_envelope_decodes() {
        let ev: WorkerEvent = serde_json::from_str(r#"{"type":"push","data":{"title":"Hi"}}"#)
            .unwrap();
        let WorkerEvent::Push { data } = ev else {
            panic!("expected push event");
        };
        let req = push_request(data.as_ref()).unwrap();
        assert_eq!(req.title, "Hi");
    }

    #[test]
    fn push_envelope_without_data_decodes() {
        let ev: WorkerEvent = serde_json::from_str(r#"{"type":"push"}"#).unwrap();
        let WorkerEvent::Push { data } = ev else {
            panic!("expected push event");
        };
        assert!(data.is_none());
    }

    #[test]
    fn click_envelope_decodes() {
        let ev: WorkerEvent = serde_json::from_str(r#"{"type":"notificationclick"}"#).unwrap();
        assert!(matches!(ev, WorkerEvent::NotificationClick));
    }

    #[test]
    fn string_data_is_parsed_as_raw_payload() {
        let raw = serde_json::Value::String(r#"{"url":"/x"}"#.to_string());
        let req = push_request(Some(&raw)).unwrap();
        assert_eq!(req.url, "/x");

        let bad = serde_json::Value::String("not json".to_string());
        assert!(push_request(Some(&bad)).is_err());
    }
}
