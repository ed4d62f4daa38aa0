//! Push relay model: payload parsing with per-field defaults and
//! window-client routing for notification clicks.

use serde::{Deserialize, Serialize};

/// Title used when the payload carries none.
pub const DEFAULT_TITLE: &str = "Notification";
/// Icon and badge asset used when the payload carries none.
pub const DEFAULT_ICON: &str = "/static/images/logo_ips_co.png";
/// Navigation target used when the payload carries none.
pub const DEFAULT_URL: &str = "/";

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The push event carried data that is not valid JSON. The event fails as
    /// a whole; no fallback notification is shown.
    #[error("malformed push payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Inbound push payload. Every field is optional and defaulted independently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub url: Option<String>,
}

/// A fully-defaulted request for one system notification. `url` doubles as
/// the notification's attached data, read back when it is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub url: String,
}

impl From<PushPayload> for NotificationRequest {
    fn from(p: PushPayload) -> Self {
        Self {
            title: p.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: p.body.unwrap_or_default(),
            icon: p.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            badge: p.badge.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            url: p.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        }
    }
}

/// Handles one push event. Absent data means an empty payload (all defaults);
/// present data must parse as JSON or the event fails.
pub fn handle_push(data: Option<&str>) -> Result<NotificationRequest, PushError> {
    let payload = match data {
        None => PushPayload::default(),
        Some(raw) => serde_json::from_str(raw)?,
    };
    Ok(payload.into())
}

/// Handle to an open window the worker can inspect or focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: u64,
    pub url: String,
    pub can_focus: bool,
}

/// Action a notification click settles on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Focus the existing window with this id.
    Focus(u64),
    /// Open a new window at this URL.
    Open(String),
    /// No matching window and opening is unsupported.
    Ignore,
}

/// Routes a notification click. The first open window whose URL equals the
/// target exactly (and which supports focusing) wins; otherwise a new window
/// is opened when the host supports it.
pub fn route_click(target: Option<&str>, windows: &[WindowClient], can_open: bool) -> ClickOutcome {
    let url = target.unwrap_or(DEFAULT_URL);
    for w in windows {
        if w.url == url && w.can_focus {
            return ClickOutcome::Focus(w.id);
        }
    }
    if can_open {
        ClickOutcome::Open(url.to_string())
    } else {
        ClickOutcome::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(id: u64, url: &str, can_focus: bool) -> WindowClient {
        WindowClient {
            id,
            url: url.to_string(),
            can_focus,
        }
    }

    #[test]
    fn absent_data_yields_all_defaults() {
        let req = handle_push(None).unwrap();
        assert_eq!(req.title, DEFAULT_TITLE);
        assert_eq!(req.body, "");
        assert_eq!(req.icon, DEFAULT_ICON);
        assert_eq!(req.badge, DEFAULT_ICON);
        assert_eq!(req.url, DEFAULT_URL);
    }

    #[test]
    fn fields_default_independently() {
        let req = handle_push(Some(r#"{"title":"Hi","url":"/x"}"#)).unwrap();
        assert_eq!(req.title, "Hi");
        assert_eq!(req.body, "");
        assert_eq!(req.icon, DEFAULT_ICON);
        assert_eq!(req.badge, DEFAULT_ICON);
        assert_eq!(req.url, "/x");
    }

    #[test]
    fn full_payload_is_taken_verbatim() {
        let req = handle_push(Some(
            r#"{"title":"t","body":"b","icon":"/i.png","badge":"/b.png","url":"/u"}"#,
        ))
        .unwrap();
        assert_eq!(req.title, "t");
        assert_eq!(req.body, "b");
        assert_eq!(req.icon, "/i.png");
        assert_eq!(req.badge, "/b.png");
        assert_eq!(req.url, "/u");
    }

    #[test]
    fn malformed_payload_fails_the_event() {
        assert!(matches!(
            handle_push(Some("not json")),
            Err(PushError::Payload(_))
        ));
    }

    #[test]
    fn click_focuses_first_exact_match() {
        let windows = [win(1, "/other", true), win(2, "/x", true), win(3, "/x", true)];
        assert_eq!(
            route_click(Some("/x"), &windows, true),
            ClickOutcome::Focus(2)
        );
    }

    #[test]
    fn click_skips_unfocusable_matches() {
        let windows = [win(1, "/x", false), win(2, "/x", true)];
        assert_eq!(
            route_click(Some("/x"), &windows, true),
            ClickOutcome::Focus(2)
        );
    }

    #[test]
    fn click_opens_when_nothing_matches() {
        let windows = [win(1, "/other", true)];
        assert_eq!(
            route_click(Some("/x"), &windows, true),
            ClickOutcome::Open("/x".to_string())
        );
    }

    #[test]
    fn matching_is_exact_string() {
        let windows = [win(1, "/x/", true)];
        assert_eq!(
            route_click(Some("/x"), &windows, true),
            ClickOutcome::Open("/x".to_string())
        );
    }

    #[test]
    fn click_without_target_goes_to_root() {
        assert_eq!(
            route_click(None, &[], true),
            ClickOutcome::Open("/".to_string())
        );
    }

    #[test]
    fn click_is_ignored_when_opening_unsupported() {
        assert_eq!(route_click(Some("/x"), &[], false), ClickOutcome::Ignore);
    }
}
