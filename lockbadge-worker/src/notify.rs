use async_trait::async_trait;
use lockbadge_shared::push::NotificationRequest;
use tracing::info;

/// Abstraction over showing and dismissing the relay's notifications.
#[async_trait]
pub trait NotificationBackend: Send {
    /// Shows (or replaces) the notification. Resolves once the display
    /// request has settled.
    async fn show(&mut self, request: &NotificationRequest);
    /// Dismisses the currently shown notification, if any.
    async fn close(&mut self);
}

/// Fallback backend that only logs. Used where no OS notifier is available
/// and as the downgrade target when showing fails.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationBackend for LogNotifier {
    async fn show(&mut self, request: &NotificationRequest) {
        info!(
            title = %request.title,
            body = %request.body,
            url = %request.url,
            "[NOTIFICATION]"
        );
    }

    async fn close(&mut self) {}
}

#[cfg(not(target_os = "windows"))]
pub use os::Notifier;

#[cfg(not(target_os = "windows"))]
mod os {
    use async_trait::async_trait;
    use lockbadge_shared::push::NotificationRequest;
    use tracing::{debug, info, warn};

    use super::NotificationBackend;

    #[derive(Debug)]
    enum NotifierKind {
        NotifyRust,
        LogOnly,
    }

    /// OS notification backend with a log-only downgrade path.
    #[derive(Debug)]
    pub struct Notifier {
        kind: NotifierKind,
        replace_id: u32,
        handle: Option<notify_rust::NotificationHandle>,
    }

    impl Default for Notifier {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Notifier {
        pub fn new() -> Self {
            // Start optimistic; if we fail to show, we downgrade to LogOnly.
            debug!("Notifier created: using notify-rust backend initially");
            Self {
                kind: NotifierKind::NotifyRust,
                replace_id: 2001u32,
                handle: None,
            }
        }

        async fn show_inner(&mut self, request: &NotificationRequest) {
            match self.kind {
                NotifierKind::NotifyRust => {
                    let replace_id = self.replace_id;
                    debug!(title = %request.title, replace_id, "show: building notification");
                    let mut n = notify_rust::Notification::new();
                    let res = n
                        .appname("lockbadge")
                        .summary(&request.title)
                        .body(&request.body)
                        .icon(&request.icon)
                        .id(replace_id)
                        .urgency(notify_rust::Urgency::Normal)
                        .show_async()
                        .await;

                    match res {
                        Ok(handle) => {
                            debug!(title = %request.title, "show: notification shown");
                            self.handle = Some(handle);
                        }
                        Err(e) => {
                            warn!(error=%e, "notify-rust failed; downgrading to LogOnly notifier");
                            self.kind = NotifierKind::LogOnly;
                            self.handle = None;
                            info!(title = %request.title, body = %request.body, "[NOTIFICATION]");
                        }
                    }
                }
                NotifierKind::LogOnly => {
                    info!(title = %request.title, body = %request.body, "[NOTIFICATION]");
                }
            }
        }

        async fn close_inner(&mut self) {
            match self.kind {
                NotifierKind::NotifyRust => {
                    if self.handle.take().is_some() {
                        debug!("close: replacing with short-timeout notification");
                        let replace_id = self.replace_id;
                        let mut n = notify_rust::Notification::new();
                        // Replace the visible notification with an empty,
                        // near-immediate timeout one.
                        let _ = n
                            .appname("lockbadge")
                            .summary("")
                            .id(replace_id)
                            .urgency(notify_rust::Urgency::Low)
                            .timeout(notify_rust::Timeout::Milliseconds(1))
                            .show_async()
                            .await;
                    }
                }
                NotifierKind::LogOnly => {
                    // Nothing visible to dismiss.
                }
            }
        }
    }

    #[async_trait]
    impl NotificationBackend for Notifier {
        async fn show(&mut self, request: &NotificationRequest) {
            self.show_inner(request).await;
        }
        async fn close(&mut self) {
            self.close_inner().await;
        }
    }
}

/// Factory for the default backend.
pub fn default_backend() -> Box<dyn NotificationBackend + Send> {
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(Notifier::new())
    }
    #[cfg(target_os = "windows")]
    {
        Box::new(LogNotifier)
    }
}
