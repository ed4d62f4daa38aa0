//! Window-client broker: enumerate the windows this worker opened, focus one,
//! or open a new one in the default browser.

use async_trait::async_trait;
use lockbadge_shared::push::WindowClient;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::AppError;

#[async_trait]
pub trait WindowBroker: Send + Sync {
    /// Snapshot of the windows currently known to the broker.
    async fn match_all(&self) -> Vec<WindowClient>;
    /// Whether opening new windows is supported.
    fn can_open(&self) -> bool;
    async fn focus(&self, id: u64) -> Result<(), AppError>;
    async fn open(&self, url: &str) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    windows: Vec<WindowClient>,
}

/// Broker backed by the default browser. It can only track windows it opened
/// itself; focusing is left to the window manager once a window exists.
pub struct LocalBroker {
    open_cmd: Option<Vec<String>>,
    registry: Mutex<Registry>,
}

impl LocalBroker {
    pub fn new(open_cmd: Option<Vec<String>>) -> Self {
        Self {
            open_cmd,
            registry: Mutex::new(Registry::default()),
        }
    }

    async fn launch(&self, url: &str) -> Result<(), AppError> {
        match &self.open_cmd {
            Some(cmd) => {
                let (program, args) = cmd
                    .split_first()
                    .ok_or_else(|| AppError::Config("open_cmd must not be empty".into()))?;
                let status = tokio::process::Command::new(program)
                    .args(args)
                    .arg(url)
                    .status()
                    .await?;
                if !status.success() {
                    return Err(AppError::Window(format!(
                        "open command exited with {status}"
                    )));
                }
                Ok(())
            }
            None => webbrowser::open(url)
                .map_err(|e| AppError::Window(format!("browser open failed: {e}"))),
        }
    }
}

#[async_trait]
impl WindowBroker for LocalBroker {
    async fn match_all(&self) -> Vec<WindowClient> {
        self.registry.lock().await.windows.clone()
    }

    fn can_open(&self) -> bool {
        true
    }

    async fn focus(&self, id: u64) -> Result<(), AppError> {
        // The window already exists in the browser; nothing further we can
        // drive from here.
        info!(id, "window already open; leaving focus to the browser");
        Ok(())
    }

    async fn open(&self, url: &str) -> Result<(), AppError> {
        self.launch(url).await?;
        let mut reg = self.registry.lock().await;
        reg.next_id += 1;
        let id = reg.next_id;
        reg.windows.push(WindowClient {
            id,
            url: url.to_string(),
            can_focus: true,
        });
        debug!(id, url, "window opened and registered");
        Ok(())
    }
}
