//! The worker's driver: a periodic scheduler for the countdown badge and a
//! stdin intake feeding the push relay.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lockbadge_shared::countdown::{BADGE_ELEMENT_ID, Tier};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::relay::{Relay, WorkerEvent};
use crate::widget::{self, Badge};
use crate::{AppError, clients, notify};

/// Entry point for the worker: spawns the badge ticker, the relay, and the
/// event intake, then waits for a shutdown signal.
pub async fn run(config_path: Option<PathBuf>) -> Result<(), AppError> {
    let (cfg_path, cfg) = WorkerConfig::find_and_load(config_path)?;
    info!(path=?cfg_path, "loaded config");

    let cancel = CancellationToken::new();

    let broker = Arc::new(clients::LocalBroker::new(cfg.open_cmd.clone()));
    let relay = Relay::new(notify::default_backend(), broker);
    let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>(16);
    let relay_handle = tokio::spawn(relay.run(event_rx, cancel.child_token()));

    let intake_cancel = cancel.child_token();
    let intake_handle = tokio::spawn(event_intake(event_tx, intake_cancel));

    let badge = cfg.remaining_secs.map(Badge::with_remaining);
    let interval = Duration::from_secs(cfg.interval_secs.max(1));
    let ticker_handle = tokio::spawn(badge_loop(badge, interval, cancel.child_token()));

    shutdown_signal().await;
    info!("shutdown signal received; stopping worker");
    cancel.cancel();

    // Give the loops a moment to finish gracefully.
    let _ = tokio::time::timeout(Duration::from_secs(3), async {
        let _ = ticker_handle.await;
        let _ = relay_handle.await;
    })
    .await;
    // Stdin reads cannot be interrupted cleanly; drop the task.
    intake_handle.abort();
    Ok(())
}

/// Invokes one countdown tick per interval, the scheduler the page script
/// leaves to its caller.
async fn badge_loop(badge: Option<Badge>, interval: Duration, cancel: CancellationToken) {
    let Some(mut badge) = badge else {
        debug!("no countdown badge configured; tick loop idle");
        return;
    };
    let mut tier = badge.tier();
    info!(element = BADGE_ELEMENT_ID, ?tier, "countdown badge started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep(interval) => {}
        }
        widget::update_countdown(Some(&mut badge));
        let now = badge.tier();
        if now != tier {
            info!(from=?tier, to=?now, display=%badge.html(), "countdown tier changed");
            tier = now;
        } else {
            debug!(display=%badge.html(), "countdown tick");
        }
        if now == Tier::Locked {
            // Further ticks are no-ops until the attribute is reset from
            // outside, but the schedule keeps firing like the page interval.
            debug!("countdown locked");
        }
    }
}

/// Reads JSON-lines events from stdin and forwards them to the relay. An
/// undecodable envelope is skipped here; a well-formed envelope carrying a
/// malformed payload still reaches the relay and fails there.
async fn event_intake(tx: mpsc::Sender<WorkerEvent>, cancel: CancellationToken) {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<WorkerEvent>(line) {
                            Ok(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!(error=%e, "intake: skipping undecodable event"),
                        }
                    }
                    Ok(None) => {
                        info!("intake: stdin closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error=%e, "intake: read failed");
                        break;
                    }
                }
            }
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
        tokio::select! {
            _ = sigint.recv() => {
                info!("shutdown: received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("shutdown: received SIGTERM");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown: received Ctrl+C");
    }
}
