use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lockbadge_shared::push;

use crate::AppError;
use crate::notify::default_backend;
use crate::widget::{self, Badge};

const HELP_EPILOG: &str = r#"Config resolution order:
  1) --config/-c PATH
  2) $LOCKBADGE_CONFIG
  3) XDG default: ~/.config/lockbadge/worker.yaml
"#;

#[derive(Debug, Parser)]
#[command(
    name = "lockbadge-worker",
    version,
    about = "Countdown badge driver and push notification relay",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Optional subcommand. Without one, runs the worker.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render countdown ticks offline and print each redraw
    Tick {
        /// Starting value of the remaining-seconds attribute
        #[arg(long)]
        seconds: i64,
        /// Number of ticks to render
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Show a single notification from a push payload and exit
    Notify {
        /// JSON payload; omitted means an empty push event (all defaults)
        payload: Option<String>,
    },
}

/// Drives `count` ticks over an in-memory badge and prints each redraw.
pub fn run_tick_cmd(seconds: i64, count: u32) {
    let mut badge = Badge::with_remaining(seconds);
    for _ in 0..count {
        widget::update_countdown(Some(&mut badge));
        println!("{} [{}]", badge.html(), badge.classes().join(" "));
    }
}

/// One-shot backend check: parse the payload and show it for real.
pub async fn run_notify_cmd(payload: Option<&str>) -> Result<(), AppError> {
    let request = push::handle_push(payload).map_err(|e| AppError::Notify(e.to_string()))?;
    let mut backend = default_backend();
    backend.show(&request).await;
    Ok(())
}
