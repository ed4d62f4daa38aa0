pub mod agent;
pub mod cli;
pub mod clients;
pub mod config;
pub mod notify;
pub mod relay;
pub mod widget;

pub use cli::{Cli, Command};
pub use config::WorkerConfig;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("notification error: {0}")]
    Notify(String),
    #[error("window error: {0}")]
    Window(String),
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing();

    if let Some(cmd) = &cli.command {
        match cmd {
            Command::Tick { seconds, count } => {
                cli::run_tick_cmd(*seconds, *count);
                return Ok(());
            }
            Command::Notify { payload } => {
                return cli::run_notify_cmd(payload.as_deref()).await;
            }
        }
    }

    agent::run(cli.config.clone()).await
}
