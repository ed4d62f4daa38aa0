use clap::Parser;
use lockbadge_worker::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), lockbadge_worker::AppError> {
    run(Cli::parse()).await
}
