use anyhow::Result;
use std::path::Path;
use tracing::info;

mod config;
mod engine;
mod logfile;
mod models;
mod resolver;
mod utils;

use crate::engine::Monitor;
use crate::logfile::LogFile;
use crate::resolver::Resolver;

#[tokio::main]
async fn main() -> Result<()> {
    utils::setup_console();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(true)
        .init();

    let log = LogFile::create(Path::new(logfile::LOG_DIR))?;

    let resolver = Resolver::new();
    let startup = config::from_console(&resolver).await?;

    let monitor = Monitor::new(startup.target, startup.period, log)?;
    monitor.run().await?;

    // run() only returns after a fatal probe error; shut down cleanly.
    info!("Monitor stopped");
    Ok(())
}
