//! # subfeed
//!
//! Fetches listings from several subreddit-style JSON feeds at once and
//! streams their items to stdout as they arrive.
//!
//! ## Usage
//!
//! ```sh
//! subfeed rust golang programming
//! ```
//!
//! With no arguments the `all` feed is fetched.
//!
//! ## Architecture
//!
//! 1. **Configuration**: [`cli::Cli`] is parsed and validated into a
//!    [`config::RunConfig`]
//! 2. **Fan-out**: the [`dispatcher::Dispatcher`] spawns one worker per source;
//!    each performs a single fetch through [`sources::reddit::RedditSource`]
//! 3. **Fan-in**: workers stream counts and items over one bounded channel to
//!    a single consumer loop that writes them to an [`outputs::ItemSink`]
//! 4. **Summary**: source count, elapsed time and failed sources are reported
//!
//! Items and the summary go to stdout; diagnostics go to stderr through
//! `tracing`.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dispatcher;
mod error;
mod models;
mod outputs;
mod sources;
mod utils;

use cli::Cli;
use config::RunConfig;
use dispatcher::Dispatcher;
use sources::reddit::RedditSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let config = RunConfig::from_cli(&args, no_color_env)?;
    info!(
        sources = ?config.sources,
        base_url = %config.fetch.base_url,
        timeout_secs = config.fetch.timeout.as_secs(),
        "subfeed starting up"
    );

    let fetcher = RedditSource::new(&config.fetch)?;
    let dispatcher = Dispatcher::new(fetcher, config.channel_capacity);
    let mut sink = outputs::sink_for(config.format, config.color, std::io::stdout());

    let summary = dispatcher.run(&config.sources, &mut *sink).await?;
    sink.finish(&summary)?;

    Ok(())
}
