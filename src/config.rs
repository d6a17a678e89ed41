//! Validated run configuration built from the command line.
//!
//! [`Cli`](crate::cli::Cli) holds raw user input; [`RunConfig`] is what the
//! dispatcher and sinks actually consume. The conversion applies defaults,
//! normalises the source list and checks numeric bounds.

use crate::cli::{Cli, OutputFormat};
use itertools::Itertools;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Source fetched when none are given on the command line.
pub const DEFAULT_SOURCE: &str = "all";

/// Problems with user-supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {value:?}: {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL {0:?} must use http or https")]
    BaseUrlScheme(String),

    #[error("channel capacity must be at least 1")]
    ChannelCapacity,

    #[error("timeout must be at least 1 second")]
    Timeout,
}

/// HTTP settings shared by every source worker.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Root that listing paths (`r/<source>.json`) are joined onto.
    pub base_url: Url,
    /// Deadline for one complete fetch, body included.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://www.reddit.com/").expect("static URL parses"),
            timeout: Duration::from_secs(30),
            user_agent: default_user_agent(),
        }
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Distinct source ids in the order they were given.
    pub sources: Vec<String>,
    pub fetch: FetchSettings,
    /// Capacity of the worker-to-sink channel.
    pub channel_capacity: usize,
    pub format: OutputFormat,
    pub color: bool,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli, no_color_env: bool) -> Result<Self, ConfigError> {
        if cli.channel_capacity == 0 {
            return Err(ConfigError::ChannelCapacity);
        }
        if cli.timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }

        Ok(Self {
            sources: normalize_sources(&cli.sources),
            fetch: FetchSettings {
                base_url: parse_base_url(&cli.base_url)?,
                timeout: Duration::from_secs(cli.timeout_secs),
                user_agent: cli.user_agent.clone().unwrap_or_else(default_user_agent),
            },
            channel_capacity: cli.channel_capacity,
            format: cli.format,
            color: !(cli.no_color || no_color_env),
        })
    }
}

/// Trim ids, drop empty ones and duplicates (first occurrence wins), and fall
/// back to [`DEFAULT_SOURCE`] when nothing is left.
pub fn normalize_sources(raw: &[String]) -> Vec<String> {
    let sources: Vec<String> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unique()
        .map(str::to_string)
        .collect();

    if sources.is_empty() {
        vec![DEFAULT_SOURCE.to_string()]
    } else {
        sources
    }
}

/// Parse the base URL and make sure its path ends in `/` so that joining a
/// relative listing path appends to it instead of replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::BaseUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::BaseUrlScheme(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
