//! Command-line interface definitions for subfeed.
//!
//! Every option can also be supplied through an environment variable.

use clap::{Parser, ValueEnum};

/// How items and the final summary are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Title line followed by a bracketed URL line.
    Text,
    /// One JSON object per line.
    Json,
}

/// Command-line arguments for subfeed.
///
/// # Examples
///
/// ```sh
/// # Fetch the default "all" feed
/// subfeed
///
/// # Fetch several feeds concurrently
/// subfeed rust golang programming
///
/// # Machine-readable output against a local mirror
/// subfeed --format json --base-url http://localhost:8080/ rust
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Source ids to fetch; defaults to "all" when none are given
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Base URL that `r/<source>.json` is appended to
    #[arg(long, env = "SUBFEED_BASE_URL", default_value = "https://www.reddit.com/")]
    pub base_url: String,

    /// Per-source fetch deadline in seconds
    #[arg(long, env = "SUBFEED_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// How many items may wait between the workers and the output
    #[arg(long, env = "SUBFEED_CHANNEL_CAPACITY", default_value_t = 1)]
    pub channel_capacity: usize,

    /// User-Agent header sent with every request
    #[arg(long, env = "SUBFEED_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output (NO_COLOR is honoured as well)
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["subfeed", "rust", "golang"]);

        assert_eq!(cli.sources, vec!["rust", "golang"]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_cli_no_sources() {
        let cli = Cli::parse_from(["subfeed"]);
        assert!(cli.sources.is_empty());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "subfeed",
            "--format",
            "json",
            "--timeout-secs",
            "5",
            "--channel-capacity",
            "8",
            "--no-color",
            "--base-url",
            "http://localhost:9000/",
            "rust",
        ]);

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(cli.channel_capacity, 8);
        assert!(cli.no_color);
        assert_eq!(cli.base_url, "http://localhost:9000/");
        assert_eq!(cli.sources, vec!["rust"]);
    }
}
