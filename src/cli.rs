//! Command-line arguments for `waypoint-demo`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "waypoint-demo")]
#[command(author, version, about = "Drive the waypoint event-browsing demo", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Simulated event service latency in milliseconds
    #[arg(short, long, default_value = "200")]
    pub latency_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish one search per query, all concurrently
    Search {
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Dispatch deep links in order
    Link {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Tap the home button
    Tap {
        #[arg(short = 'n', long, default_value = "42")]
        count: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_queries() {
        let cli = Cli::parse_from(["waypoint-demo", "search", "paris", "lyon"]);
        assert_eq!(cli.latency_ms, 200);
        match cli.command {
            Command::Search { queries } => assert_eq!(queries, vec!["paris", "lyon"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn tap_defaults_to_forty_two() {
        let cli = Cli::parse_from(["waypoint-demo", "--latency-ms", "5", "tap"]);
        assert_eq!(cli.latency_ms, 5);
        assert!(matches!(cli.command, Command::Tap { count: 42 }));
    }

    #[test]
    fn link_requires_url() {
        assert!(Cli::try_parse_from(["waypoint-demo", "link"]).is_err());
    }
}
