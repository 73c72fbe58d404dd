pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tributary")]
#[command(about = "Download new media from subscribed feeds", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/tributary/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger file, overriding the config's ledger-path
    #[arg(short, long, global = true)]
    pub ledger: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every feed and download new entries (default)
    Sync,
    /// List configured feeds
    Feeds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["tributary"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_paths() {
        let cli = Cli::try_parse_from([
            "tributary",
            "feeds",
            "--config",
            "/tmp/c.toml",
            "--ledger",
            "/tmp/l.json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Feeds)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.ledger, Some(PathBuf::from("/tmp/l.json")));
    }
}
