use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tributary::app::AppContext;
use tributary::cli::{commands, Cli, Commands};
use tributary::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tributary=info")))
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.resolve(cli.ledger.as_deref())?;
    let ctx = AppContext::new(config)?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let report = commands::sync_feeds(&ctx).await?;
            report.persisted?;
        }
        Commands::Feeds => {
            commands::list_feeds(&ctx)?;
        }
    }

    Ok(())
}
