mod lookup;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fancloud-cli")]
#[command(about = "fancloud command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a subject and print its scraped profile as JSON
    Lookup {
        /// Subject name, e.g. an artist or actor
        name: String,
        /// Print the raw profile (nulls) instead of the rendered one
        #[arg(long)]
        raw: bool,
    },
    /// Free-text search for candidate subject titles
    Search {
        /// Search text
        query: String,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = fancloud_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Lookup { name, raw } => lookup::run_lookup(&config, &name, raw).await?,
        Commands::Search { query } => lookup::run_search(&config, &query).await?,
        Commands::Migrate => {
            let pool_config = fancloud_db::PoolConfig::from_app_config(&config);
            let pool = fancloud_db::connect_pool(&config.database_url, pool_config).await?;
            fancloud_db::run_migrations(&pool).await?;
            tracing::info!("migrations applied");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_parses_name_and_raw_flag() {
        let cli = Cli::try_parse_from(["fancloud-cli", "lookup", "米津玄師", "--raw"])
            .expect("parse");
        match cli.command {
            Commands::Lookup { name, raw } => {
                assert_eq!(name, "米津玄師");
                assert!(raw);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["fancloud-cli"]).is_err());
    }
}
