use anyhow::Result;
use clap::{Parser, Subcommand};
use gig_scoring::database::DatabaseConfig;
use gig_scoring::records_cli::{handle_records_command, RecordsCommand};
use gig_scoring::scoring::read_scoring_input;
use gig_scoring::{start_web_server, ConfigManager, ScoringGateway};
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gig-scorer")]
#[command(about = "Candidate scoring service for the gig marketplace")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Score a candidate profile read from a JSON file ("-" for stdin)
    Score { file: PathBuf },
    /// Manage gigs and applications in the record store
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `score` output stays clean on stdout.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gig_scoring=info,gig_scorer=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            config.ensure_directories().await?;

            info!("Environment: {}", config.environment.name);
            info!("Database: {}", config.environment.database_path.display());

            let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());
            db_config.init_pool().await?;
            db_config.migrate().await?;

            let gateway = ScoringGateway::from_config(&config.scoring);
            start_web_server(db_config, gateway, config.environment.port).await
        }

        Command::Score { file } => {
            let input = read_scoring_input(&file).await?;

            let gateway = ScoringGateway::from_config(&config.scoring);
            let result = gateway.compute_score(&input).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Command::Records { command } => {
            config.ensure_directories().await?;

            let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());
            db_config.init_pool().await?;
            let outcome = handle_records_command(&db_config, command).await;
            db_config.close().await;
            outcome
        }
    }
}
