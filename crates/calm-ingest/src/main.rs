use std::path::Path;

use anyhow::Context;
use calm_config::CalmConfig;
use calm_core::enums::Condition;
use calm_db::CalmDb;
use calm_ingest::{IngestOutcome, Ingestor, ObjectStoreSource, S3Event};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("calm-ingest error: {error:#}");
            std::process::exit(2);
        }
    }
}

/// Returns whether the command succeeded.
async fn run() -> anyhow::Result<bool> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = CalmConfig::load_with_dotenv().context("failed to load configuration")?;
    let db = CalmDb::open_local(&config.ledger.db_path)
        .await
        .with_context(|| format!("failed to open ledger at {}", config.ledger.db_path))?
        .with_batch_limit(config.ledger.batch_limit);

    match cli.command {
        cli::Commands::Event { path } => {
            let event = read_event(&path)?;
            let location = event.snapshot_location()?;
            let source = ObjectStoreSource::s3(&config.storage, &location.bucket)?;
            let ingestor = Ingestor::new(&db, &db, &config)?;
            print_outcome(&ingestor.handle_event(&event, &source).await)
        }
        cli::Commands::File { participant, path } => {
            let ingestor = Ingestor::new(&db, &db, &config)?;
            print_outcome(&ingestor.handle_file(&participant, &path).await)
        }
        cli::Commands::Register {
            participant,
            condition,
        } => {
            let condition: Condition = condition.parse()?;
            let registered = db.register_participant(&participant, condition).await?;
            println!("{}", serde_json::to_string(&registered)?);
            Ok(true)
        }
    }
}

fn read_event(path: &Path) -> anyhow::Result<S3Event> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    serde_json::from_str(&raw).context("event file is not an S3 notification")
}

fn print_outcome(outcome: &IngestOutcome) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string(outcome)?);
    Ok(outcome.is_success())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CALM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
