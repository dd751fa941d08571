//! # Edutask CLI
//!
//! Operator entry point for the Edutask data access layer.

use clap::{Parser, Subcommand};
use edutask_app::App;
use edutask_config::ConfigLoader;
use edutask_core::{init_tracing, EdutaskError, EdutaskResult, HealthCheck, JsonRecord};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "edutask")]
#[command(about = "Edutask data access tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, global = true, env = "EDUTASK_CONFIG_DIR", default_value = "./config")]
    config_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the database answers
    Ping,

    /// Look a user up by email address
    User {
        /// Email address to search for
        email: String,
    },

    /// Print the documents of a collection
    Find {
        /// Collection name
        collection: String,

        /// Extended JSON filter, e.g. '{"type": "test"}'
        filter: Option<String>,
    },

    /// Drop a collection with all its documents
    Drop {
        /// Collection name
        collection: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::new(cli.config_dir.as_str()) {
        Ok(loader) => loader.get().clone(),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    if let Err(e) = init_tracing(&config.observability) {
        eprintln!("{}", e);
    }

    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(cli.command, &config).await {
        error!(code = e.error_code(), "{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &edutask_config::AppConfig) -> EdutaskResult<()> {
    let (app, connection) = App::connect(config).await?;
    let result = execute(command, &app, &connection).await;
    connection.close().await;
    result
}

async fn execute(command: Commands, app: &App, health: &dyn HealthCheck) -> EdutaskResult<()> {
    match command {
        Commands::Ping => {
            let status = health.check().await;
            println!("{}: {}", health.name(), status);
            if status.is_healthy() {
                Ok(())
            } else {
                Err(EdutaskError::Database(status.to_string()))
            }
        }
        Commands::User { email } => match app.find_user(&email).await? {
            Some(user) => print_records(&[user]),
            None => {
                println!("No user found with mail {}", email);
                Ok(())
            }
        },
        Commands::Find { collection, filter } => {
            let records = app.find(&collection, filter.as_deref()).await?;
            print_records(&records)
        }
        Commands::Drop { collection } => {
            app.drop_collection(&collection).await?;
            println!("Dropped collection {}", collection);
            Ok(())
        }
    }
}

fn print_records(records: &[JsonRecord]) -> EdutaskResult<()> {
    for record in records {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    Ok(())
}
