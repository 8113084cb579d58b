use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;

use airwatch_cli::{init_tracing, run_server, Config};
use airwatch_storage::users::{UserCreateInput, UserRole};
use airwatch_storage::DbState;

#[derive(Parser)]
#[command(name = "airwatch")]
#[command(about = "AirWatch - municipal air quality monitoring backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long, help = "Port to listen on (overrides AIRWATCH_PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Address to bind (overrides AIRWATCH_HOST)")]
        host: Option<String>,
        #[arg(long, help = "SQLite database file (overrides AIRWATCH_DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
    /// Create a user and print its API token
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "citizen", help = "citizen, officer or admin")]
        role: UserRole,
        #[arg(long, help = "Ward id for officers")]
        ward: Option<String>,
        #[arg(long, help = "SQLite database file (overrides AIRWATCH_DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match command {
        Commands::Serve {
            port,
            host,
            database,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if database.is_some() {
                config.database_path = database;
            }

            println!(
                "{} Starting AirWatch on http://{}:{}",
                "🚀".bold(),
                config.host,
                config.port
            );
            run_server(config).await
        }
        Commands::CreateUser {
            name,
            email,
            role,
            ward,
            database,
        } => {
            airwatch_core::validation::require_non_empty("name", &name)?;
            airwatch_core::validation::validate_email(&email)?;

            let db = DbState::init_with_path(database.or(config.database_path)).await?;
            let created = db
                .user_storage
                .create_user(UserCreateInput {
                    name,
                    email,
                    role: Some(role),
                    ward,
                    ward_name: None,
                    employee_id: None,
                    phone_number: None,
                })
                .await?;

            println!(
                "{} Created {} {} ({})",
                "✓".green().bold(),
                created.user.role,
                created.user.name.bold(),
                created.user.id
            );
            println!("{} {}", "API token:".bold(), created.api_token.yellow());
            println!("{}", "Store this token now; it cannot be shown again.".dimmed());
            Ok(())
        }
    }
}
