use anyhow::Result;
use clap::{Parser, Subcommand};
use safecar_core::{config::Config, migration, server, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "safecar-core", version, about = "SafeCar fleet management backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database if needed, apply migrations and seed roles
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let prometheus_handle = telemetry::init(&config.telemetry);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting SafeCar Core on {}", config.http_addr());
            server::run(config, prometheus_handle).await
        }
        Command::Migrate => {
            migration::run_migrations(&config).await?;
            info!("Migrations complete");
            Ok(())
        }
    }
}
