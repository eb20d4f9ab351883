use clap::{Parser, Subcommand};

mod app;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod leads;
mod state;

use crate::auth::services::{seed_admin, SeedOutcome};
use crate::config::{AdminSeed, AppConfig};
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "leadcapture", version, about = "Lead capture API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Create the admin user from ADMIN_EMAIL / ADMIN_PASSWORD if it does not exist yet.
    SeedAdmin,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "leadcapture=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let app = app::build_app(AppState::new(pool.clone()));
            app::serve(app, &config).await
        }
        Command::SeedAdmin => run_seed(AppState::new(pool.clone())).await,
    };

    db::close(pool).await;
    result
}

async fn run_seed(state: AppState) -> anyhow::Result<()> {
    let seed = AdminSeed::from_env()?;
    match seed_admin(state.users.as_ref(), &seed).await? {
        SeedOutcome::Created(user) => tracing::info!(user_id = %user.id, "seed complete"),
        SeedOutcome::AlreadyExists => tracing::info!("nothing to seed"),
    }
    Ok(())
}
