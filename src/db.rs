use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::info;

use crate::config::DatabaseConfig;

/// Builds connect options from the URL, applying the optional database name override.
pub fn connect_options(cfg: &DatabaseConfig) -> anyhow::Result<PgConnectOptions> {
    let mut opts = PgConnectOptions::from_str(&cfg.url).context("parse DATABASE_URL")?;
    if let Some(name) = &cfg.name {
        opts = opts.database(name);
    }
    Ok(opts)
}

/// Opens the process-wide pool. Callers own it and should `close` it on shutdown.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(connect_options(cfg)?)
        .await
        .context("connect to database")?;
    info!(max_connections = cfg.max_connections, "database pool ready");
    Ok(db)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

pub async fn close(db: PgPool) {
    db.close().await;
    info!("database pool closed");
}
