#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Overrides the database named in `url` when set.
    pub name: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            name: std::env::var("DATABASE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            database,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
        })
    }
}

/// Credentials for the out-of-band admin seed.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl AdminSeed {
    pub fn from_env() -> anyhow::Result<Self> {
        let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
        let password = std::env::var("ADMIN_PASSWORD")
            .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set to seed the admin user"))?;
        anyhow::ensure!(!password.is_empty(), "ADMIN_PASSWORD must not be empty");
        Ok(Self {
            email: email.trim().to_lowercase(),
            password,
        })
    }
}
