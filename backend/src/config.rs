//! Configuration management for the Supply Chain Management Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with SCM_ prefix (e.g. SCM__AUTH__JWT_SECRET)

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Signing secret used when none is configured. Rejected in production.
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-key";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token and password hashing configuration
    pub auth: AuthConfig,

    /// Start-up data configuration
    pub bootstrap: BootstrapConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Which store implementation backs the repositories
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,

    /// PostgreSQL connection URL (required for the postgres backend)
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret key for signing JWT tokens
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub token_expiry: i64,

    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,

    /// Insert demo suppliers, products, orders and shipments into an empty store
    pub seed_demo_data: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SCM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.backend", "postgres")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("auth.jwt_secret", DEVELOPMENT_JWT_SECRET)?
            .set_default("auth.token_expiry", 86400)?
            .set_default("auth.bcrypt_cost", bcrypt::DEFAULT_COST as i64)?
            .set_default("bootstrap.admin_name", "Admin User")?
            .set_default("bootstrap.admin_email", "admin@example.com")?
            .set_default("bootstrap.admin_password", "admin123")?
            .set_default("bootstrap.seed_demo_data", false)?
            .set_default("logging.format", "pretty")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SCM_ prefix)
            .add_source(
                Environment::with_prefix("SCM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres backend".to_string(),
            ));
        }
        if self.is_production() && self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set in production".to_string(),
            ));
        }
        Ok(())
    }
}

/// In-process defaults, backed by the memory store
impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                url: None,
                max_connections: 10,
                min_connections: 2,
            },
            auth: AuthConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                token_expiry: 86400,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            bootstrap: BootstrapConfig {
                admin_name: "Admin User".to_string(),
                admin_email: "admin@example.com".to_string(),
                admin_password: "admin123".to_string(),
                seed_demo_data: false,
            },
            logging: LoggingConfig {
                format: LogFormat::Pretty,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}
