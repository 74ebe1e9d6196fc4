//! Command-line and environment configuration.

use std::net::SocketAddr;

use axum::http::HeaderName;
use axum::http::header::InvalidHeaderName;
use clap::Parser;
use warden_admin::AdminConfig;
use warden_db::DbConfig;

/// Warden admin server
#[derive(Parser, Debug, Clone)]
#[command(name = "warden", version, about = "Resource server administration API", long_about = None)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080", env = "WARDEN_BIND")]
    pub bind: SocketAddr,

    /// SurrealDB endpoint
    #[arg(long, default_value = "ws://127.0.0.1:8000", env = "WARDEN_DB_URL")]
    pub db_url: String,

    #[arg(long, default_value = "warden", env = "WARDEN_DB_NAMESPACE")]
    pub db_namespace: String,

    #[arg(long, default_value = "main", env = "WARDEN_DB_DATABASE")]
    pub db_database: String,

    #[arg(long, default_value = "root", env = "WARDEN_DB_USER")]
    pub db_user: String,

    #[arg(long, default_value = "root", env = "WARDEN_DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Use an embedded in-memory store instead of `--db-url`
    #[arg(long, env = "WARDEN_MEMORY_DB")]
    pub memory: bool,

    /// Trusted header carrying the authenticated principal
    #[arg(long, default_value = "x-authenticated-user", env = "WARDEN_IDENTITY_HEADER")]
    pub identity_header: String,

    /// Attempts at generating non-colliding credentials on create
    #[arg(long, default_value_t = 3, env = "WARDEN_CREDENTIAL_ATTEMPTS")]
    pub credential_attempts: u32,

    /// Maximum distinct scopes per resource server
    #[arg(long, default_value_t = 100, env = "WARDEN_MAX_SCOPES")]
    pub max_scopes: usize,

    /// Emit logs as JSON
    #[arg(long, env = "WARDEN_JSON_LOGS")]
    pub json_logs: bool,
}

impl ServerArgs {
    pub fn db_config(&self) -> DbConfig {
        if self.memory {
            return DbConfig {
                namespace: self.db_namespace.clone(),
                database: self.db_database.clone(),
                ..DbConfig::in_memory()
            };
        }
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_user.clone(),
            password: self.db_password.clone(),
        }
    }

    pub fn admin_config(&self) -> AdminConfig {
        AdminConfig {
            credential_attempts: self.credential_attempts,
            max_scopes: self.max_scopes,
            ..AdminConfig::default()
        }
    }

    pub fn identity_header(&self) -> Result<HeaderName, InvalidHeaderName> {
        HeaderName::try_from(self.identity_header.as_str())
    }
}
