//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where the key-value slots live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// A SQLite database at `DATABASE_URL`.
    Sqlite,
    /// Process memory; everything is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("'{}' is not one of sqlite, memory", other)),
        }
    }
}

/// How passwords are stored and compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialScheme {
    Plaintext,
    Argon2,
}

impl FromStr for CredentialScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plaintext" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => Err(format!("'{}' is not one of plaintext, argon2", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub log_level: Level,
    pub credential_scheme: CredentialScheme,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // --- Server and Storage Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "127.0.0.1:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let storage_backend = var_or("STORAGE_BACKEND", "sqlite")
            .parse::<StorageBackend>()
            .map_err(|e| ConfigError::InvalidValue("STORAGE_BACKEND".to_string(), e))?;

        let database_url = var_or("DATABASE_URL", "sqlite://course_catalog.db?mode=rwc");
        if storage_backend == StorageBackend::Sqlite && database_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Auth and HTTP Settings ---
        let credential_scheme = var_or("CREDENTIAL_SCHEME", "plaintext")
            .parse::<CredentialScheme>()
            .map_err(|e| ConfigError::InvalidValue("CREDENTIAL_SCHEME".to_string(), e))?;

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");

        Ok(Self {
            bind_address,
            storage_backend,
            database_url,
            log_level,
            credential_scheme,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.database_url, "sqlite://course_catalog.db?mode=rwc");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.credential_scheme, CredentialScheme::Plaintext);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("STORAGE_BACKEND", "Memory"),
            ("CREDENTIAL_SCHEME", "argon2"),
            ("RUST_LOG", "debug"),
            ("BIND_ADDRESS", "0.0.0.0:8080"),
        ])
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.credential_scheme, CredentialScheme::Argon2);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.bind_address.port(), 8080);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = load(&[("CREDENTIAL_SCHEME", "rot13")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "CREDENTIAL_SCHEME"));

        let err = load(&[("BIND_ADDRESS", "not-an-address")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "BIND_ADDRESS"));
    }

    #[test]
    fn sqlite_needs_a_database_url() {
        let err = load(&[("DATABASE_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
        assert!(load(&[("DATABASE_URL", ""), ("STORAGE_BACKEND", "memory")]).is_ok());
    }
}
