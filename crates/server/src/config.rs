use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env`, when present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_addr: SocketAddr,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variables may come from the process
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |key| lookup(key).ok_or(ConfigError::Missing(key));

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    key: "BIND_ADDR",
                    value,
                })?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    key: "BIND_ADDR",
                    value: DEFAULT_BIND_ADDR.to_string(),
                })?,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "RUN_MIGRATIONS",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_addr,
            run_migrations,
        })
    }
}
