//! Service configuration read from the environment.

use anyhow::{bail, Context};

/// Which record store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String, max_connections: u32 },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreBackend,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from process environment (after `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store = match var("STORE").as_deref().unwrap_or("postgres") {
            "postgres" => {
                let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
                let max_connections = match var("DB_MAX_CONNECTIONS") {
                    Some(raw) => raw
                        .parse()
                        .with_context(|| format!("invalid DB_MAX_CONNECTIONS: {raw}"))?,
                    None => 10,
                };
                StoreBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            "memory" => StoreBackend::Memory,
            other => bail!("unknown STORE '{other}', expected 'postgres' or 'memory'"),
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid PORT: {raw}"))?,
            None => 3000,
        };

        Ok(Self { store, host, port })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_postgres() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/vocab")]))
            .unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/vocab".to_string(),
                max_connections: 10,
            }
        );
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn memory_store_needs_no_database() {
        let config =
            Config::from_lookup(lookup(&[("STORE", "memory"), ("PORT", "8080")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("STORE", "redis")])).is_err());
        assert!(Config::from_lookup(lookup(&[("STORE", "memory"), ("PORT", "http")])).is_err());
    }
}
