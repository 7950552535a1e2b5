use std::time::Duration;

use anyhow::{Context, bail};
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

/// SQL dialect behind the `Any` pool, derived from the connection URL scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(database_url: &str) -> anyhow::Result<Self> {
        let scheme = database_url
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .unwrap_or_default();

        match scheme {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => bail!("unsupported database url scheme {other:?}"),
        }
    }
}

#[derive(Clone)]
pub struct Db {
    pub pool: AnyPool,
    pub backend: Backend,
}

impl Db {
    /// Opens the pool and establishes the first connection, so an unreachable
    /// database fails here rather than on the first request.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        sqlx::any::install_default_drivers();

        let backend = Backend::from_url(database_url)?;

        let pool = AnyPoolOptions::new()
            .max_connections(16)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("connect to database")?;

        Ok(Self { pool, backend })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_from_scheme() {
        assert_eq!(
            Backend::from_url("postgres://u:p@localhost:5432/db?sslmode=disable").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("postgresql://localhost/db").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("sqlite:file:rates?mode=memory").unwrap(),
            Backend::Sqlite
        );
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(Backend::from_url("mysql://localhost/db").is_err());
        assert!(Backend::from_url("no-scheme").is_err());
    }
}
