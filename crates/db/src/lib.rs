//! Database access for libris.
//!
//! Owns the process-wide connection pool: constructed once during bootstrap
//! from the configured connection string, handed to modules through the init
//! context, and closed during the shutdown sequence. Modules never reach for
//! ambient global state.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

/// Errors surfaced by the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database at '{url}'")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration '{module}/{id}' failed")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A migration statement contributed by a module, identified by the pair
/// (module name, migration id).
#[derive(Debug, Clone, Copy)]
pub struct MigrationScript<'a> {
    pub module: &'a str,
    pub id: &'a str,
    pub sql: &'a str,
}

/// Handle to the shared connection pool.
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open a pool against the given connection string
    /// (`sqlite:path/to.db`, `sqlite::memory:`). Creates the database file
    /// if it does not exist yet.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?;

        tracing::info!(target: "libris-db", url, max_connections, "database pool ready");

        Ok(Self { pool })
    }

    /// Borrow the underlying pool. Repositories clone it; the pool itself is
    /// reference-counted.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply each migration exactly once, tracked in the `schema_migrations`
    /// ledger table. Already-applied entries are skipped, so re-running the
    /// full set on startup is safe.
    pub async fn apply_migrations(&self, scripts: &[MigrationScript<'_>]) -> Result<(), DbError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                 module TEXT NOT NULL,
                 id     TEXT NOT NULL,
                 PRIMARY KEY (module, id)
             )",
        )
        .execute(&self.pool)
        .await?;

        for script in scripts {
            let applied: Option<(i64,)> =
                sqlx::query_as("SELECT 1 FROM schema_migrations WHERE module = ?1 AND id = ?2")
                    .bind(script.module)
                    .bind(script.id)
                    .fetch_optional(&self.pool)
                    .await?;

            if applied.is_some() {
                tracing::debug!(
                    target: "libris-db",
                    module = script.module,
                    id = script.id,
                    "migration already applied"
                );
                continue;
            }

            sqlx::raw_sql(script.sql)
                .execute(&self.pool)
                .await
                .map_err(|source| DbError::Migration {
                    module: script.module.to_string(),
                    id: script.id.to_string(),
                    source,
                })?;

            sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?1, ?2)")
                .bind(script.module)
                .bind(script.id)
                .execute(&self.pool)
                .await?;

            tracing::info!(
                target: "libris-db",
                module = script.module,
                id = script.id,
                "migration applied"
            );
        }

        Ok(())
    }

    /// Close the pool. Part of the scoped shutdown sequence.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "libris-db", "database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Db {
        Db::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory database should open")
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let db = memory_db().await;
        let scripts = [MigrationScript {
            module: "books",
            id: "001_init",
            sql: "CREATE TABLE books_test (isbn TEXT PRIMARY KEY)",
        }];

        db.apply_migrations(&scripts).await.unwrap();
        // Second run must skip the already-applied script instead of failing
        // on the duplicate CREATE TABLE.
        db.apply_migrations(&scripts).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn failing_migration_reports_module_and_id() {
        let db = memory_db().await;
        let scripts = [MigrationScript {
            module: "books",
            id: "002_broken",
            sql: "THIS IS NOT SQL",
        }];

        let err = db.apply_migrations(&scripts).await.unwrap_err();
        match err {
            DbError::Migration { module, id, .. } => {
                assert_eq!(module, "books");
                assert_eq!(id, "002_broken");
            }
            other => panic!("expected migration error, got {other:?}"),
        }
    }

}
