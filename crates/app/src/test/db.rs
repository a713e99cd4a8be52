//! Database test utilities and shared infrastructure

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, migrate::MigrateError};
use testcontainers::{ContainerAsync, ImageExt, TestcontainersError, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use thiserror::Error;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

const TEST_USER: &str = "reserva_test";
const TEST_PASSWORD: &str = "reserva_test_password";

#[derive(Debug, Error)]
pub enum TestDbError {
    #[error("invalid database name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("failed to start PostgreSQL container")]
    Container(#[from] TestcontainersError),

    #[error("database error")]
    Sql(#[from] sqlx::Error),

    #[error("failed to run migrations")]
    Migrate(#[from] MigrateError),
}

/// Database names must be 1-63 characters, start with a letter or
/// underscore, and contain only letters, digits and underscores.
fn validate_database_name(name: &str) -> Result<(), TestDbError> {
    let invalid = |reason| TestDbError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() || name.len() > 63 {
        return Err(invalid("must be 1-63 characters long"));
    }

    if !name
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
    {
        return Err(invalid("must start with a letter or underscore"));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("may only contain letters, digits and underscores"));
    }

    Ok(())
}

async fn init_postgres_container() -> Result<ContainerAsync<PostgresImage>, TestcontainersError> {
    PostgresImage::default()
        .with_user(TEST_USER)
        .with_password(TEST_PASSWORD)
        .with_db_name("reserva_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
}

/// Shared PostgreSQL container that starts once and is reused across all tests
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            if let Err(err) = cleanup_database(&db_name).await {
                eprintln!("Failed to cleanup database '{db_name}': {err}");
            }
        }
    });

    sender
}

fn host() -> String {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
}

fn database_url(port: u16, db_name: &str) -> String {
    format!(
        "postgresql://{TEST_USER}:{TEST_PASSWORD}@{}:{port}/{db_name}",
        host()
    )
}

async fn cleanup_database(db_name: &str) -> Result<(), TestDbError> {
    let Some(container) = POSTGRES_CONTAINER.get() else {
        return Ok(());
    };

    validate_database_name(db_name)?;

    let port = container.get_host_port_ipv4(5432).await?;
    let mut conn = PgConnection::connect(&database_url(port, "postgres")).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\""))
        .execute(&mut conn)
        .await?;

    conn.close().await?;

    Ok(())
}

/// A migrated database of its own inside the shared container.
///
/// The database is dropped in the background when the `TestDb` goes out of
/// scope.
#[derive(Debug, Clone)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    /// Create an isolated test database with a unique generated name.
    pub async fn new() -> Result<Self, TestDbError> {
        Self::new_with_db_name(&format!("reserva_test_{}", Uuid::now_v7().simple())).await
    }

    /// Create an isolated test database with the given name.
    pub async fn new_with_db_name(db_name: &str) -> Result<Self, TestDbError> {
        validate_database_name(db_name)?;

        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        let container = POSTGRES_CONTAINER
            .get_or_try_init(init_postgres_container)
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;

        let mut conn = PgConnection::connect(&database_url(port, "postgres")).await?;

        sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut conn)
            .await?;

        conn.close().await?;

        let pool = PgPool::connect(&database_url(port, db_name)).await?;

        sqlx::migrate!("../../migrations").run(&pool).await?;

        Ok(Self {
            pool,
            name: db_name.to_string(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn accepts_generated_style_names() {
        assert!(validate_database_name("reserva_test_0196abcdef").is_ok());
        assert!(validate_database_name("_underscore_start").is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["", "123invalid", "has-hyphen", "has space", "quote\"d"] {
            assert!(
                validate_database_name(name).is_err(),
                "expected '{name}' to be rejected"
            );
        }

        assert!(validate_database_name(&"a".repeat(64)).is_err());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn container_serves_migrated_database() -> TestResult {
        let test_db = TestDb::new().await?;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_name IN ('users', 'spaces', 'space_schedules', 'reservations')",
        )
        .fetch_one(test_db.pool())
        .await?;

        assert_eq!(tables, 4);

        Ok(())
    }
}
