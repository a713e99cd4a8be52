//! Users Repository

use async_trait::async_trait;
use mockall::automock;
use reserva::identity::Role;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::Db,
    domain::users::models::{User, UserUuid},
};

const USER_EXISTS_SQL: &str = include_str!("sql/user_exists.sql");
const FIND_USER_SQL: &str = include_str!("sql/find_user.sql");

/// Read access to registered users.
#[automock]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Whether a user with this id is registered.
    async fn user_exists(&self, user: UserUuid) -> Result<bool, sqlx::Error>;

    /// Load a user, `None` when missing.
    async fn find_user(&self, user: UserUuid) -> Result<Option<User>, sqlx::Error>;
}

/// PostgreSQL-backed users repository.
#[derive(Debug, Clone)]
pub struct PgUsersRepository {
    db: Db,
}

impl PgUsersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn user_exists(&self, user: UserUuid) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(USER_EXISTS_SQL)
            .bind(user.into_uuid())
            .fetch_one(self.db.pool())
            .await
    }

    async fn find_user(&self, user: UserUuid) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(FIND_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role = row
            .try_get::<String, _>("role")?
            .parse::<Role>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            display_name: row.try_get("display_name")?,
            email: row.try_get("email")?,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn finds_seeded_user() -> TestResult {
        let ctx = TestContext::new().await?;
        let uuid = ctx.seed_user("Ana Mora", "ana@muni.go.cr", Role::Admin).await?;

        assert!(ctx.users.user_exists(uuid).await?);

        let user = ctx.users.find_user(uuid).await?;

        assert!(
            matches!(&user, Some(found)
                if found.role == Role::Admin && found.display_name == "Ana Mora"),
            "expected seeded admin, got {user:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn unknown_user_is_absent() -> TestResult {
        let ctx = TestContext::new().await?;
        let uuid = UserUuid::new();

        assert!(!ctx.users.user_exists(uuid).await?);
        assert!(ctx.users.find_user(uuid).await?.is_none());

        Ok(())
    }
}
