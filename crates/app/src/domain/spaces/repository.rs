//! Spaces Repository

use async_trait::async_trait;
use jiff::civil::Weekday;
use jiff_sqlx::Time as SqlxTime;
use mockall::automock;
use reserva::schedule::{DayWindows, WeeklyWindow};
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::Db,
    domain::spaces::models::{Space, SpaceUuid},
};

const FIND_SPACE_SQL: &str = include_str!("sql/find_space.sql");
const FIND_WINDOWS_SQL: &str = include_str!("sql/find_windows.sql");

/// Read access to spaces and their weekly operating hours.
#[automock]
#[async_trait]
pub trait SpacesRepository: Send + Sync {
    /// Load a space, `None` when missing.
    async fn find_space(&self, space: SpaceUuid) -> Result<Option<Space>, sqlx::Error>;

    /// Operating windows of `space` on `weekday`, ordered by opening time.
    async fn find_windows(
        &self,
        space: SpaceUuid,
        weekday: Weekday,
    ) -> Result<DayWindows, sqlx::Error>;
}

/// PostgreSQL-backed spaces repository.
#[derive(Debug, Clone)]
pub struct PgSpacesRepository {
    db: Db,
}

impl PgSpacesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SpacesRepository for PgSpacesRepository {
    async fn find_space(&self, space: SpaceUuid) -> Result<Option<Space>, sqlx::Error> {
        query_as::<Postgres, Space>(FIND_SPACE_SQL)
            .bind(space.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn find_windows(
        &self,
        space: SpaceUuid,
        weekday: Weekday,
    ) -> Result<DayWindows, sqlx::Error> {
        let rows = query_as::<Postgres, WindowRow>(FIND_WINDOWS_SQL)
            .bind(space.into_uuid())
            .bind(i16::from(weekday.to_monday_one_offset()))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }
}

impl<'r> FromRow<'r, PgRow> for Space {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let capacity = u32::try_from(row.try_get::<i32, _>("capacity")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "capacity".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            uuid: SpaceUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            capacity,
            location: row.try_get("location")?,
            outdoor: row.try_get("outdoor")?,
            active: row.try_get("active")?,
        })
    }
}

struct WindowRow(WeeklyWindow);

impl<'r> FromRow<'r, PgRow> for WindowRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let weekday = i8::try_from(row.try_get::<i16, _>("weekday")?)
            .ok()
            .and_then(|offset| Weekday::from_monday_one_offset(offset).ok())
            .ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "weekday".to_string(),
                source: "weekday must be between 1 and 7".into(),
            })?;

        let window = WeeklyWindow::new(
            weekday,
            row.try_get::<SqlxTime, _>("opens_at")?.to_jiff(),
            row.try_get::<SqlxTime, _>("closes_at")?.to_jiff(),
        )
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "closes_at".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self(window))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn finds_space_and_its_weekday_windows() -> TestResult {
        let ctx = TestContext::new().await?;
        let space = ctx.seed_space("Gimnasio Municipal", true).await?;

        ctx.seed_window(space, Weekday::Monday, time(13, 0, 0, 0), time(17, 0, 0, 0))
            .await?;
        ctx.seed_window(space, Weekday::Monday, time(8, 0, 0, 0), time(12, 0, 0, 0))
            .await?;
        ctx.seed_window(space, Weekday::Tuesday, time(8, 0, 0, 0), time(12, 0, 0, 0))
            .await?;

        let found = ctx.spaces.find_space(space).await?;

        assert!(
            matches!(&found, Some(s) if s.active && s.name == "Gimnasio Municipal"),
            "expected seeded space, got {found:?}"
        );

        let monday = ctx.spaces.find_windows(space, Weekday::Monday).await?;

        assert_eq!(monday.len(), 2);
        assert_eq!(
            monday.first().map(WeeklyWindow::opens_at),
            Some(time(8, 0, 0, 0))
        );

        let sunday = ctx.spaces.find_windows(space, Weekday::Sunday).await?;

        assert!(sunday.is_empty());

        Ok(())
    }
}
