//! Reservations Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use reserva::status::ReservationStatus;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        reservations::models::{RateUuid, Reservation, ReservationUuid},
        spaces::models::SpaceUuid,
        users::models::UserUuid,
    },
};

const FIND_RESERVATION_SQL: &str = include_str!("sql/find_reservation.sql");
const FIND_USER_RESERVATIONS_SQL: &str = include_str!("sql/find_user_reservations.sql");
const FIND_OVERLAPPING_SQL: &str = include_str!("sql/find_overlapping.sql");
const FIND_EXPIRED_PENDING_SQL: &str = include_str!("sql/find_expired_pending.sql");
const SAVE_RESERVATION_SQL: &str = include_str!("sql/save_reservation.sql");
const DELETE_RESERVATION_SQL: &str = include_str!("sql/delete_reservation.sql");
const RESERVATION_EXISTS_SQL: &str = include_str!("sql/reservation_exists.sql");
const COUNT_BY_STATUS_SQL: &str = include_str!("sql/count_by_status.sql");

/// Persistence for reservations.
#[automock]
#[async_trait]
pub trait ReservationsRepository: Send + Sync {
    /// Load a reservation, `None` when missing.
    async fn find_reservation(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Option<Reservation>, sqlx::Error>;

    /// Every reservation held by `user`.
    async fn find_user_reservations(&self, user: UserUuid)
    -> Result<Vec<Reservation>, sqlx::Error>;

    /// Non-cancelled reservations on `space` intersecting `[starts_at, ends_at)`.
    async fn find_overlapping(
        &self,
        space: SpaceUuid,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<Vec<Reservation>, sqlx::Error>;

    /// Pending reservations whose start is at or before `now`.
    async fn find_expired_pending(&self, now: Timestamp) -> Result<Vec<Reservation>, sqlx::Error>;

    /// Insert or update a reservation.
    async fn save(&self, reservation: &Reservation) -> Result<Reservation, sqlx::Error>;

    /// Insert or update many reservations atomically.
    async fn save_all(&self, reservations: &[Reservation]) -> Result<u64, sqlx::Error>;

    /// Remove a reservation, returning whether a row was deleted.
    async fn delete(&self, reservation: ReservationUuid) -> Result<bool, sqlx::Error>;

    /// Whether a reservation with this id exists.
    async fn exists(&self, reservation: ReservationUuid) -> Result<bool, sqlx::Error>;

    /// Number of reservations whose status is one of `statuses`.
    async fn count_by_status_in(&self, statuses: &[ReservationStatus]) -> Result<u64, sqlx::Error>;
}

/// PostgreSQL-backed reservations repository.
#[derive(Debug, Clone)]
pub struct PgReservationsRepository {
    db: Db,
}

impl PgReservationsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn upsert(
        tx: &mut Transaction<'_, Postgres>,
        reservation: &Reservation,
    ) -> Result<Reservation, sqlx::Error> {
        query_as::<Postgres, Reservation>(SAVE_RESERVATION_SQL)
            .bind(reservation.uuid.into_uuid())
            .bind(reservation.space_uuid.into_uuid())
            .bind(reservation.user_uuid.into_uuid())
            .bind(SqlxTimestamp::from(reservation.starts_at))
            .bind(SqlxTimestamp::from(reservation.ends_at))
            .bind(reservation.status.as_str())
            .bind(reservation.total_amount)
            .bind(&reservation.currency)
            .bind(reservation.qr_code.as_deref())
            .bind(reservation.qr_validation_token.as_deref())
            .bind(reservation.attendance_confirmed)
            .bind(reservation.attendance_confirmed_at.map(SqlxTimestamp::from))
            .bind(reservation.confirmed_by.map(UserUuid::into_uuid))
            .bind(reservation.cancel_reason.as_deref())
            .bind(reservation.rate_uuid.map(RateUuid::into_uuid))
            .bind(SqlxTimestamp::from(reservation.created_at))
            .bind(SqlxTimestamp::from(reservation.updated_at))
            .fetch_one(&mut **tx)
            .await
    }
}

#[async_trait]
impl ReservationsRepository for PgReservationsRepository {
    async fn find_reservation(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        query_as::<Postgres, Reservation>(FIND_RESERVATION_SQL)
            .bind(reservation.into_uuid())
            .fetch_optional(self.db.pool())
            .await
    }

    async fn find_user_reservations(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        query_as::<Postgres, Reservation>(FIND_USER_RESERVATIONS_SQL)
            .bind(user.into_uuid())
            .fetch_all(self.db.pool())
            .await
    }

    async fn find_overlapping(
        &self,
        space: SpaceUuid,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        query_as::<Postgres, Reservation>(FIND_OVERLAPPING_SQL)
            .bind(space.into_uuid())
            .bind(SqlxTimestamp::from(starts_at))
            .bind(SqlxTimestamp::from(ends_at))
            .fetch_all(self.db.pool())
            .await
    }

    async fn find_expired_pending(&self, now: Timestamp) -> Result<Vec<Reservation>, sqlx::Error> {
        query_as::<Postgres, Reservation>(FIND_EXPIRED_PENDING_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(self.db.pool())
            .await
    }

    async fn save(&self, reservation: &Reservation) -> Result<Reservation, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let saved = Self::upsert(&mut tx, reservation).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn save_all(&self, reservations: &[Reservation]) -> Result<u64, sqlx::Error> {
        let mut tx = self.db.begin().await?;
        let mut saved = 0;

        for reservation in reservations {
            Self::upsert(&mut tx, reservation).await?;
            saved += 1;
        }

        tx.commit().await?;

        Ok(saved)
    }

    async fn delete(&self, reservation: ReservationUuid) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DELETE_RESERVATION_SQL)
            .bind(reservation.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn exists(&self, reservation: ReservationUuid) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(RESERVATION_EXISTS_SQL)
            .bind(reservation.into_uuid())
            .fetch_one(self.db.pool())
            .await
    }

    async fn count_by_status_in(&self, statuses: &[ReservationStatus]) -> Result<u64, sqlx::Error> {
        let statuses: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();

        let count = query_scalar::<Postgres, i64>(COUNT_BY_STATUS_SQL)
            .bind(statuses)
            .fetch_one(self.db.pool())
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Reservation {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<ReservationStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ReservationUuid::from_uuid(row.try_get("uuid")?),
            space_uuid: SpaceUuid::from_uuid(row.try_get("space_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            status,
            total_amount: row.try_get("total_amount")?,
            currency: row.try_get("currency")?,
            qr_code: row.try_get("qr_code")?,
            qr_validation_token: row.try_get("qr_validation_token")?,
            attendance_confirmed: row.try_get("attendance_confirmed")?,
            attendance_confirmed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("attendance_confirmed_at")?
                .map(SqlxTimestamp::to_jiff),
            confirmed_by: row
                .try_get::<Option<Uuid>, _>("confirmed_by_uuid")?
                .map(UserUuid::from_uuid),
            cancel_reason: row.try_get("cancel_reason")?,
            rate_uuid: row
                .try_get::<Option<Uuid>, _>("rate_uuid")?
                .map(RateUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
