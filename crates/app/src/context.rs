//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        Repositories,
        reservations::{
            AttendanceService, DefaultAttendanceService, DefaultReservationsService,
            ReservationSweeper, ReservationsService,
        },
    },
    policy::ReservationPolicy,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub reservations: Arc<dyn ReservationsService>,
    pub attendance: Arc<dyn AttendanceService>,
    pub sweeper: ReservationSweeper,
    pub policy: Arc<ReservationPolicy>,
}

impl AppContext {
    /// Wire services over the given repositories.
    #[must_use]
    pub fn new(repositories: Repositories, policy: ReservationPolicy) -> Self {
        let policy = Arc::new(policy);

        Self {
            reservations: Arc::new(DefaultReservationsService::new(
                repositories.clone(),
                Arc::clone(&policy),
            )),
            attendance: Arc::new(DefaultAttendanceService::new(Arc::clone(
                &repositories.reservations,
            ))),
            sweeper: ReservationSweeper::new(repositories.reservations, policy.time_zone.clone()),
            policy,
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        policy: ReservationPolicy,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::new(Repositories::postgres(&Db::new(pool)), policy))
    }
}
