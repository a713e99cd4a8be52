//! Reserva Domain Concerns

use std::sync::Arc;

use crate::database::Db;

pub mod reservations;
pub mod spaces;
pub mod users;

use reservations::{PgReservationsRepository, ReservationsRepository};
use spaces::{PgSpacesRepository, SpacesRepository};
use users::{PgUsersRepository, UsersRepository};

/// Storage collaborators shared by the services and the sweeper.
#[derive(Clone)]
pub struct Repositories {
    pub reservations: Arc<dyn ReservationsRepository>,
    pub spaces: Arc<dyn SpacesRepository>,
    pub users: Arc<dyn UsersRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories over one pool.
    #[must_use]
    pub fn postgres(db: &Db) -> Self {
        Self {
            reservations: Arc::new(PgReservationsRepository::new(db.clone())),
            spaces: Arc::new(PgSpacesRepository::new(db.clone())),
            users: Arc::new(PgUsersRepository::new(db.clone())),
        }
    }
}
