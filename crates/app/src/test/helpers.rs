//! Test Helpers

use std::sync::Arc;

use jiff::{
    Timestamp, ToSpan,
    civil::date,
    tz::{self, TimeZone},
};
use reserva::{identity::Role, status::ReservationStatus};
use rust_decimal::Decimal;

use crate::{
    domain::{
        Repositories,
        reservations::{
            MockReservationsRepository,
            models::{Reservation, ReservationUuid},
        },
        spaces::{
            MockSpacesRepository,
            models::{Space, SpaceUuid},
        },
        users::{
            MockUsersRepository,
            models::{User, UserUuid},
        },
    },
    policy::ReservationPolicy,
};

/// Default policy pinned to a fixed UTC-6 zone.
pub(crate) fn test_policy() -> ReservationPolicy {
    ReservationPolicy {
        time_zone: TimeZone::fixed(tz::offset(-6)),
        ..ReservationPolicy::default()
    }
}

/// Monday 2026-03-02 08:00 at UTC-6.
pub(crate) fn monday_morning() -> Result<Timestamp, jiff::Error> {
    Ok(date(2026, 3, 2)
        .at(8, 0, 0, 0)
        .to_zoned(TimeZone::fixed(tz::offset(-6)))?
        .timestamp())
}

pub(crate) fn pending_reservation(
    space: SpaceUuid,
    user: UserUuid,
    starts_at: Timestamp,
    hours: i64,
) -> Result<Reservation, jiff::Error> {
    let created_at = starts_at.checked_sub(72.hours())?;

    Ok(Reservation {
        uuid: ReservationUuid::new(),
        space_uuid: space,
        user_uuid: user,
        starts_at,
        ends_at: starts_at.checked_add(hours.hours())?,
        status: ReservationStatus::Pending,
        total_amount: Decimal::new(5_000, 0),
        currency: "CRC".to_string(),
        qr_code: None,
        qr_validation_token: None,
        attendance_confirmed: false,
        attendance_confirmed_at: None,
        confirmed_by: None,
        cancel_reason: None,
        rate_uuid: None,
        created_at,
        updated_at: created_at,
    })
}

pub(crate) fn active_space(uuid: SpaceUuid) -> Space {
    Space {
        uuid,
        name: "Polideportivo Central".to_string(),
        capacity: 40,
        location: Some("Distrito Central".to_string()),
        outdoor: false,
        active: true,
    }
}

pub(crate) fn user(uuid: UserUuid, role: Role) -> User {
    User {
        uuid,
        display_name: "María Solís".to_string(),
        email: "maria@muni.go.cr".to_string(),
        role,
    }
}

pub(crate) fn repositories(
    reservations: MockReservationsRepository,
    spaces: MockSpacesRepository,
    users: MockUsersRepository,
) -> Repositories {
    Repositories {
        reservations: Arc::new(reservations),
        spaces: Arc::new(spaces),
        users: Arc::new(users),
    }
}
