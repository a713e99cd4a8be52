//! Reservation Models

use jiff::Timestamp;
use reserva::{
    interval::{BookingInterval, IntervalError},
    status::ReservationStatus,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{spaces::models::SpaceUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Reservation UUID
pub type ReservationUuid = TypedUuid<Reservation>;

/// Pricing rate a reservation was charged under.
#[derive(Debug)]
pub struct Rate;

/// Rate UUID
pub type RateUuid = TypedUuid<Rate>;

/// Reservation Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub uuid: ReservationUuid,
    pub space_uuid: SpaceUuid,
    pub user_uuid: UserUuid,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: ReservationStatus,
    pub total_amount: Decimal,
    pub currency: String,
    pub qr_code: Option<String>,
    pub qr_validation_token: Option<String>,
    pub attendance_confirmed: bool,
    pub attendance_confirmed_at: Option<Timestamp>,
    pub confirmed_by: Option<UserUuid>,
    pub cancel_reason: Option<String>,
    pub rate_uuid: Option<RateUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// Booked span.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError`] if the stored bounds are inverted.
    pub fn interval(&self) -> Result<BookingInterval, IntervalError> {
        BookingInterval::new(self.starts_at, self.ends_at)
    }
}
