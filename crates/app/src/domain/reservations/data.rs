//! Reservations Data

use jiff::Timestamp;
use reserva::status::ReservationStatus;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::domain::{
    reservations::models::{RateUuid, Reservation},
    spaces::models::SpaceUuid,
    users::models::{User, UserUuid},
};

/// New Reservation Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub space_uuid: SpaceUuid,
    pub user_uuid: UserUuid,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub total_amount: Decimal,

    /// ISO-4217 code; the policy default applies when `None`.
    pub currency: Option<String>,

    pub rate_uuid: Option<RateUuid>,
}

/// Per-status counts of a user's reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationSummary {
    pub user_uuid: UserUuid,
    pub display_name: String,
    pub email: String,
    pub total: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    pub pending: u64,
    pub completed: u64,

    /// Sum of `total_amount` over confirmed reservations.
    pub amount_paid: Decimal,
}

impl ReservationSummary {
    /// Tally `reservations` for `user`.
    pub fn tally(user: &User, reservations: &[Reservation]) -> Self {
        let mut counts: FxHashMap<ReservationStatus, u64> = FxHashMap::default();
        let mut amount_paid = Decimal::ZERO;

        for reservation in reservations {
            *counts.entry(reservation.status).or_default() += 1;

            if reservation.status == ReservationStatus::Confirmed {
                amount_paid += reservation.total_amount;
            }
        }

        let count = |status| counts.get(&status).copied().unwrap_or_default();

        Self {
            user_uuid: user.uuid,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            total: counts.values().sum(),
            confirmed: count(ReservationStatus::Confirmed),
            cancelled: count(ReservationStatus::Cancelled),
            pending: count(ReservationStatus::Pending),
            completed: count(ReservationStatus::Completed),
            amount_paid,
        }
    }
}

/// What a confirmed reservation holder presents at the door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendancePass {
    /// Base64 PNG of the QR code.
    pub qr_code: String,

    /// Out-of-band validation token.
    pub validation_token: String,
}
