//! New reservation validation.

use reserva::{interval::BookingInterval, money::find_currency, validation::ValidationErrors};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::{domain::reservations::data::NewReservation, policy::ReservationPolicy};

/// A booking request whose fields passed validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidatedBooking {
    pub(crate) interval: BookingInterval,
    pub(crate) currency: &'static Currency,
}

/// Check every field of `request`, collecting all failures.
pub(crate) fn validate_new_reservation(
    request: &NewReservation,
    policy: &ReservationPolicy,
) -> Result<ValidatedBooking, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let interval = BookingInterval::new(request.starts_at, request.ends_at)
        .map_err(|error| errors.push("ends_at", error.to_string()))
        .ok();

    if request.total_amount < Decimal::ZERO {
        errors.push("total_amount", "total amount must not be negative");
    }

    let currency = match request.currency.as_deref() {
        None => Some(policy.default_currency),
        Some(code) => find_currency(code)
            .map_err(|error| errors.push("currency", error.to_string()))
            .ok(),
    };

    match (interval, currency) {
        (Some(interval), Some(currency)) if errors.is_empty() => {
            Ok(ValidatedBooking { interval, currency })
        }
        _ => Err(errors),
    }
}
