//! Reservations service errors.

use jiff::SignedDuration;
use reserva::{
    interval::IntervalError, qr::QrError, status::ReservationStatus, validation::ValidationErrors,
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// SQLSTATE raised when the no-overlap exclusion constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Reservation,
    Space,
    User,
}

impl Entity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Reservation => "reservation",
            Self::Space => "space",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReservationsServiceError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("invalid reservation: {0}")]
    Validation(ValidationErrors),

    #[error("the space is already reserved for an overlapping time")]
    Conflict,

    #[error("the requested time is outside the space's operating hours")]
    OutsideOperatingHours,

    #[error("the space is not accepting reservations")]
    SpaceInactive,

    #[error("reservation is already cancelled")]
    AlreadyCancelled,

    #[error("{reason}")]
    CancellationNotAllowed { reason: String },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl ReservationsServiceError {
    /// Rejection for a reservation whose status cannot move to cancelled.
    pub(crate) fn not_cancellable(status: ReservationStatus) -> Self {
        Self::CancellationNotAllowed {
            reason: format!("a {status} reservation cannot be cancelled"),
        }
    }

    /// Rejection for a cancellation that comes too late.
    pub(crate) fn insufficient_notice(notice: SignedDuration) -> Self {
        Self::CancellationNotAllowed {
            reason: format!(
                "reservations must be cancelled at least {} hours before they start",
                notice.as_hours()
            ),
        }
    }
}

impl From<ValidationErrors> for ReservationsServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<IntervalError> for ReservationsServiceError {
    fn from(error: IntervalError) -> Self {
        let mut errors = ValidationErrors::default();
        errors.push("ends_at", error.to_string());
        Self::Validation(errors)
    }
}

impl From<Error> for ReservationsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound(Entity::Reservation);
        }

        if is_exclusion_violation(&error) {
            return Self::Conflict;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => {
                let mut errors = ValidationErrors::default();
                errors.push("reservation", "rejected by storage constraints");
                Self::Validation(errors)
            }
            _ => Self::Sql(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum AttendanceServiceError {
    #[error("reservation not found")]
    NotFound,

    #[error("attendance requires a confirmed reservation, this one is {0}")]
    AttendanceNotAllowed(ReservationStatus),

    #[error("QR code does not match this reservation")]
    InvalidQrCode,

    #[error("attendance already confirmed")]
    AttendanceAlreadyConfirmed,

    #[error(transparent)]
    Qr(#[from] QrError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AttendanceServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            Self::NotFound
        } else {
            Self::Sql(error)
        }
    }
}

fn is_exclusion_violation(error: &Error) -> bool {
    error
        .as_database_error()
        .and_then(DatabaseError::code)
        .is_some_and(|code| code == EXCLUSION_VIOLATION)
}
