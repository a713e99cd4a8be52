//! Reservation Status

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Booked, awaiting confirmation.
    Pending,

    /// Confirmed by staff or payment.
    Confirmed,

    /// Cancelled explicitly or by the sweeper. Terminal.
    Cancelled,

    /// The booked slot has been used. Terminal.
    Completed,
}

/// Errors raised when changing or parsing a status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// The requested transition is not part of the lifecycle.
    #[error("cannot move reservation from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ReservationStatus,

        /// Requested status.
        to: ReservationStatus,
    },

    /// The text does not name a known status.
    #[error("unknown reservation status `{0}`")]
    Unknown(String),
}

impl ReservationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Persisted, upper-case representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Terminal statuses can never be left.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether `self -> next` is an allowed lifecycle step.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed)
        )
    }

    /// Validate a transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::InvalidTransition`] when the step is not allowed.
    pub fn transition(self, next: Self) -> Result<Self, StatusError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = StatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| StatusError::Unknown(value.to_string()))
    }
}
