//! Booking Intervals

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

/// Errors raised when building an interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// The end instant is not strictly after the start instant.
    #[error("end time must be after start time")]
    EndNotAfterStart,
}

/// A half-open `[starts_at, ends_at)` span of time a space is booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingInterval {
    starts_at: Timestamp,
    ends_at: Timestamp,
}

impl BookingInterval {
    /// Create a new interval.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError::EndNotAfterStart`] unless `ends_at > starts_at`.
    pub fn new(starts_at: Timestamp, ends_at: Timestamp) -> Result<Self, IntervalError> {
        if ends_at <= starts_at {
            return Err(IntervalError::EndNotAfterStart);
        }

        Ok(Self { starts_at, ends_at })
    }

    /// Start instant (inclusive).
    pub fn starts_at(&self) -> Timestamp {
        self.starts_at
    }

    /// End instant (exclusive).
    pub fn ends_at(&self) -> Timestamp {
        self.ends_at
    }

    /// Length of the interval.
    pub fn duration(&self) -> SignedDuration {
        self.ends_at.duration_since(self.starts_at)
    }

    /// Two intervals overlap when each starts before the other ends.
    ///
    /// Back-to-back intervals (`a.ends_at == b.starts_at`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }

    /// Whether `instant` falls inside the interval.
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.starts_at <= instant && instant < self.ends_at
    }

    /// Time left before the interval starts, negative once it has started.
    pub fn notice_at(&self, now: Timestamp) -> SignedDuration {
        self.starts_at.duration_since(now)
    }
}
