//! Reservation Policy

use jiff::{
    SignedDuration,
    tz::{self, TimeZone},
};
use reserva::identity::{AccessPolicy, Claims, IdentityError, Principal, resolve_principal};
use rusty_money::iso::{self, Currency};

/// Time zone bookings are checked and reported in unless configured otherwise.
pub const DEFAULT_TIME_ZONE: &str = "America/Costa_Rica";

/// Notice a regular user must give before cancelling.
pub const DEFAULT_MIN_CANCELLATION_NOTICE: SignedDuration = SignedDuration::from_hours(24);

/// Business rules shared by the reservation services and the sweeper.
///
/// Built once at start-up and handed to each service.
#[derive(Debug, Clone)]
pub struct ReservationPolicy {
    /// Minimum time between a user's cancellation and the booking start.
    pub min_cancellation_notice: SignedDuration,

    /// Municipal time zone for operating hours and sweeper messages.
    pub time_zone: TimeZone,

    /// Currency applied when a request names none.
    pub default_currency: &'static Currency,

    /// Which identities may act.
    pub access: AccessPolicy,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            min_cancellation_notice: DEFAULT_MIN_CANCELLATION_NOTICE,
            time_zone: municipal_time_zone(),
            default_currency: iso::CRC,
            access: AccessPolicy::default(),
        }
    }
}

impl ReservationPolicy {
    /// Resolve the acting principal from token claims under the email-domain
    /// allow-list.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] when the claims carry no usable email, the
    /// domain is not allowed, or the role is unknown.
    pub fn authorize(&self, claims: &Claims) -> Result<Principal, IdentityError> {
        resolve_principal(claims, &self.access)
    }
}

/// The default municipal zone, or its fixed UTC-6 offset when the zone
/// database has no entry for it.
pub fn municipal_time_zone() -> TimeZone {
    TimeZone::get(DEFAULT_TIME_ZONE).unwrap_or_else(|_| TimeZone::fixed(tz::offset(-6)))
}

/// Display name for a zone: its IANA name when known, otherwise `fallback`.
pub(crate) fn zone_label(time_zone: &TimeZone, fallback: impl ToString) -> String {
    time_zone
        .iana_name()
        .map_or_else(|| fallback.to_string(), str::to_string)
}
