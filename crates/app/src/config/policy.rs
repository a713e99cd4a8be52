//! Reservation Policy Config

use clap::Args;
use jiff::{SignedDuration, tz::TimeZone};
use reserva::{
    identity::AccessPolicy,
    money::{CurrencyError, DEFAULT_CURRENCY_CODE, find_currency},
};
use reserva_app::policy::{DEFAULT_TIME_ZONE, ReservationPolicy};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum PolicyConfigError {
    #[error("unknown time zone '{name}': {source}")]
    TimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },

    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// Business rule settings.
#[derive(Debug, Args)]
pub(crate) struct PolicyConfig {
    /// Hours of notice a regular user must give to cancel
    #[arg(long, env = "MIN_CANCELLATION_NOTICE_HOURS", default_value_t = 24)]
    pub min_cancellation_notice_hours: u32,

    /// IANA time zone used for operating hours and sweeper messages
    #[arg(long, env = "RESERVATION_TIME_ZONE", default_value = DEFAULT_TIME_ZONE)]
    pub reservation_time_zone: String,

    /// ISO-4217 code applied when a booking names no currency
    #[arg(long, env = "DEFAULT_CURRENCY", default_value = DEFAULT_CURRENCY_CODE)]
    pub default_currency: String,

    /// Comma-separated email domains allowed to act; empty allows all
    #[arg(long, env = "ALLOWED_EMAIL_DOMAINS", value_delimiter = ',')]
    pub allowed_email_domains: Vec<String>,
}

impl PolicyConfig {
    /// Resolve the settings into a [`ReservationPolicy`].
    pub(crate) fn to_policy(&self) -> Result<ReservationPolicy, PolicyConfigError> {
        let time_zone = TimeZone::get(&self.reservation_time_zone).map_err(|source| {
            PolicyConfigError::TimeZone {
                name: self.reservation_time_zone.clone(),
                source,
            }
        })?;

        Ok(ReservationPolicy {
            min_cancellation_notice: SignedDuration::from_hours(i64::from(
                self.min_cancellation_notice_hours,
            )),
            time_zone,
            default_currency: find_currency(&self.default_currency)?,
            access: AccessPolicy::new(&self.allowed_email_domains),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        policy: PolicyConfig,
    }

    #[test]
    fn defaults_resolve_to_municipal_policy() -> TestResult {
        let harness = Harness::try_parse_from(["reserva-app"])?;
        let policy = harness.policy.to_policy()?;

        assert_eq!(
            policy.min_cancellation_notice,
            SignedDuration::from_hours(24)
        );
        assert_eq!(policy.default_currency.iso_alpha_code, "CRC");
        assert_eq!(policy.time_zone.iana_name(), Some(DEFAULT_TIME_ZONE));

        Ok(())
    }

    #[test]
    fn flags_override_every_rule() -> TestResult {
        let harness = Harness::try_parse_from([
            "reserva-app",
            "--min-cancellation-notice-hours",
            "48",
            "--reservation-time-zone",
            "UTC",
            "--default-currency",
            "usd",
            "--allowed-email-domains",
            "muni.go.cr, ,example.org",
        ])?;
        let policy = harness.policy.to_policy()?;

        assert_eq!(policy.min_cancellation_notice.as_hours(), 48);
        assert_eq!(policy.default_currency.iso_alpha_code, "USD");
        assert!(policy.access.allows_domain("MUNI.GO.CR"));
        assert!(policy.access.allows_domain("example.org"));
        assert!(!policy.access.allows_domain("gmail.com"));

        Ok(())
    }

    #[test]
    fn unknown_zone_and_currency_are_rejected() -> TestResult {
        let bad_zone =
            Harness::try_parse_from(["reserva-app", "--reservation-time-zone", "Mars/Olympus"])?;

        assert!(matches!(
            bad_zone.policy.to_policy(),
            Err(PolicyConfigError::TimeZone { .. })
        ));

        let bad_currency = Harness::try_parse_from(["reserva-app", "--default-currency", "ZZZ"])?;

        assert!(matches!(
            bad_currency.policy.to_policy(),
            Err(PolicyConfigError::Currency(_))
        ));

        Ok(())
    }
}
