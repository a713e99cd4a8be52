//! Table and JSON rendering for command results.

use jiff::{Timestamp, tz::TimeZone};
use reserva::money::{find_currency, to_money};
use reserva_app::domain::reservations::{
    data::{AttendancePass, ReservationSummary},
    models::Reservation,
};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,

    /// Pretty-printed JSON.
    Json,
}

pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|error| format!("failed to encode JSON: {error}"))
}

fn local(instant: Timestamp, time_zone: &TimeZone) -> String {
    instant
        .to_zoned(time_zone.clone())
        .strftime("%Y-%m-%d %H:%M")
        .to_string()
}

fn amount(value: Decimal, code: &str) -> String {
    find_currency(code).map_or_else(
        |_| format!("{value} {code}"),
        |currency| to_money(value, currency).to_string(),
    )
}

pub(crate) fn reservations_table(reservations: &[Reservation], time_zone: &TimeZone) -> String {
    let mut builder = Builder::default();

    builder.push_record(
        ["Reservation", "Space", "Starts", "Ends", "Status", "Amount", "Attended"],
    );

    for reservation in reservations {
        builder.push_record([
            reservation.uuid.to_string(),
            reservation.space_uuid.to_string(),
            local(reservation.starts_at, time_zone),
            local(reservation.ends_at, time_zone),
            reservation.status.to_string(),
            amount(reservation.total_amount, &reservation.currency),
            if reservation.attendance_confirmed { "yes" } else { "no" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..6), Alignment::right());

    table.to_string()
}

pub(crate) fn summary_table(summary: &ReservationSummary, currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["User".to_string(), summary.user_uuid.to_string()]);
    builder.push_record(["Name".to_string(), summary.display_name.clone()]);
    builder.push_record(["Email".to_string(), summary.email.clone()]);
    builder.push_record(["Total".to_string(), summary.total.to_string()]);
    builder.push_record(["Confirmed".to_string(), summary.confirmed.to_string()]);
    builder.push_record(["Pending".to_string(), summary.pending.to_string()]);
    builder.push_record(["Cancelled".to_string(), summary.cancelled.to_string()]);
    builder.push_record(["Completed".to_string(), summary.completed.to_string()]);
    builder.push_record([
        "Amount paid".to_string(),
        to_money(summary.amount_paid, currency).to_string(),
    ]);

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table.to_string()
}

pub(crate) fn pass_table(pass: &AttendancePass) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Validation token", "QR code (base64 PNG)"]);
    builder.push_record([pass.validation_token.as_str(), pass.qr_code.as_str()]);

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table.to_string()
}

#[cfg(test)]
mod tests {
    use jiff::tz;
    use reserva::status::ReservationStatus;
    use reserva_app::domain::{
        reservations::models::ReservationUuid, spaces::models::SpaceUuid, users::models::UserUuid,
    };
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn reservation(currency: &str) -> TestResult<Reservation> {
        let starts_at: Timestamp = "2026-03-02T14:00:00Z".parse()?;

        Ok(Reservation {
            uuid: ReservationUuid::new(),
            space_uuid: SpaceUuid::new(),
            user_uuid: UserUuid::new(),
            starts_at,
            ends_at: "2026-03-02T16:00:00Z".parse()?,
            status: ReservationStatus::Confirmed,
            total_amount: Decimal::new(15_000, 0),
            currency: currency.to_string(),
            qr_code: None,
            qr_validation_token: None,
            attendance_confirmed: false,
            attendance_confirmed_at: None,
            confirmed_by: None,
            cancel_reason: None,
            rate_uuid: None,
            created_at: starts_at,
            updated_at: starts_at,
        })
    }

    #[test]
    fn reservation_rows_use_local_time() -> TestResult {
        let booked = reservation("CRC")?;
        let table = reservations_table(&[booked.clone()], &TimeZone::fixed(tz::offset(-6)));

        assert!(table.contains(&booked.uuid.to_string()));
        assert!(table.contains("2026-03-02 08:00"));
        assert!(table.contains("2026-03-02 10:00"));
        assert!(table.contains("CONFIRMED"));

        Ok(())
    }

    #[test]
    fn unknown_currency_falls_back_to_plain_amount() -> TestResult {
        let table = reservations_table(&[reservation("XXQ")?], &TimeZone::UTC);

        assert!(table.contains("15000 XXQ"));

        Ok(())
    }

    #[test]
    fn summary_lists_counts() {
        let summary = ReservationSummary {
            user_uuid: UserUuid::new(),
            display_name: "María Solís".to_string(),
            email: "maria@muni.go.cr".to_string(),
            total: 3,
            confirmed: 1,
            cancelled: 1,
            pending: 1,
            completed: 0,
            amount_paid: Decimal::new(15_000, 0),
        };

        let table = summary_table(&summary, iso::CRC);

        assert!(table.contains("María Solís"));
        assert!(table.contains("Amount paid"));
        assert!(!table.contains("Attended"));
    }

    #[test]
    fn json_output_uses_upper_case_statuses() -> TestResult {
        let rendered = json(&[reservation("CRC")?])?;

        assert!(rendered.contains("\"status\": \"CONFIRMED\""));

        Ok(())
    }
}
