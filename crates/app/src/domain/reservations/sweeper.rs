//! Auto-Status Sweeper
//!
//! Cancels pending reservations that were never confirmed before they started.
//! Storage failures are logged and swallowed: candidates stay pending and the
//! next cycle picks them up again.

use std::{sync::Arc, time::Duration};

use jiff::{Timestamp, tz::TimeZone};
use reserva::status::ReservationStatus;
use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, info, warn};

use crate::{
    domain::reservations::{models::Reservation, repository::ReservationsRepository},
    policy::zone_label,
};

/// Cadence of the scheduled sweep unless configured otherwise.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

const NOT_CONFIRMED: &str = "reservation was not confirmed before its start time";

/// Background task that expires stale pending reservations.
#[derive(Clone)]
pub struct ReservationSweeper {
    reservations: Arc<dyn ReservationsRepository>,
    time_zone: TimeZone,
}

impl ReservationSweeper {
    #[must_use]
    pub fn new(reservations: Arc<dyn ReservationsRepository>, time_zone: TimeZone) -> Self {
        Self {
            reservations,
            time_zone,
        }
    }

    /// Cancel every pending reservation that started at or before `now`.
    ///
    /// Returns how many were cancelled; zero when nothing was due or storage
    /// failed.
    pub async fn sweep(&self, now: Timestamp) -> u64 {
        let candidates = match self.reservations.find_expired_pending(now).await {
            Ok(candidates) => candidates,
            Err(source) => {
                error!(error = %source, "failed to load expired pending reservations");
                return 0;
            }
        };

        let reason = self.cancel_reason(now);

        let expired: Vec<Reservation> = candidates
            .into_iter()
            .filter(|candidate| {
                let due =
                    candidate.status == ReservationStatus::Pending && candidate.starts_at <= now;

                if !due {
                    warn!(
                        reservation = %candidate.uuid,
                        status = %candidate.status,
                        "skipping reservation that is not an expired pending booking"
                    );
                }

                due
            })
            .map(|mut candidate| {
                candidate.status = ReservationStatus::Cancelled;
                candidate.cancel_reason = Some(reason.clone());
                candidate.updated_at = now;
                candidate
            })
            .collect();

        if expired.is_empty() {
            debug!("no expired pending reservations");
            return 0;
        }

        match self.reservations.save_all(&expired).await {
            Ok(saved) => {
                info!(cancelled = saved, "expired pending reservations cancelled");
                saved
            }
            Err(source) => {
                error!(
                    error = %source,
                    candidates = expired.len(),
                    "failed to cancel expired pending reservations"
                );
                0
            }
        }
    }

    /// Run one sweep on demand.
    pub async fn trigger(&self, now: Timestamp) -> u64 {
        let cancelled = self.sweep(now).await;

        info!(cancelled, "manual sweep finished");

        cancelled
    }

    /// Sweep every `period` until `shutdown` flips to `true` or its sender
    /// goes away.
    pub async fn run(self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_seconds = period.as_secs(), "sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep(Timestamp::now()).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("sweeper stopped");
    }

    fn cancel_reason(&self, now: Timestamp) -> String {
        let local = now.to_zoned(self.time_zone.clone());

        format!(
            "Automatically cancelled on {} ({}): {NOT_CONFIRMED}",
            local.strftime("%Y-%m-%d %H:%M:%S"),
            zone_label(&self.time_zone, local.offset()),
        )
    }
}
