//! Reservations service.

use std::{cmp::Reverse, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use reserva::{
    identity::Role,
    schedule::{check_operating_hours, local_weekday},
    status::ReservationStatus,
};
use tracing::{info, warn};

use crate::{
    domain::{
        Repositories,
        reservations::{
            data::{NewReservation, ReservationSummary},
            errors::{Entity, ReservationsServiceError},
            models::{Reservation, ReservationUuid},
            validation::validate_new_reservation,
        },
        users::models::UserUuid,
    },
    policy::ReservationPolicy,
};

/// Reservation service backed by the storage repositories.
#[derive(Clone)]
pub struct DefaultReservationsService {
    repositories: Repositories,
    policy: Arc<ReservationPolicy>,
}

impl DefaultReservationsService {
    #[must_use]
    pub fn new(repositories: Repositories, policy: Arc<ReservationPolicy>) -> Self {
        Self {
            repositories,
            policy,
        }
    }
}

#[async_trait]
impl ReservationsService for DefaultReservationsService {
    async fn create_reservation(
        &self,
        request: NewReservation,
        now: Timestamp,
    ) -> Result<Reservation, ReservationsServiceError> {
        let booking = validate_new_reservation(&request, &self.policy)?;

        let space = self
            .repositories
            .spaces
            .find_space(request.space_uuid)
            .await?
            .ok_or(ReservationsServiceError::NotFound(Entity::Space))?;

        if !space.active {
            warn!(space = %space.uuid, "rejected booking on inactive space");
            return Err(ReservationsServiceError::SpaceInactive);
        }

        if !self.repositories.users.user_exists(request.user_uuid).await? {
            return Err(ReservationsServiceError::NotFound(Entity::User));
        }

        let overlapping = self
            .repositories
            .reservations
            .find_overlapping(
                space.uuid,
                booking.interval.starts_at(),
                booking.interval.ends_at(),
            )
            .await?;

        let conflict = overlapping.iter().find(|existing| {
            existing.status != ReservationStatus::Cancelled
                && existing
                    .interval()
                    .is_ok_and(|interval| interval.overlaps(&booking.interval))
        });

        if let Some(existing) = conflict {
            warn!(
                space = %space.uuid,
                existing = %existing.uuid,
                "rejected overlapping booking"
            );
            return Err(ReservationsServiceError::Conflict);
        }

        let weekday = local_weekday(&booking.interval, &self.policy.time_zone);

        let windows = self
            .repositories
            .spaces
            .find_windows(space.uuid, weekday)
            .await?;

        if !check_operating_hours(&booking.interval, &windows, &self.policy.time_zone).is_allowed()
        {
            warn!(space = %space.uuid, ?weekday, "rejected booking outside operating hours");
            return Err(ReservationsServiceError::OutsideOperatingHours);
        }

        let reservation = Reservation {
            uuid: ReservationUuid::new(),
            space_uuid: space.uuid,
            user_uuid: request.user_uuid,
            starts_at: booking.interval.starts_at(),
            ends_at: booking.interval.ends_at(),
            status: ReservationStatus::Pending,
            total_amount: request.total_amount,
            currency: booking.currency.iso_alpha_code.to_string(),
            qr_code: None,
            qr_validation_token: None,
            attendance_confirmed: false,
            attendance_confirmed_at: None,
            confirmed_by: None,
            cancel_reason: None,
            rate_uuid: request.rate_uuid,
            created_at: now,
            updated_at: now,
        };

        let created = self.repositories.reservations.save(&reservation).await?;

        info!(
            reservation = %created.uuid,
            space = %created.space_uuid,
            user = %created.user_uuid,
            "reservation created"
        );

        Ok(created)
    }

    async fn get_reservation_by_id(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Option<Reservation>, ReservationsServiceError> {
        Ok(self
            .repositories
            .reservations
            .find_reservation(reservation)
            .await?)
    }

    async fn get_reservations_by_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Reservation>, ReservationsServiceError> {
        let mut reservations = self
            .repositories
            .reservations
            .find_user_reservations(user)
            .await?;

        reservations.sort_by_key(|reservation| Reverse(reservation.starts_at));

        Ok(reservations)
    }

    async fn cancel_reservation(
        &self,
        reservation: ReservationUuid,
        reason: String,
        actor: Role,
        now: Timestamp,
    ) -> Result<Reservation, ReservationsServiceError> {
        let mut found = self
            .repositories
            .reservations
            .find_reservation(reservation)
            .await?
            .ok_or(ReservationsServiceError::NotFound(Entity::Reservation))?;

        if found.status == ReservationStatus::Cancelled {
            return Err(ReservationsServiceError::AlreadyCancelled);
        }

        if !found.status.can_transition_to(ReservationStatus::Cancelled) {
            warn!(
                %reservation,
                status = %found.status,
                "rejected cancellation of terminal reservation"
            );
            return Err(ReservationsServiceError::not_cancellable(found.status));
        }

        let notice = found.interval()?.notice_at(now);

        if !actor.is_privileged() && notice < self.policy.min_cancellation_notice {
            warn!(%reservation, %actor, "rejected late cancellation");
            return Err(ReservationsServiceError::insufficient_notice(
                self.policy.min_cancellation_notice,
            ));
        }

        found.status = ReservationStatus::Cancelled;
        found.cancel_reason = Some(reason);
        found.updated_at = now;

        let cancelled = self.repositories.reservations.save(&found).await?;

        info!(%reservation, %actor, "reservation cancelled");

        Ok(cancelled)
    }

    async fn delete_reservation(
        &self,
        reservation: ReservationUuid,
    ) -> Result<bool, ReservationsServiceError> {
        let deleted = self.repositories.reservations.delete(reservation).await?;

        if deleted {
            info!(%reservation, "reservation deleted");
        }

        Ok(deleted)
    }

    async fn generate_reservation_summary(
        &self,
        user: UserUuid,
    ) -> Result<ReservationSummary, ReservationsServiceError> {
        let found = self
            .repositories
            .users
            .find_user(user)
            .await?
            .ok_or(ReservationsServiceError::NotFound(Entity::User))?;

        let reservations = self
            .repositories
            .reservations
            .find_user_reservations(user)
            .await?;

        Ok(ReservationSummary::tally(&found, &reservations))
    }

    async fn count_reservations(
        &self,
        statuses: &[ReservationStatus],
    ) -> Result<u64, ReservationsServiceError> {
        Ok(self
            .repositories
            .reservations
            .count_by_status_in(statuses)
            .await?)
    }
}

#[automock]
#[async_trait]
pub trait ReservationsService: Send + Sync {
    /// Book a space, checked at `now`. The reservation starts out pending.
    async fn create_reservation(
        &self,
        request: NewReservation,
        now: Timestamp,
    ) -> Result<Reservation, ReservationsServiceError>;

    /// Retrieve a single reservation, `None` when missing.
    async fn get_reservation_by_id(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Option<Reservation>, ReservationsServiceError>;

    /// All of a user's reservations, latest start first.
    async fn get_reservations_by_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Reservation>, ReservationsServiceError>;

    /// Cancel a reservation on behalf of an actor with the given role.
    async fn cancel_reservation(
        &self,
        reservation: ReservationUuid,
        reason: String,
        actor: Role,
        now: Timestamp,
    ) -> Result<Reservation, ReservationsServiceError>;

    /// Hard delete. Returns `false` when nothing was deleted.
    async fn delete_reservation(
        &self,
        reservation: ReservationUuid,
    ) -> Result<bool, ReservationsServiceError>;

    /// Per-status counts and amount paid for a user.
    async fn generate_reservation_summary(
        &self,
        user: UserUuid,
    ) -> Result<ReservationSummary, ReservationsServiceError>;

    /// Number of reservations in any of `statuses`.
    async fn count_reservations(
        &self,
        statuses: &[ReservationStatus],
    ) -> Result<u64, ReservationsServiceError>;
}
