//! Attendance service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use reserva::{
    qr::{generate_qr_code, generate_validation_token, validate_qr_code},
    status::ReservationStatus,
};
use tracing::{info, warn};

use crate::domain::{
    reservations::{
        data::AttendancePass,
        errors::AttendanceServiceError,
        models::{Reservation, ReservationUuid},
        repository::ReservationsRepository,
    },
    users::models::UserUuid,
};

/// Attendance service backed by the reservations repository.
#[derive(Clone)]
pub struct DefaultAttendanceService {
    reservations: Arc<dyn ReservationsRepository>,
}

impl DefaultAttendanceService {
    #[must_use]
    pub fn new(reservations: Arc<dyn ReservationsRepository>) -> Self {
        Self { reservations }
    }

    async fn confirmed(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Reservation, AttendanceServiceError> {
        let found = self
            .reservations
            .find_reservation(reservation)
            .await?
            .ok_or(AttendanceServiceError::NotFound)?;

        if found.status != ReservationStatus::Confirmed {
            return Err(AttendanceServiceError::AttendanceNotAllowed(found.status));
        }

        Ok(found)
    }
}

#[async_trait]
impl AttendanceService for DefaultAttendanceService {
    async fn issue_pass(
        &self,
        reservation: ReservationUuid,
        now: Timestamp,
    ) -> Result<AttendancePass, AttendanceServiceError> {
        let mut found = self.confirmed(reservation).await?;

        let qr_code = generate_qr_code(
            found.uuid.into_uuid(),
            found.user_uuid.into_uuid(),
            found.space_uuid.into_uuid(),
            now,
        )?;
        let validation_token = generate_validation_token(found.uuid.into_uuid(), now);

        found.qr_code = Some(qr_code.clone());
        found.qr_validation_token = Some(validation_token.clone());
        found.updated_at = now;

        self.reservations.save(&found).await?;

        info!(%reservation, "attendance pass issued");

        Ok(AttendancePass {
            qr_code,
            validation_token,
        })
    }

    async fn check_in(
        &self,
        reservation: ReservationUuid,
        qr_content: String,
        confirmed_by: UserUuid,
        now: Timestamp,
    ) -> Result<Reservation, AttendanceServiceError> {
        let mut found = self.confirmed(reservation).await?;

        if !validate_qr_code(&qr_content, found.uuid.into_uuid()) {
            warn!(%reservation, "rejected check-in with mismatched QR code");
            return Err(AttendanceServiceError::InvalidQrCode);
        }

        if found.attendance_confirmed {
            return Err(AttendanceServiceError::AttendanceAlreadyConfirmed);
        }

        found.attendance_confirmed = true;
        found.attendance_confirmed_at = Some(now);
        found.confirmed_by = Some(confirmed_by);
        found.updated_at = now;

        let checked_in = self.reservations.save(&found).await?;

        info!(%reservation, %confirmed_by, "attendance confirmed");

        Ok(checked_in)
    }
}

#[automock]
#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// Issue a QR pass for a confirmed reservation and store it.
    async fn issue_pass(
        &self,
        reservation: ReservationUuid,
        now: Timestamp,
    ) -> Result<AttendancePass, AttendanceServiceError>;

    /// Record attendance from scanned QR content.
    async fn check_in(
        &self,
        reservation: ReservationUuid,
        qr_content: String,
        confirmed_by: UserUuid,
        now: Timestamp,
    ) -> Result<Reservation, AttendanceServiceError>;
}
