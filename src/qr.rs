//! QR Attendance Passes
//!
//! A pass is a QR code whose text payload names the reservation it admits:
//!
//! ```text
//! RESERVA_ATTENDANCE|<reservation>|<user>|<space>|<unix millis>
//! ```
//!
//! The code is rendered to a greyscale PNG and shipped as standard base64.

use std::{fmt, io::Cursor};

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, Luma};
use jiff::Timestamp;
use qrcode::QrCode;
use thiserror::Error;
use uuid::Uuid;

/// Leading field of every attendance payload.
pub const PAYLOAD_PREFIX: &str = "RESERVA_ATTENDANCE";

const SEPARATOR: char = '|';

/// Smallest edge, in pixels, of a rendered pass.
const MIN_EDGE: u32 = 300;

/// Errors raised while producing a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// The payload could not be encoded or rendered.
    #[error("failed to generate QR code: {0}")]
    Generation(String),
}

/// Text content of an attendance QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendancePayload {
    /// Reservation being admitted.
    pub reservation_id: Uuid,

    /// Holder of the reservation.
    pub user_id: Uuid,

    /// Space the reservation is for.
    pub space_id: Uuid,

    /// When the pass was issued.
    pub issued_at: Timestamp,
}

impl fmt::Display for AttendancePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PAYLOAD_PREFIX}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.reservation_id,
            self.user_id,
            self.space_id,
            self.issued_at.as_millisecond()
        )
    }
}

/// Extract the reservation id from scanned QR content.
///
/// Only the prefix and the reservation id are required; trailing fields are
/// ignored.
pub fn parse_reservation_id(content: &str) -> Option<Uuid> {
    let mut fields = content.trim().split(SEPARATOR);

    if fields.next()? != PAYLOAD_PREFIX {
        return None;
    }

    Uuid::parse_str(fields.next()?.trim()).ok()
}

/// Render an attendance pass and return the PNG as base64.
///
/// # Errors
///
/// Returns [`QrError::Generation`] if the payload cannot be encoded or the
/// image cannot be written.
pub fn generate_qr_code(
    reservation_id: Uuid,
    user_id: Uuid,
    space_id: Uuid,
    now: Timestamp,
) -> Result<String, QrError> {
    let payload = AttendancePayload {
        reservation_id,
        user_id,
        space_id,
        issued_at: now,
    };

    let code = QrCode::new(payload.to_string().as_bytes())
        .map_err(|error| QrError::Generation(error.to_string()))?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_EDGE, MIN_EDGE)
        .build();

    let mut png = Vec::new();

    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|error| QrError::Generation(error.to_string()))?;

    Ok(STANDARD.encode(png))
}

/// Token staff can use to cross-check a pass out of band.
///
/// Tokens issued at different instants differ.
pub fn generate_validation_token(reservation_id: Uuid, now: Timestamp) -> String {
    STANDARD.encode(format!("{reservation_id}:{}", now.as_millisecond()))
}

/// Whether scanned `content` admits the `expected` reservation.
pub fn validate_qr_code(content: &str, expected: Uuid) -> bool {
    parse_reservation_id(content).is_some_and(|found| found == expected)
}
