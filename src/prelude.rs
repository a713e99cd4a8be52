//! Reserva prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    identity::{AccessPolicy, ClaimValue, Claims, IdentityError, Principal, Role, resolve_principal},
    interval::{BookingInterval, IntervalError},
    money::{CurrencyError, DEFAULT_CURRENCY_CODE, find_currency, to_money},
    qr::{
        AttendancePayload, QrError, generate_qr_code, generate_validation_token,
        parse_reservation_id, validate_qr_code,
    },
    schedule::{DayWindows, ScheduleFit, WeeklyWindow, WindowError, check_operating_hours},
    status::{ReservationStatus, StatusError},
    validation::{FieldError, ValidationErrors},
};
