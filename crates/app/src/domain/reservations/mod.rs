//! Reservations

pub mod attendance;
pub mod data;
pub mod errors;
pub mod models;
mod repository;
pub mod service;
pub mod sweeper;
mod validation;

pub use attendance::*;
pub use errors::{AttendanceServiceError, Entity, ReservationsServiceError};
pub use repository::*;
pub use service::*;
pub use sweeper::ReservationSweeper;
