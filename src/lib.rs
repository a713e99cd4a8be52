//! Reserva
//!
//! Reserva holds the pure booking rules of a municipal facility-reservation
//! system: the reservation lifecycle, booking intervals, weekly operating
//! hours, QR attendance passes and identity-claim handling. It performs no I/O.

pub mod identity;
pub mod interval;
pub mod money;
pub mod qr;
pub mod schedule;
pub mod status;
pub mod validation;

pub mod prelude;
