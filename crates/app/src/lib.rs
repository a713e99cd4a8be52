//! Reservation services, storage adapters and the background sweeper.

pub mod context;
pub mod database;
pub mod domain;
pub mod policy;
pub mod uuids;

#[cfg(test)]
mod test;
