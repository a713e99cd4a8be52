//! CLI configuration groups, read from flags or the environment.

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod policy;
pub(crate) mod sweeper;
