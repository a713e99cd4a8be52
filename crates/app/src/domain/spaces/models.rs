//! Space Models

use serde::Serialize;

use crate::uuids::TypedUuid;

/// Space UUID
pub type SpaceUuid = TypedUuid<Space>;

/// A bookable municipal facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Space {
    pub uuid: SpaceUuid,
    pub name: String,
    pub capacity: u32,
    pub location: Option<String>,
    pub outdoor: bool,
    pub active: bool,
}
