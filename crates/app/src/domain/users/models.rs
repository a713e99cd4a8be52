//! User Models

use reserva::identity::Role;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<User>;

/// User Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub uuid: UserUuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}
