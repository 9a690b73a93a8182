//! Domain entities

pub mod user_group;
pub mod membership;
pub mod user;
pub mod application;

pub use user_group::{GroupAttributes, PosixGroup, ResourceAttributes, UserGroup, UserGroupRequest, UserGroupState};
pub use membership::{GraphConnection, GraphObject, MemberRequest, MembershipOp};
pub use user::{SystemUser, UserFilter, UserSearch};
pub use application::{Application, ApplicationQuery};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
