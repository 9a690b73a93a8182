// ============================================================================
// JumpCloud Core - User Group Entity
// File: crates/jumpcloud-core/src/domain/user_group.rs
// Description: Remote user group record, its request body, and the resource
//              state mirrored locally
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::error::DomainError;

/// POSIX group attached to a user group at creation time.
///
/// Text form is `<gid>:<name>`, e.g. `42:devs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosixGroup {
    pub id: u32,
    pub name: String,
}

impl PosixGroup {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

impl FromStr for PosixGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (gid, name) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidPosixGroup(s.to_string()))?;
        let id = gid
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidPosixGroup(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidPosixGroup(s.to_string()));
        }
        Ok(Self::new(id, name))
    }
}

impl fmt::Display for PosixGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.name)
    }
}

/// Group attributes as carried on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAttributes {
    #[serde(
        rename = "posixGroups",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub posix_groups: Vec<PosixGroup>,
}

impl GroupAttributes {
    pub fn posix(group: PosixGroup) -> Self {
        Self { posix_groups: vec![group] }
    }

    /// Only the first POSIX group is honoured by the API.
    pub fn primary_posix_group(&self) -> Option<&PosixGroup> {
        self.posix_groups.first()
    }
}

/// User group as returned by the API. Every field defaults so an empty body
/// decodes to an empty record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: GroupAttributes,
}

/// Body of the create and replace calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserGroupRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<GroupAttributes>,
}

/// Attributes block of the resource state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "posix_text")]
    pub posix_groups: Option<PosixGroup>,
}

/// Local mirror of a user group resource.
///
/// `id == None` means the resource is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroupState {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub attributes: ResourceAttributes,
    /// Member emails.
    #[serde(default)]
    pub members: Vec<String>,
}

impl UserGroupState {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_posix_group(mut self, group: PosixGroup) -> Self {
        self.attributes.posix_groups = Some(group);
        self
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }

    /// Identifier of a present resource.
    pub fn require_id(&self) -> Result<&str, DomainError> {
        self.id().ok_or(DomainError::MissingId)
    }

    /// Body for the create call; attributes are omitted when unset.
    pub fn create_request(&self) -> UserGroupRequest {
        UserGroupRequest {
            name: self.name.clone(),
            attributes: self.attributes.posix_groups.clone().map(GroupAttributes::posix),
        }
    }

    /// Body for the replace call. The API rejects a replace without the
    /// POSIX group, so it must be present in state.
    pub fn replace_request(&self) -> Result<UserGroupRequest, DomainError> {
        let posix = self.attributes.posix_groups.clone().ok_or_else(|| {
            DomainError::ValidationError("unable to update, attributes not expandable".into())
        })?;
        Ok(UserGroupRequest {
            name: self.name.clone(),
            attributes: Some(GroupAttributes::posix(posix)),
        })
    }

    /// Copy a remote record into state. An empty remote id keeps the current one.
    pub fn apply_remote(&mut self, group: UserGroup) {
        if !group.id.is_empty() {
            self.id = Some(group.id);
        }
        self.name = group.name;
        self.attributes.posix_groups = group.attributes.posix_groups.into_iter().next();
    }
}

mod posix_text {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::PosixGroup;

    pub fn serialize<S>(value: &Option<PosixGroup>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(group) => serializer.collect_str(group),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PosixGroup>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if !text.trim().is_empty() => text.parse().map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
