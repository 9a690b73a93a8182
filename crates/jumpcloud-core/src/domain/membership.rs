//! Group membership graph entities

use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipOp {
    Add,
    Remove,
}

impl MembershipOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipOp::Add => "add",
            MembershipOp::Remove => "remove",
        }
    }
}

impl fmt::Display for MembershipOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the membership mutation call: one edge at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRequest {
    pub op: MembershipOp,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl MemberRequest {
    pub fn user(op: MembershipOp, user_id: impl Into<String>) -> Self {
        Self {
            op,
            kind: "user".to_string(),
            id: user_id.into(),
        }
    }
}

/// One edge of the membership listing; `to` is the member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GraphConnection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: GraphObject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GraphObject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

impl GraphConnection {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            to: GraphObject { id: id.into(), kind: "user".to_string() },
        }
    }
}
