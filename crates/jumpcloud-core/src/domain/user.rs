//! System user entities and the filtered user search

use serde::Deserialize;

use jumpcloud_shared::utils::pipe_join;
use jumpcloud_shared::PageRequest;

use super::null_as_default;

/// Projection of a system user; only the requested field is filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SystemUser {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

/// `$in` filter over one user field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    IdIn(Vec<String>),
    EmailIn(Vec<String>),
}

impl UserFilter {
    /// `field:$in:value1|value2|...`
    pub fn to_query(&self) -> String {
        match self {
            UserFilter::IdIn(ids) => format!("_id:$in:{}", pipe_join(ids)),
            UserFilter::EmailIn(emails) => format!("email:$in:{}", pipe_join(emails)),
        }
    }

    /// Field projected in the response: the other side of the translation.
    pub fn projected_field(&self) -> &'static str {
        match self {
            UserFilter::IdIn(_) => "email",
            UserFilter::EmailIn(_) => "_id",
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            UserFilter::IdIn(values) | UserFilter::EmailIn(values) => values,
        }
    }
}

/// One page of a filtered, projected and sorted user search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSearch {
    pub filter: UserFilter,
    pub page: PageRequest,
}

impl UserSearch {
    pub fn new(filter: UserFilter, page: PageRequest) -> Self {
        Self { filter, page }
    }

    pub fn fields(&self) -> &'static str {
        self.filter.projected_field()
    }

    /// Results are sorted on the projected field.
    pub fn sort(&self) -> &'static str {
        self.filter.projected_field()
    }
}
