//! Application entity and lookup query

use serde::Deserialize;

use super::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Application {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "displayName", default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(rename = "displayLabel", default, deserialize_with = "null_as_default")]
    pub display_label: String,
}

/// Filters of the application data source; at least one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub name: Option<String>,
    pub display_label: Option<String>,
}

impl ApplicationQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), display_label: None }
    }

    pub fn by_display_label(label: impl Into<String>) -> Self {
        Self { name: None, display_label: Some(label.into()) }
    }

    /// An empty string counts as unset.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.display_label().is_none()
    }

    pub fn matches(&self, application: &Application) -> bool {
        self.name() == Some(application.display_name.as_str())
            || self.display_label() == Some(application.display_label.as_str())
    }
}
