//! Membership reconciliation

use std::collections::HashSet;

/// Members to add and to remove to go from the current to the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl MembershipDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// `to_add = desired \ current` in `desired` order, `to_remove = current \ desired`
/// in `current` order. IDs present on both sides are left alone.
pub fn diff_members(current: &[String], desired: &[String]) -> MembershipDiff {
    let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
    let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut queued = HashSet::new();
    let to_add = desired
        .iter()
        .filter(|id| !current_set.contains(id.as_str()) && queued.insert(id.as_str()))
        .cloned()
        .collect();

    let to_remove = current
        .iter()
        .filter(|id| !desired_set.contains(id.as_str()))
        .cloned()
        .collect();

    MembershipDiff { to_add, to_remove }
}
