//! In-memory JumpCloud used by the service tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use jumpcloud_shared::PageRequest;

use crate::domain::{
    Application, GraphConnection, MemberRequest, MembershipOp, SystemUser, UserFilter, UserGroup,
    UserGroupRequest, UserSearch,
};
use crate::error::DomainError;
use crate::repositories::JumpCloudApi;

#[derive(Default)]
struct FakeState {
    users: Vec<SystemUser>,
    groups: BTreeMap<String, UserGroup>,
    members: BTreeMap<String, Vec<String>>,
    applications: Vec<Application>,
    next_group: u32,
    search_filters: Vec<String>,
    member_ops: Vec<(MembershipOp, String)>,
    replaced: Vec<UserGroupRequest>,
    fail_member_ops_after: Option<usize>,
}

#[derive(Default)]
pub(crate) struct FakeJumpCloud {
    state: Mutex<FakeState>,
}

fn not_found() -> DomainError {
    DomainError::ApiError { status: 404, body: "{\"message\":\"Not Found\"}".into() }
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

impl FakeJumpCloud {
    pub fn with_users(users: &[(&str, &str)]) -> Self {
        Self::with_owned_users(
            users
                .iter()
                .map(|(id, email)| (id.to_string(), email.to_string()))
                .collect(),
        )
    }

    pub fn with_owned_users(users: Vec<(String, String)>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().users = users
            .into_iter()
            .map(|(id, email)| SystemUser { id, email })
            .collect();
        fake
    }

    pub fn add_application(&self, id: &str, name: &str, label: &str) {
        self.state.lock().unwrap().applications.push(Application {
            id: id.into(),
            display_name: name.into(),
            display_label: label.into(),
        });
    }

    /// Attach a user to a group behind the service's back.
    pub fn attach_member(&self, group_id: &str, user_id: &str) {
        self.state
            .lock()
            .unwrap()
            .members
            .entry(group_id.to_string())
            .or_default()
            .push(user_id.to_string());
    }

    pub fn fail_member_ops_after(&self, successful: usize) {
        self.state.lock().unwrap().fail_member_ops_after = Some(successful);
    }

    pub fn search_filters(&self) -> Vec<String> {
        self.state.lock().unwrap().search_filters.clone()
    }

    pub fn member_ops(&self) -> Vec<(MembershipOp, String)> {
        self.state.lock().unwrap().member_ops.clone()
    }

    pub fn clear_member_ops(&self) {
        self.state.lock().unwrap().member_ops.clear();
    }

    pub fn members_of(&self, group_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(group_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn group(&self, group_id: &str) -> Option<UserGroup> {
        self.state.lock().unwrap().groups.get(group_id).cloned()
    }

    pub fn replaced(&self) -> Vec<UserGroupRequest> {
        self.state.lock().unwrap().replaced.clone()
    }
}

#[async_trait]
impl JumpCloudApi for FakeJumpCloud {
    async fn create_user_group(&self, request: &UserGroupRequest) -> Result<UserGroup, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.next_group += 1;
        let group = UserGroup {
            id: format!("g{}", state.next_group),
            name: request.name.clone(),
            kind: "user_group".into(),
            attributes: request.attributes.clone().unwrap_or_default(),
        };
        state.groups.insert(group.id.clone(), group.clone());
        state.members.entry(group.id.clone()).or_default();
        Ok(group)
    }

    async fn replace_user_group(
        &self,
        id: &str,
        request: &UserGroupRequest,
    ) -> Result<UserGroup, DomainError> {
        let mut state = self.state.lock().unwrap();
        let attributes = match &request.attributes {
            Some(attributes) if !attributes.posix_groups.is_empty() => attributes.clone(),
            _ => {
                return Err(DomainError::ApiError { status: 400, body: "posixGroups required".into() })
            }
        };
        state.replaced.push(request.clone());
        let group = state.groups.get_mut(id).ok_or_else(not_found)?;
        group.name = request.name.clone();
        group.attributes = attributes;
        Ok(group.clone())
    }

    async fn delete_user_group(&self, id: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.members.remove(id);
        state.groups.remove(id).map(|_| ()).ok_or_else(not_found)
    }

    async fn get_user_group(&self, id: &str) -> Result<Option<UserGroup>, DomainError> {
        Ok(self.state.lock().unwrap().groups.get(id).cloned())
    }

    async fn list_group_members(
        &self,
        group_id: &str,
        page: PageRequest,
    ) -> Result<Vec<GraphConnection>, DomainError> {
        let state = self.state.lock().unwrap();
        let members = state.members.get(group_id).ok_or_else(not_found)?;
        Ok(page_of(members, page).into_iter().map(GraphConnection::user).collect())
    }

    async fn manage_group_member(
        &self,
        group_id: &str,
        request: &MemberRequest,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if let Some(limit) = state.fail_member_ops_after {
            if state.member_ops.len() >= limit {
                return Err(DomainError::ApiError { status: 503, body: "unavailable".into() });
            }
        }
        state.member_ops.push((request.op, request.id.clone()));
        let members = state.members.get_mut(group_id).ok_or_else(not_found)?;
        match request.op {
            MembershipOp::Add => {
                if !members.contains(&request.id) {
                    members.push(request.id.clone());
                }
            }
            MembershipOp::Remove => members.retain(|id| id != &request.id),
        }
        Ok(())
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<SystemUser>, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.search_filters.push(search.filter.to_query());

        let wanted: HashSet<&str> = search.filter.values().iter().map(String::as_str).collect();
        let mut matched: Vec<SystemUser> = state
            .users
            .iter()
            .filter_map(|user| match &search.filter {
                UserFilter::IdIn(_) if wanted.contains(user.id.as_str()) => {
                    Some(SystemUser { id: String::new(), email: user.email.clone() })
                }
                UserFilter::EmailIn(_) if wanted.contains(user.email.as_str()) => {
                    Some(SystemUser { id: user.id.clone(), email: String::new() })
                }
                _ => None,
            })
            .collect();
        matched.sort_by(|a, b| match &search.filter {
            UserFilter::IdIn(_) => a.email.cmp(&b.email),
            UserFilter::EmailIn(_) => a.id.cmp(&b.id),
        });
        Ok(page_of(&matched, search.page))
    }

    async fn list_applications(&self, page: PageRequest) -> Result<Vec<Application>, DomainError> {
        Ok(page_of(&self.state.lock().unwrap().applications, page))
    }
}
