//! JumpCloud API port
//!
//! One method per remote operation. Which API version serves an operation is
//! an adapter concern.

use async_trait::async_trait;

use jumpcloud_shared::PageRequest;

use crate::domain::{
    Application, GraphConnection, MemberRequest, SystemUser, UserGroup, UserGroupRequest,
    UserSearch,
};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JumpCloudApi: Send + Sync {
    async fn create_user_group(&self, request: &UserGroupRequest) -> Result<UserGroup, DomainError>;

    /// Full replace; the API rejects the call when the POSIX group is omitted.
    async fn replace_user_group(
        &self,
        id: &str,
        request: &UserGroupRequest,
    ) -> Result<UserGroup, DomainError>;

    async fn delete_user_group(&self, id: &str) -> Result<(), DomainError>;

    /// `Ok(None)` when the group does not exist.
    async fn get_user_group(&self, id: &str) -> Result<Option<UserGroup>, DomainError>;

    async fn list_group_members(
        &self,
        group_id: &str,
        page: PageRequest,
    ) -> Result<Vec<GraphConnection>, DomainError>;

    async fn manage_group_member(
        &self,
        group_id: &str,
        request: &MemberRequest,
    ) -> Result<(), DomainError>;

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<SystemUser>, DomainError>;

    async fn list_applications(&self, page: PageRequest) -> Result<Vec<Application>, DomainError>;
}
