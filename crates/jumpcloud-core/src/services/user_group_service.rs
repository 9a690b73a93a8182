// ============================================================================
// JumpCloud Core - User Group Service
// File: crates/jumpcloud-core/src/services/user_group_service.rs
// ============================================================================
//! Create, read, update and delete of the user group resource.
//!
//! Every call is awaited before the next one is issued. A failure returns
//! immediately and leaves earlier remote mutations in place; running the same
//! operation again converges because reconciliation only touches the members
//! that differ.

use std::sync::Arc;

use tracing::{debug, info, warn};

use jumpcloud_shared::utils::mask_email;
use jumpcloud_shared::ProviderConfig;

use super::membership::{diff_members, MembershipDiff};
use super::pagination::Paginator;
use super::translator::UserTranslator;
use crate::domain::{MemberRequest, MembershipOp, UserGroupState};
use crate::error::DomainError;
use crate::repositories::JumpCloudApi;

pub struct UserGroupService<A: JumpCloudApi> {
    api: Arc<A>,
    translator: UserTranslator<A>,
    paginator: Paginator,
}

impl<A: JumpCloudApi> UserGroupService<A> {
    pub fn new(api: Arc<A>, paginator: Paginator, filter_batch_size: usize) -> Self {
        Self {
            translator: UserTranslator::new(api.clone(), paginator, filter_batch_size),
            api,
            paginator,
        }
    }

    pub fn from_config(api: Arc<A>, config: &ProviderConfig) -> Self {
        Self::new(api, Paginator::from_config(config), config.filter_batch_size)
    }

    pub fn translator(&self) -> &UserTranslator<A> {
        &self.translator
    }

    /// Create the group, attach the desired members, then refresh `state`.
    pub async fn create(&self, state: &mut UserGroupState) -> Result<(), DomainError> {
        info!("Creating user group: {}", state.name);
        debug!("Desired members: {:?}", masked(&state.members));

        let request = state.create_request();
        let group = self
            .api
            .create_user_group(&request)
            .await
            .map_err(|e| e.context(format!("error creating user group {}", request.name)))?;
        state.set_id(group.id.clone());

        let member_ids = self.translator.emails_to_ids(&state.members).await?;
        let diff = diff_members(&[], &member_ids);
        for member_id in &diff.to_add {
            self.manage_member(&group.id, MembershipOp::Add, member_id).await?;
        }

        info!("User group created: {} ({} members)", group.id, diff.to_add.len());
        self.read(state).await
    }

    /// Refresh `state` from the remote store. A missing group clears the id
    /// and is not an error.
    pub async fn read(&self, state: &mut UserGroupState) -> Result<(), DomainError> {
        let id = state.require_id()?.to_string();

        let group = match self
            .api
            .get_user_group(&id)
            .await
            .map_err(|e| e.context(format!("error reading user group {}", id)))?
        {
            Some(group) => group,
            None => {
                warn!("User group {} not found, removing from state", id);
                state.clear_id();
                return Ok(());
            }
        };
        state.apply_remote(group);

        let member_ids = self.member_ids(&id).await?;
        state.members = self.translator.ids_to_emails(&member_ids).await?;
        debug!("User group {} read with {} members", id, state.members.len());
        Ok(())
    }

    /// Replace name and attributes, reconcile members, then refresh `state`.
    pub async fn update(&self, state: &mut UserGroupState) -> Result<(), DomainError> {
        let id = state.require_id()?.to_string();
        let request = state.replace_request()?;

        info!("Updating user group: {}", id);
        self.api
            .replace_user_group(&id, &request)
            .await
            .map_err(|e| e.context(format!("error updating user group {}", id)))?;

        let desired = state.members.clone();
        debug!("Desired members: {:?}", masked(&desired));
        let diff = self.reconcile_members(&id, &desired).await?;
        info!(
            "User group {} members reconciled: {} added, {} removed",
            id,
            diff.to_add.len(),
            diff.to_remove.len()
        );

        self.read(state).await
    }

    pub async fn delete(&self, state: &mut UserGroupState) -> Result<(), DomainError> {
        let id = state.require_id()?.to_string();

        self.api
            .delete_user_group(&id)
            .await
            .map_err(|e| e.context(format!("error deleting user group {}", id)))?;
        state.clear_id();

        info!("User group deleted: {}", id);
        Ok(())
    }

    /// Bring the group's members to exactly `desired_emails`. Returns the
    /// diff that was applied; adds run before removes.
    pub async fn reconcile_members(
        &self,
        group_id: &str,
        desired_emails: &[String],
    ) -> Result<MembershipDiff, DomainError> {
        let current = self.member_ids(group_id).await?;
        let desired = self.translator.emails_to_ids(desired_emails).await?;

        let diff = diff_members(&current, &desired);
        for member_id in &diff.to_add {
            self.manage_member(group_id, MembershipOp::Add, member_id).await?;
        }
        for member_id in &diff.to_remove {
            self.manage_member(group_id, MembershipOp::Remove, member_id).await?;
        }
        Ok(diff)
    }

    /// IDs of every user attached to the group, in listing order.
    pub async fn member_ids(&self, group_id: &str) -> Result<Vec<String>, DomainError> {
        let edges = self
            .paginator
            .collect(|page| {
                let api = &self.api;
                async move { api.list_group_members(group_id, page).await }
            })
            .await
            .map_err(|e| e.context(format!("error listing members of user group {}", group_id)))?;
        Ok(edges.into_iter().map(|edge| edge.to.id).collect())
    }

    async fn manage_member(
        &self,
        group_id: &str,
        op: MembershipOp,
        member_id: &str,
    ) -> Result<(), DomainError> {
        debug!("Group {} member {}: {}", group_id, op, member_id);
        self.api
            .manage_group_member(group_id, &MemberRequest::user(op, member_id))
            .await
            .map_err(|e| {
                e.context(format!(
                    "error managing group member, action: {}, member id: {}",
                    op, member_id
                ))
            })
    }
}

/// Member list safe for log lines.
fn masked(emails: &[String]) -> Vec<String> {
    emails.iter().map(|email| mask_email(email)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::{PosixGroup, UserGroup};
    use crate::repositories::MockJumpCloudApi;
    use crate::services::fake_api::FakeJumpCloud;

    const ORG: &str = "testorg.com";

    /// 123 users `u000..u122` with emails `grp<i>@testorg.com`, and the
    /// emails in sorted order.
    fn directory() -> (FakeJumpCloud, Vec<String>) {
        let users: Vec<(String, String)> = (0..123)
            .map(|i| (format!("u{:03}", i), format!("grp{}@{}", i, ORG)))
            .collect();
        let mut emails: Vec<String> = users.iter().map(|(_, email)| email.clone()).collect();
        emails.sort();
        (FakeJumpCloud::with_owned_users(users), emails)
    }

    fn service(api: Arc<FakeJumpCloud>, batch_size: usize) -> UserGroupService<FakeJumpCloud> {
        UserGroupService::new(api, Paginator::new(100, Duration::ZERO), batch_size)
    }

    fn email(i: usize) -> String {
        format!("grp{}@{}", i, ORG)
    }

    #[tokio::test]
    async fn test_create_with_123_members_reads_back_sorted() {
        let (fake, sorted) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 200);

        let all: Vec<String> = (0..123).map(email).collect();
        let mut state = UserGroupState::new("grp")
            .with_posix_group(PosixGroup::new(42, "grp"))
            .with_members(all);
        service.create(&mut state).await.unwrap();

        assert_eq!(state.id(), Some("g1"));
        assert_eq!(state.name, "grp");
        assert_eq!(state.attributes.posix_groups, Some(PosixGroup::new(42, "grp")));
        assert_eq!(state.members.len(), 123);
        assert_eq!(state.members, sorted);
        assert_eq!(state.members[99], sorted[99]);
        assert_eq!(state.members[100], sorted[100]);
        assert_eq!(fake.members_of("g1").len(), 123);
    }

    #[tokio::test]
    async fn test_batched_translation_still_reads_back_sorted() {
        let (fake, sorted) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp").with_members((0..123).map(email));
        service.create(&mut state).await.unwrap();

        assert_eq!(state.members, sorted);
        assert!(fake.search_filters().iter().all(|f| f.split('|').count() <= 100));
    }

    #[tokio::test]
    async fn test_create_with_repeated_emails_adds_each_user_once() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 1);

        let mut state = UserGroupState::new("grp").with_members([email(1), email(2), email(1)]);
        service.create(&mut state).await.unwrap();

        assert_eq!(
            fake.member_ops(),
            vec![
                (MembershipOp::Add, "u001".to_string()),
                (MembershipOp::Add, "u002".to_string()),
            ]
        );
        assert_eq!(state.members, vec![email(1), email(2)]);
    }

    #[tokio::test]
    async fn test_update_shrinks_membership_without_redundant_calls() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp")
            .with_posix_group(PosixGroup::new(42, "grp"))
            .with_members((0..123).map(email));
        service.create(&mut state).await.unwrap();
        fake.clear_member_ops();

        state.members = vec![email(2), email(1)];
        service.update(&mut state).await.unwrap();

        assert_eq!(state.members, vec![email(1), email(2)]);
        let ops = fake.member_ops();
        assert_eq!(ops.len(), 121);
        assert!(ops.iter().all(|(op, _)| *op == MembershipOp::Remove));
        assert!(!ops.iter().any(|(_, id)| id == "u001" || id == "u002"));
    }

    #[tokio::test]
    async fn test_update_removes_externally_added_members() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp")
            .with_posix_group(PosixGroup::new(42, "grp"))
            .with_members([email(1), email(2)]);
        service.create(&mut state).await.unwrap();

        fake.attach_member("g1", "u050");
        service.read(&mut state).await.unwrap();
        assert_eq!(state.members.len(), 3);

        state.members = vec![email(2), email(1)];
        service.update(&mut state).await.unwrap();
        assert_eq!(state.members, vec![email(1), email(2)]);
        assert_eq!(fake.members_of("g1"), vec!["u001".to_string(), "u002".to_string()]);
    }

    #[tokio::test]
    async fn test_reconcile_twice_is_idempotent() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp").with_members([email(5)]);
        service.create(&mut state).await.unwrap();

        let desired: Vec<String> = (10..130).map(|i| email(i % 123)).collect();
        let first = service.reconcile_members("g1", &desired).await.unwrap();
        assert!(!first.is_empty());

        fake.clear_member_ops();
        let second = service.reconcile_members("g1", &desired).await.unwrap();
        assert!(second.is_empty());
        assert!(fake.member_ops().is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_name_and_posix_group() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp").with_posix_group(PosixGroup::new(42, "grp"));
        service.create(&mut state).await.unwrap();

        state.name = "renamed".into();
        service.update(&mut state).await.unwrap();

        let replaced = fake.replaced();
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].name, "renamed");
        assert!(replaced[0].attributes.is_some());
        assert_eq!(state.name, "renamed");
        assert_eq!(fake.group("g1").map(|g| g.name), Some("renamed".to_string()));
    }

    #[tokio::test]
    async fn test_update_without_posix_group_fails_before_any_call() {
        let service = UserGroupService::new(Arc::new(MockJumpCloudApi::new()), Paginator::default(), 100);
        let mut state = UserGroupState::new("grp");
        state.set_id("g1");

        let err = service.update(&mut state).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_read_of_missing_group_clears_id() {
        let mut api = MockJumpCloudApi::new();
        api.expect_get_user_group()
            .withf(|id| id == "missing")
            .times(1)
            .returning(|_| Ok(None));
        let service = UserGroupService::new(Arc::new(api), Paginator::default(), 100);

        let mut state = UserGroupState::new("grp");
        state.set_id("missing");
        service.read(&mut state).await.unwrap();
        assert!(!state.is_present());
    }

    #[tokio::test]
    async fn test_read_of_empty_record_keeps_id() {
        let mut api = MockJumpCloudApi::new();
        api.expect_get_user_group()
            .times(1)
            .returning(|_| Ok(Some(UserGroup::default())));
        api.expect_list_group_members()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let service = UserGroupService::new(Arc::new(api), Paginator::default(), 100);

        let mut state = UserGroupState::new("grp");
        state.set_id("g1");
        service.read(&mut state).await.unwrap();

        assert_eq!(state.id(), Some("g1"));
        assert_eq!(state.name, "");
        assert!(state.members.is_empty());
    }

    #[tokio::test]
    async fn test_read_error_is_propagated() {
        let mut api = MockJumpCloudApi::new();
        api.expect_get_user_group()
            .returning(|_| Err(DomainError::ApiError { status: 500, body: "oops".into() }));
        let service = UserGroupService::new(Arc::new(api), Paginator::default(), 100);

        let mut state = UserGroupState::new("grp");
        state.set_id("g1");
        let err = service.read(&mut state).await.unwrap_err();

        assert!(matches!(err.root(), DomainError::ApiError { status: 500, .. }));
        assert_eq!(state.id(), Some("g1"));
    }

    #[tokio::test]
    async fn test_member_failure_keeps_earlier_mutations() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        fake.fail_member_ops_after(3);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp").with_members((0..10).map(email));
        let err = service.create(&mut state).await.unwrap_err();

        assert!(err.to_string().contains("error managing group member, action: add"));
        assert_eq!(state.id(), Some("g1"));
        assert_eq!(fake.members_of("g1").len(), 3);
    }

    #[tokio::test]
    async fn test_delete_clears_id() {
        let (fake, _) = directory();
        let fake = Arc::new(fake);
        let service = service(fake.clone(), 100);

        let mut state = UserGroupState::new("grp");
        service.create(&mut state).await.unwrap();
        service.delete(&mut state).await.unwrap();

        assert!(!state.is_present());
        assert!(fake.group("g1").is_none());

        let err = service.read(&mut state).await.unwrap_err();
        assert!(matches!(err, DomainError::MissingId));
    }
}
