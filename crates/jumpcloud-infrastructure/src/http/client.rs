// ============================================================================
// JumpCloud Infrastructure - HTTP Client
// File: crates/jumpcloud-infrastructure/src/http/client.rs
// ============================================================================
//! reqwest implementation of the JumpCloud API port.
//!
//! Group and membership endpoints live on the v2 API; user search and the
//! application list live on v1. Both share one client and the same headers.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::debug;

use jumpcloud_core::domain::{
    Application, GraphConnection, MemberRequest, SystemUser, UserGroup, UserGroupRequest,
    UserSearch,
};
use jumpcloud_core::error::DomainError;
use jumpcloud_core::repositories::JumpCloudApi;
use jumpcloud_shared::constants::{HEADER_API_KEY, HEADER_ORG_ID};
use jumpcloud_shared::{PageRequest, ProviderConfig};

use super::response::{decode, ensure_success, status_error, transport, ListResponse};

const APPLICATION_FIELDS: &str = "_id displayName displayLabel";

pub struct HttpJumpCloudClient {
    client: Client,
    v1_url: String,
    v2_url: String,
}

impl HttpJumpCloudClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| transport("building client", e))?;

        Ok(Self {
            client,
            v1_url: config.v1_url(),
            v2_url: config.v2_url(),
        })
    }

    fn group_url(&self, id: &str) -> String {
        format!("{}/usergroups/{}", self.v2_url, id)
    }

    fn members_url(&self, group_id: &str) -> String {
        format!("{}/usergroups/{}/members", self.v2_url, group_id)
    }
}

fn default_headers(config: &ProviderConfig) -> Result<HeaderMap, DomainError> {
    let header_value = |name: &str, value: &str| {
        let mut value = HeaderValue::from_str(value)
            .map_err(|_| DomainError::ValidationError(format!("invalid {} header value", name)))?;
        value.set_sensitive(name == HEADER_API_KEY);
        Ok::<_, DomainError>(value)
    };

    let mut headers = HeaderMap::new();
    headers.insert(HEADER_API_KEY, header_value(HEADER_API_KEY, &config.api_key)?);
    if let Some(org_id) = config.org_id() {
        headers.insert(HEADER_ORG_ID, header_value(HEADER_ORG_ID, org_id)?);
    }
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[async_trait]
impl JumpCloudApi for HttpJumpCloudClient {
    async fn create_user_group(&self, request: &UserGroupRequest) -> Result<UserGroup, DomainError> {
        let response = self
            .client
            .post(format!("{}/usergroups", self.v2_url))
            .json(request)
            .send()
            .await
            .map_err(|e| transport("creating user group", e))?;
        decode(response).await
    }

    async fn replace_user_group(
        &self,
        id: &str,
        request: &UserGroupRequest,
    ) -> Result<UserGroup, DomainError> {
        let response = self
            .client
            .patch(self.group_url(id))
            .json(request)
            .send()
            .await
            .map_err(|e| transport("updating user group", e))?;
        decode(response).await
    }

    async fn delete_user_group(&self, id: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .delete(self.group_url(id))
            .send()
            .await
            .map_err(|e| transport("deleting user group", e))?;
        ensure_success(response).await.map(|_| ())
    }

    async fn get_user_group(&self, id: &str) -> Result<Option<UserGroup>, DomainError> {
        let response = self
            .client
            .get(self.group_url(id))
            .send()
            .await
            .map_err(|e| transport("reading user group", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("User group {} not found", id);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        decode(response).await.map(Some)
    }

    async fn list_group_members(
        &self,
        group_id: &str,
        page: PageRequest,
    ) -> Result<Vec<GraphConnection>, DomainError> {
        let response = self
            .client
            .get(self.members_url(group_id))
            .query(&[("limit", page.limit), ("skip", page.skip)])
            .send()
            .await
            .map_err(|e| transport("listing group members", e))?;
        decode(response).await
    }

    async fn manage_group_member(
        &self,
        group_id: &str,
        request: &MemberRequest,
    ) -> Result<(), DomainError> {
        let response = self
            .client
            .post(self.members_url(group_id))
            .json(request)
            .send()
            .await
            .map_err(|e| transport("managing group member", e))?;
        ensure_success(response).await.map(|_| ())
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<SystemUser>, DomainError> {
        let limit = search.page.limit.to_string();
        let skip = search.page.skip.to_string();
        let filter = search.filter.to_query();
        let response = self
            .client
            .get(format!("{}/systemusers", self.v1_url))
            .query(&[
                ("filter", filter.as_str()),
                ("limit", limit.as_str()),
                ("skip", skip.as_str()),
                ("fields", search.fields()),
                ("sort", search.sort()),
            ])
            .send()
            .await
            .map_err(|e| transport("searching users", e))?;

        let list: ListResponse<SystemUser> = decode(response).await?;
        debug!("User search page: {} of {} results", list.results.len(), list.total_count);
        Ok(list.results)
    }

    async fn list_applications(&self, page: PageRequest) -> Result<Vec<Application>, DomainError> {
        let limit = page.limit.to_string();
        let skip = page.skip.to_string();
        let response = self
            .client
            .get(format!("{}/applications", self.v1_url))
            .query(&[
                ("fields", APPLICATION_FIELDS),
                ("limit", limit.as_str()),
                ("skip", skip.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport("listing applications", e))?;

        let list: ListResponse<Application> = decode(response).await?;
        debug!("Application page: {} of {} results", list.results.len(), list.total_count);
        Ok(list.results)
    }
}
