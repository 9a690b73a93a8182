//! Translation between user IDs and emails through the user search endpoint

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use jumpcloud_shared::constants::DEFAULT_FILTER_BATCH_SIZE;

use super::pagination::Paginator;
use crate::domain::{SystemUser, UserFilter, UserSearch};
use crate::error::DomainError;
use crate::repositories::JumpCloudApi;

pub struct UserTranslator<A: JumpCloudApi> {
    api: Arc<A>,
    paginator: Paginator,
    batch_size: usize,
}

impl<A: JumpCloudApi> UserTranslator<A> {
    pub fn new(api: Arc<A>, paginator: Paginator, batch_size: usize) -> Self {
        Self {
            api,
            paginator,
            batch_size: batch_size.max(1),
        }
    }

    pub fn with_defaults(api: Arc<A>) -> Self {
        Self::new(api, Paginator::default(), DEFAULT_FILTER_BATCH_SIZE)
    }

    /// Emails of the given users, sorted by email.
    pub async fn ids_to_emails(&self, ids: &[String]) -> Result<Vec<String>, DomainError> {
        self.translate(ids, UserFilter::IdIn, |user| user.email, "error loading user emails from IDs")
            .await
    }

    /// IDs of the users owning the given emails, sorted by ID.
    pub async fn emails_to_ids(&self, emails: &[String]) -> Result<Vec<String>, DomainError> {
        self.translate(emails, UserFilter::EmailIn, |user| user.id, "error loading user IDs from emails")
            .await
    }

    async fn translate(
        &self,
        values: &[String],
        make_filter: fn(Vec<String>) -> UserFilter,
        project: fn(SystemUser) -> String,
        operation: &str,
    ) -> Result<Vec<String>, DomainError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        // A value repeated across batches would otherwise be returned once per batch.
        let mut seen = HashSet::with_capacity(values.len());
        let unique: Vec<String> = values.iter().filter(|v| seen.insert(v.as_str())).cloned().collect();

        let batches = unique.chunks(self.batch_size).count();
        let mut translated = Vec::with_capacity(unique.len());
        for batch in unique.chunks(self.batch_size) {
            let filter = make_filter(batch.to_vec());
            let users = self
                .paginator
                .collect(|page| {
                    let search = UserSearch::new(filter.clone(), page);
                    let api = &self.api;
                    async move { api.search_users(&search).await }
                })
                .await
                .map_err(|e| e.context(format!("{} {:?}", operation, batch)))?;
            translated.extend(users.into_iter().map(project));
        }

        // Each batch comes back sorted; merge them back into one order.
        if batches > 1 {
            translated.sort();
            translated.dedup();
        }
        debug!(requested = values.len(), translated = translated.len(), batches, "translated users");
        Ok(translated)
    }
}
