//! Application lookup behind the application data source

use std::sync::Arc;

use tracing::{debug, info};

use super::pagination::Paginator;
use crate::domain::{Application, ApplicationQuery};
use crate::error::DomainError;
use crate::repositories::JumpCloudApi;

pub struct ApplicationService<A: JumpCloudApi> {
    api: Arc<A>,
    paginator: Paginator,
}

impl<A: JumpCloudApi> ApplicationService<A> {
    pub fn new(api: Arc<A>, paginator: Paginator) -> Self {
        Self { api, paginator }
    }

    /// First application whose display name equals `query.name` or whose
    /// display label equals `query.display_label`.
    pub async fn lookup(&self, query: &ApplicationQuery) -> Result<Application, DomainError> {
        if query.is_empty() {
            return Err(DomainError::ValidationError(
                "either name or display_label must be provided".into(),
            ));
        }

        let applications = self
            .paginator
            .collect(|page| {
                let api = &self.api;
                async move { api.list_applications(page).await }
            })
            .await
            .map_err(|e| e.context("error listing applications"))?;

        for application in applications {
            debug!(
                "Checking application with DisplayName: {}, DisplayLabel: {}",
                application.display_name, application.display_label
            );
            if query.matches(&application) {
                info!("Application found: {}", application.id);
                return Ok(application);
            }
        }

        Err(DomainError::ApplicationNotFound)
    }
}
