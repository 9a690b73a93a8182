//! Configuration management

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_FILTER_BATCH_SIZE, DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
use crate::error::AppError;

/// Connection and paging settings for the JumpCloud API.
///
/// `url` is the base of the v2 API; the v1 base used by the user search and
/// application endpoints is derived from it.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default)]
    pub org_id: Option<String>,
    pub url: String,
    pub page_size: u32,
    pub page_delay_ms: u64,
    pub filter_batch_size: usize,
}

impl ProviderConfig {
    /// Settings with every default applied, for callers that build the
    /// configuration themselves.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            org_id: None,
            url: url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay_ms: DEFAULT_PAGE_DELAY_MS,
            filter_batch_size: DEFAULT_FILTER_BATCH_SIZE,
        }
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Load from `config/default`, `config/{APP_ENV}` and `JUMPCLOUD_*`
    /// environment variables, in increasing precedence.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("url", DEFAULT_API_URL)?
            .set_default("page_size", DEFAULT_PAGE_SIZE as i64)?
            .set_default("page_delay_ms", DEFAULT_PAGE_DELAY_MS as i64)?
            .set_default("filter_batch_size", DEFAULT_FILTER_BATCH_SIZE as i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("JUMPCLOUD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: ProviderConfig = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::InvalidConfig("api_key must not be empty".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidConfig(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.filter_batch_size == 0 {
            return Err(AppError::InvalidConfig("filter_batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Organization header value, if one is configured.
    pub fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn v2_url(&self) -> String {
        self.url.trim_end_matches('/').to_string()
    }

    /// The v1 API lives one level above the v2 base (`.../api/v2` -> `.../api`).
    pub fn v1_url(&self) -> String {
        let v2 = self.v2_url();
        match v2.strip_suffix("/v2") {
            Some(base) => base.to_string(),
            None => v2,
        }
    }
}
