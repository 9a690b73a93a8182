//! Skip/limit pagination over remote collections

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use jumpcloud_shared::constants::{DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE};
use jumpcloud_shared::{PageRequest, ProviderConfig};

use crate::error::DomainError;

/// Fetches pages of a fixed size until a short page comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: u32,
    delay: Duration,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, Duration::from_millis(DEFAULT_PAGE_DELAY_MS))
    }
}

impl Paginator {
    pub fn new(page_size: u32, delay: Duration) -> Self {
        Self {
            page_size: page_size.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.page_size, config.page_delay())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Concatenate every page returned by `fetch`.
    ///
    /// A page shorter than the page size ends the loop, so a collection whose
    /// size is a multiple of the page size costs one extra empty fetch. The
    /// first error is returned as-is.
    pub async fn collect<T, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>, DomainError>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<Vec<T>, DomainError>>,
    {
        let mut items = Vec::new();
        let mut index = 0u32;
        loop {
            let page = PageRequest::nth(index, self.page_size);
            let batch = fetch(page).await?;
            debug!(skip = page.skip, limit = page.limit, received = batch.len(), "fetched page");

            let last = batch.len() < self.page_size as usize;
            items.extend(batch);
            if last {
                return Ok(items);
            }

            index += 1;
            sleep(self.delay).await;
        }
    }
}
