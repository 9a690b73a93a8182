//! Application-wide constants

/// Records requested per page from any paginated endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Upper bound accepted by the remote API for `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Pause between two full pages.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 100;
/// Values packed into a single `$in` filter before the query is split.
pub const DEFAULT_FILTER_BATCH_SIZE: usize = 100;

pub const DEFAULT_API_URL: &str = "https://console.jumpcloud.com/api/v2";

pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_ORG_ID: &str = "x-org-id";
