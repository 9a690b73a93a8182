//! Common types

use serde::{Deserialize, Serialize};

/// One `skip`/`limit` window over a remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// Window for the zero-based page `index` of size `limit`.
    pub fn nth(index: u32, limit: u32) -> Self {
        Self {
            skip: index.saturating_mul(limit),
            limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { skip: 0, limit: super::constants::DEFAULT_PAGE_SIZE }
    }
}
