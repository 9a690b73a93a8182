//! HTTP adapters (reqwest)

pub mod client;
mod response;

pub use client::HttpJumpCloudClient;
