//! # JumpCloud Infrastructure
//!
//! HTTP adapter for the JumpCloud API port.

pub mod http;

pub use http::HttpJumpCloudClient;
