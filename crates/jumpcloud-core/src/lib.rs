//! # JumpCloud Core
//!
//! Domain entities, the JumpCloud API port, and the services behind the
//! user group resource and the application data source.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use repositories::JumpCloudApi;
