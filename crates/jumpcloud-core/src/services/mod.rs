//! Domain services (business logic)

pub mod pagination;
pub mod translator;
pub mod membership;
pub mod user_group_service;
pub mod application_service;

#[cfg(test)]
pub(crate) mod fake_api;

pub use pagination::Paginator;
pub use translator::UserTranslator;
pub use membership::{diff_members, MembershipDiff};
pub use user_group_service::UserGroupService;
pub use application_service::ApplicationService;
