//! Repository traits (ports)

pub mod jumpcloud_api;

pub use jumpcloud_api::JumpCloudApi;

#[cfg(test)]
pub use jumpcloud_api::MockJumpCloudApi;
