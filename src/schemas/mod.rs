// Data types shared across the crate: configuration, platform, versions and
// the error hierarchy.

pub mod common;
pub mod errors;
pub mod path_resolver;
pub mod platform;
pub mod project_config;
pub mod setup_config;
pub mod version;
