//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod environment;
pub mod error;
pub mod local_beach;
pub mod project;
pub mod readiness;
pub mod resources;

pub use environment::{ENV_FILES, EnvironmentMap, parse_env_file};
pub use error::{
    CommandError, CredentialsError, EnvFileError, ProjectError, ReadinessError,
    ResourceNameError,
};
pub use local_beach::LocalBeachLayout;
pub use project::{MARKER_FILE, Sandbox, sanitize_project_name};
pub use readiness::{ReadinessPolicy, is_healthy};
pub use resources::{
    CloudStorageAccess, InstanceAddress, parse_cloud_storage_access, resource_directory_for_hash,
};
