//! Azure discovery source
//!
//! Reads Azure Resource Manager records through a [`ResourceClient`] and maps
//! them into [`Item`]s: uniform graph nodes carrying typed, scoped edges to the
//! resources they reference, each with a blast-propagation direction.
//!
//! [`ResourceClient`]: azure::ResourceClient
//! [`Item`]: item::Item

pub mod azure;
pub mod config;
pub mod discovery;
pub mod error;
pub mod item;
pub mod link;
pub mod resource;

/// Version injected at compile time via AZURE_SOURCE_VERSION env var (set by
/// CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("AZURE_SOURCE_VERSION") {
    Some(v) => v,
    None => "dev",
};

pub use discovery::{discover, DiscoveryOptions, DiscoveryReport};
pub use error::{DiscoveryError, DiscoveryResult};
pub use item::{BlastPropagation, Health, Item, ItemType, LinkedItemQuery, Query, QueryMethod};
pub use resource::Adapter;
