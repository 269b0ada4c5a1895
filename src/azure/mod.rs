//! Azure Resource Manager plumbing
//!
//! This module holds the provider-facing building blocks of the engine:
//! identifier parsing, scope resolution, composite keys and the client
//! interface adapters are bound to.
//!
//! # Module Structure
//!
//! - [`resource_id`] - Parses ARM resource identifiers
//! - [`scope`] - Scope type, scope resolution and multi-scope sets
//! - [`composite_key`] - Encodes multi-part lookup keys
//! - [`client`] - Provider client traits and ARM path construction
//! - [`snapshot`] - In-memory client over exported ARM records
//!
//! # Example
//!
//! ```
//! use azure_source::azure::{resource_id, scope};
//!
//! let id = "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Network/virtualNetworks/v/subnets/s";
//! assert_eq!(resource_id::parse(id, &["virtualNetworks", "subnets"]), Some(vec!["v".to_string(), "s".to_string()]));
//! assert_eq!(scope::resolve_scope(id).map(|s| s.to_string()).as_deref(), Some("S.RG"));
//! ```

pub mod client;
pub mod composite_key;
pub mod resource_id;
pub mod scope;
pub mod snapshot;

pub use client::{ArmPath, Pager, ResourceClient};
pub use scope::{resolve_scope, resolve_scope_or, Scope, ScopeSet, GLOBAL_SCOPE};
pub use snapshot::SnapshotClient;
