//! Resource abstraction layer
//!
//! This module provides a data-driven approach to Azure resource types.
//! Static per-type metadata is loaded from JSON files at compile time, and a
//! small per-type binding says which references a record carries. One generic
//! [`Adapter`] combines both with a provider client.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`bindings`] - Per-type reference extraction, one file per service
//! - [`mapper`] - Converts ARM records into items
//! - [`fetcher`] - Drains provider pagers page by page
//! - [`adapter`] - Get/List/Search/Stream over one item type
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`:
//! - `compute.json` - virtual machines, disks, availability sets
//! - `network.json` - virtual networks, interfaces, load balancers
//! - `keyvault.json` - vaults, keys, secrets
//! - `storage.json` - storage accounts and their containers, shares, queues
//! - `identity.json` - user-assigned managed identities
//!
//! # Example
//!
//! ```
//! use azure_source::azure::{ScopeSet, SnapshotClient};
//! use azure_source::item::ItemType;
//! use azure_source::resource::Adapter;
//! use std::sync::Arc;
//!
//! let client = Arc::new(SnapshotClient::new(Vec::new()));
//! let scopes = ScopeSet::new("sub-1", vec!["rg-1".to_string()]);
//! let disks = Adapter::new(ItemType::ComputeDisk, client, scopes).unwrap();
//! assert_eq!(disks.scopes(), vec!["sub-1.rg-1"]);
//! ```

pub mod adapter;
pub mod bindings;
pub mod fetcher;
pub mod mapper;
pub mod registry;

pub use adapter::{Adapter, AdapterMetadata, SupportedMethods};
pub use bindings::{get_binding, TypeBinding};
pub use mapper::map_record;
pub use registry::*;
