//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the static per-type metadata (lookups, ARM path segments,
//! potential links, Terraform mappings) from embedded JSON files and provides
//! lookup functions for the rest of the crate.

use crate::azure::client::ArmPath;
use crate::azure::resource_id::ResourceId;
use crate::item::{ItemType, QueryMethod};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/compute.json"),
    include_str!("../resources/network.json"),
    include_str!("../resources/keyvault.json"),
    include_str!("../resources/storage.json"),
    include_str!("../resources/identity.json"),
];

/// Mapping from a Terraform attribute to a query against this type
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TerraformMapping {
    pub method: QueryMethod,
    pub query_field: String,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    pub category: String,
    /// Provider namespace, e.g. `Microsoft.Network`
    pub namespace: String,
    /// ARM collection names from the outermost resource inwards. A segment may
    /// carry fixed inner path pieces, e.g. `blobServices/default/containers`.
    pub segments: Vec<String>,
    /// Key-part labels, one per segment
    pub lookups: Vec<String>,
    #[serde(default)]
    pub potential_links: Vec<ItemType>,
    #[serde(default)]
    pub terraform_mappings: Vec<TerraformMapping>,
}

impl ResourceDef {
    /// Child types are addressed through a parent and support Search, not List
    pub fn is_child(&self) -> bool {
        self.segments.len() > 1
    }

    /// Labels that precede each name part in a resource identifier
    pub fn parse_labels(&self) -> Vec<&str> {
        self.segments
            .iter()
            .map(|segment| segment.rsplit('/').next().unwrap_or(segment))
            .collect()
    }

    /// Type labels as they appear in an identifier, fixed inner pieces included
    /// (`storageAccounts`, `blobServices`, `containers`)
    pub fn arm_type_labels(&self) -> Vec<&str> {
        self.segments
            .iter()
            .flat_map(|segment| segment.split('/').step_by(2))
            .collect()
    }

    /// Full ARM resource type, e.g. `Microsoft.Network/virtualNetworks/subnets`
    pub fn arm_type(&self) -> String {
        format!("{}/{}", self.namespace, self.arm_type_labels().join("/"))
    }

    /// Labels of the key parts a Search takes
    pub fn search_lookups(&self) -> &[String] {
        if self.is_child() {
            &self.lookups[..self.lookups.len() - 1]
        } else {
            &[]
        }
    }

    /// Resource path for a full set of key parts
    pub fn resource_path(&self, arm: &ArmPath, parts: &[String]) -> String {
        arm.resource_path(&self.namespace, &self.segments, parts)
    }

    /// Collection path under the given parent parts
    pub fn collection_path(&self, arm: &ArmPath, parent_parts: &[String]) -> String {
        arm.collection_path(&self.namespace, &self.segments, parent_parts)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceFile {
    #[serde(default)]
    resources: HashMap<String, ResourceDef>,
}

/// All resource definitions, keyed by item type
#[derive(Debug, Clone, Default)]
pub struct ResourceConfig {
    pub resources: HashMap<ItemType, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig::default();

        for content in RESOURCE_FILES {
            let partial: ResourceFile = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            for (key, def) in partial.resources {
                let item_type: ItemType = key
                    .parse()
                    .unwrap_or_else(|e| panic!("Invalid embedded resource key: {}", e));
                final_config.resources.insert(item_type, def);
            }
        }

        tracing::debug!("Loaded {} resource definitions", final_config.resources.len());
        final_config
    })
}

/// Get a resource definition by item type
pub fn get_resource(item_type: ItemType) -> Option<&'static ResourceDef> {
    get_registry().resources.get(&item_type)
}

/// Get all registered item types, sorted
pub fn get_all_item_types() -> Vec<ItemType> {
    let mut types: Vec<ItemType> = get_registry().resources.keys().copied().collect();
    types.sort();
    types
}

/// Find the registered type that owns an identifier.
///
/// Picks the definition whose type labels are the longest prefix of the
/// identifier's, so a NIC IP configuration id resolves to the NIC and a load
/// balancer front-end id resolves to the front-end configuration.
pub fn find_owner_type(identifier: &str) -> Option<ItemType> {
    let id = ResourceId::parse(identifier);
    let namespace = id.provider_namespace()?;
    let labels = id.type_labels()?;

    get_registry()
        .resources
        .iter()
        .filter(|(_, def)| def.namespace.eq_ignore_ascii_case(namespace))
        .filter_map(|(item_type, def)| {
            let def_labels = def.arm_type_labels();
            let is_prefix = def_labels.len() <= labels.len()
                && def_labels
                    .iter()
                    .zip(&labels)
                    .all(|(a, b)| a.eq_ignore_ascii_case(b));
            is_prefix.then_some((def_labels.len(), *item_type))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, item_type)| item_type)
}
