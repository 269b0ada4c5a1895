//! Item model
//!
//! Items are the uniform graph nodes the engine emits. Each carries the
//! queries that resolve to related items, together with the direction in
//! which change impact travels along that edge.

mod types;

pub use types::ItemType;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How a query resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryMethod {
    /// Exactly one item
    Get,
    /// Zero or more items
    Search,
}

/// A resolvable reference to one or more items
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub method: QueryMethod,
    pub query: String,
    pub scope: String,
}

/// Direction of change impact along an edge.
///
/// `inbound`: a change to the target affects the source.
/// `outbound`: a change to the source affects the target.
/// At least one is always set; values only come from relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlastPropagation {
    #[serde(rename = "in")]
    inbound: bool,
    #[serde(rename = "out")]
    outbound: bool,
}

impl BlastPropagation {
    pub(crate) const fn new(inbound: bool, outbound: bool) -> Self {
        assert!(inbound || outbound, "blast propagation needs a direction");
        Self { inbound, outbound }
    }

    pub fn inbound(&self) -> bool {
        self.inbound
    }

    pub fn outbound(&self) -> bool {
        self.outbound
    }
}

/// An edge from an item to the items a query resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedItemQuery {
    pub query: Query,
    pub blast_propagation: BlastPropagation,
}

/// Health derived from the provider's lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Health {
    Ok,
    Pending,
    Error,
}

impl Health {
    /// Translate an ARM `provisioningState`
    pub fn from_provisioning_state(state: &str) -> Option<Self> {
        const PENDING: &[&str] = &[
            "creating",
            "updating",
            "deleting",
            "accepted",
            "provisioning",
            "migrating",
        ];

        let state = state.to_ascii_lowercase();
        match state.as_str() {
            "succeeded" => Some(Self::Ok),
            "failed" | "canceled" => Some(Self::Error),
            s if PENDING.contains(&s) => Some(Self::Pending),
            _ => None,
        }
    }
}

/// A normalized, discovered resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub scope: String,
    /// Name of the attribute holding this item's unique value
    pub unique_attribute: String,
    pub attributes: Map<String, Value>,
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
    pub linked_item_queries: Vec<LinkedItemQuery>,
}

impl Item {
    /// Value of the unique attribute
    pub fn unique_attribute_value(&self) -> Option<&str> {
        self.attributes
            .get(&self.unique_attribute)
            .and_then(|v| v.as_str())
    }

    /// `{scope}.{type}.{value}`, unique across a discovery run
    pub fn globally_unique_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.scope,
            self.item_type,
            self.unique_attribute_value().unwrap_or_default()
        )
    }

    /// GET query that resolves back to this item
    pub fn reference(&self) -> Query {
        Query {
            item_type: self.item_type,
            method: QueryMethod::Get,
            query: self.unique_attribute_value().unwrap_or_default().to_string(),
            scope: self.scope.clone(),
        }
    }

    /// Edges of one target type
    pub fn links_to(&self, item_type: ItemType) -> impl Iterator<Item = &LinkedItemQuery> {
        self.linked_item_queries
            .iter()
            .filter(move |link| link.query.item_type == item_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_from_provisioning_state() {
        assert_eq!(Health::from_provisioning_state("Succeeded"), Some(Health::Ok));
        assert_eq!(Health::from_provisioning_state("Updating"), Some(Health::Pending));
        assert_eq!(Health::from_provisioning_state("deleting"), Some(Health::Pending));
        assert_eq!(Health::from_provisioning_state("Failed"), Some(Health::Error));
        assert_eq!(Health::from_provisioning_state("Canceled"), Some(Health::Error));
        assert_eq!(Health::from_provisioning_state("Whatever"), None);
    }

    #[test]
    #[should_panic(expected = "blast propagation needs a direction")]
    fn test_blast_propagation_requires_direction() {
        let _ = BlastPropagation::new(false, false);
    }

    #[test]
    fn test_item_wire_shape() {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), json!("vm-1"));
        let item = Item {
            item_type: ItemType::ComputeVirtualMachine,
            scope: "S.RG".to_string(),
            unique_attribute: "name".to_string(),
            attributes,
            tags: BTreeMap::new(),
            health: Some(Health::Ok),
            linked_item_queries: vec![LinkedItemQuery {
                query: Query {
                    item_type: ItemType::Ip,
                    method: QueryMethod::Get,
                    query: "10.0.0.4".to_string(),
                    scope: "global".to_string(),
                },
                blast_propagation: BlastPropagation::new(true, true),
            }],
        };

        let wire = serde_json::to_value(&item).unwrap();
        assert_eq!(wire["type"], "azure-compute-virtual-machine");
        assert_eq!(wire["uniqueAttribute"], "name");
        assert_eq!(wire["health"], "OK");
        assert_eq!(wire["linkedItemQueries"][0]["query"]["method"], "GET");
        assert_eq!(wire["linkedItemQueries"][0]["blastPropagation"]["in"], true);
        assert_eq!(item.globally_unique_name(), "S.RG.azure-compute-virtual-machine.vm-1");
    }
}
