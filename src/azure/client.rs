//! Azure Resource Manager client interface
//!
//! The engine never talks to ARM directly. It asks a [`ResourceClient`] for a
//! single record by resource path, or for a [`Pager`] over a collection path.
//! Transport, authentication and retries belong to the client implementation.

use super::scope::Scope;
use async_trait::async_trait;
use serde_json::Value;

/// Access to ARM records, keyed by resource path
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch a single record, e.g.
    /// `/subscriptions/S/resourceGroups/RG/providers/Microsoft.Compute/disks/d1`
    async fn get(&self, resource_path: &str) -> anyhow::Result<Value>;

    /// Enumerate a collection, e.g.
    /// `/subscriptions/S/resourceGroups/RG/providers/Microsoft.Compute/disks`
    fn list(&self, collection_path: &str) -> Box<dyn Pager>;
}

/// Cursor over the pages of a collection
#[async_trait]
pub trait Pager: Send {
    /// Whether another page can be fetched
    fn more(&self) -> bool;

    /// Fetch the next page of records
    async fn next_page(&mut self) -> anyhow::Result<Vec<Value>>;
}

/// Builder for ARM resource and collection paths within one resource group
#[derive(Debug, Clone)]
pub struct ArmPath {
    subscription: String,
    resource_group: String,
}

impl ArmPath {
    pub fn new(subscription: &str, resource_group: &str) -> Self {
        Self {
            subscription: subscription.to_string(),
            resource_group: resource_group.to_string(),
        }
    }

    /// Path builder for a resource group scope; `None` for the global scope
    pub fn for_scope(scope: &Scope) -> Option<Self> {
        match scope {
            Scope::Global => None,
            Scope::ResourceGroup {
                subscription,
                resource_group,
            } => Some(Self::new(subscription, resource_group)),
        }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// `/subscriptions/{s}/resourceGroups/{rg}`
    pub fn resource_group_path(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}",
            self.subscription, self.resource_group
        )
    }

    /// `/subscriptions/{s}/resourceGroups/{rg}/providers/{namespace}`
    pub fn provider_path(&self, namespace: &str) -> String {
        format!("{}/providers/{}", self.resource_group_path(), namespace)
    }

    /// Path of a single resource: every segment followed by its name part
    pub fn resource_path<S: AsRef<str>>(
        &self,
        namespace: &str,
        segments: &[S],
        parts: &[String],
    ) -> String {
        let mut path = self.provider_path(namespace);
        for (segment, part) in segments.iter().zip(parts) {
            path.push('/');
            path.push_str(segment.as_ref());
            path.push('/');
            path.push_str(part);
        }
        path
    }

    /// Path of a collection: the parent parts fill every segment but the last
    pub fn collection_path<S: AsRef<str>>(
        &self,
        namespace: &str,
        segments: &[S],
        parent_parts: &[String],
    ) -> String {
        let mut path = self.provider_path(namespace);
        for (i, segment) in segments.iter().enumerate() {
            path.push('/');
            path.push_str(segment.as_ref());
            if let Some(part) = parent_parts.get(i) {
                path.push('/');
                path.push_str(part);
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path() {
        let arm = ArmPath::new("S", "RG");
        let path = arm.resource_path(
            "Microsoft.Network",
            &["virtualNetworks", "subnets"],
            &["vnet".to_string(), "default".to_string()],
        );
        assert_eq!(
            path,
            "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Network/virtualNetworks/vnet/subnets/default"
        );
    }

    #[test]
    fn test_collection_path_for_top_level() {
        let arm = ArmPath::new("S", "RG");
        let path = arm.collection_path("Microsoft.Compute", &["disks"], &[]);
        assert_eq!(
            path,
            "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Compute/disks"
        );
    }

    #[test]
    fn test_collection_path_with_fixed_segments() {
        let arm = ArmPath::new("S", "RG");
        let path = arm.collection_path(
            "Microsoft.Storage",
            &["storageAccounts", "blobServices/default/containers"],
            &["acct".to_string()],
        );
        assert_eq!(
            path,
            "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Storage/storageAccounts/acct/blobServices/default/containers"
        );
    }

    #[test]
    fn test_global_scope_has_no_path() {
        assert!(ArmPath::for_scope(&Scope::Global).is_none());
    }
}
