//! Resource Adapter
//!
//! One generic adapter serves every item type. It is driven by the type's
//! registry entry (paths, lookups), its binding (references) and a provider
//! client, and exposes the Get/List/Search contract plus streaming variants.
//!
//! Queries are validated before the client is called: the scope must resolve
//! through the adapter's [`ScopeSet`], and decoded key parts must match the
//! lookup arity with no empty part.

use super::bindings::{get_binding, TypeBinding};
use super::fetcher;
use super::mapper::map_record;
use super::registry::{get_resource, ResourceDef, TerraformMapping};
use crate::azure::client::{ArmPath, ResourceClient};
use crate::azure::composite_key;
use crate::azure::scope::{Scope, ScopeSet};
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::item::{Item, ItemType};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Methods an adapter answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedMethods {
    pub get: bool,
    pub list: bool,
    pub search: bool,
}

/// Static description of an adapter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterMetadata {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub display_name: String,
    pub category: String,
    pub lookups: Vec<String>,
    pub search_lookups: Vec<String>,
    pub potential_links: Vec<ItemType>,
    pub terraform_mappings: Vec<TerraformMapping>,
    pub supported_methods: SupportedMethods,
    pub scopes: Vec<String>,
}

/// Adapter for one item type over one subscription's resource groups
pub struct Adapter<C: ResourceClient + ?Sized> {
    def: &'static ResourceDef,
    binding: &'static TypeBinding,
    client: Arc<C>,
    scopes: ScopeSet,
    /// Rendered scopes, used to normalize the casing of edge scopes
    known_scopes: Vec<String>,
}

impl<C: ResourceClient + ?Sized> Clone for Adapter<C> {
    fn clone(&self) -> Self {
        Self {
            def: self.def,
            binding: self.binding,
            client: Arc::clone(&self.client),
            scopes: self.scopes.clone(),
            known_scopes: self.known_scopes.clone(),
        }
    }
}

impl<C: ResourceClient + ?Sized> Adapter<C> {
    /// Adapter for a registered type; `None` for the standard types, which
    /// no Azure adapter serves
    pub fn new(item_type: ItemType, client: Arc<C>, scopes: ScopeSet) -> Option<Self> {
        let known_scopes = scopes.scopes().iter().map(Scope::to_string).collect();
        Some(Self {
            def: get_resource(item_type)?,
            binding: get_binding(item_type)?,
            client,
            scopes,
            known_scopes,
        })
    }

    pub fn item_type(&self) -> ItemType {
        self.binding.item_type
    }

    /// Scopes this adapter answers for, rendered `{subscription}.{group}`
    pub fn scopes(&self) -> Vec<String> {
        self.known_scopes.clone()
    }

    pub fn supported_methods(&self) -> SupportedMethods {
        SupportedMethods {
            get: true,
            list: !self.def.is_child(),
            search: self.def.is_child(),
        }
    }

    pub fn metadata(&self) -> AdapterMetadata {
        AdapterMetadata {
            item_type: self.item_type(),
            display_name: self.def.display_name.clone(),
            category: self.def.category.clone(),
            lookups: self.def.lookups.clone(),
            search_lookups: self.def.search_lookups().to_vec(),
            potential_links: self.def.potential_links.clone(),
            terraform_mappings: self.def.terraform_mappings.clone(),
            supported_methods: self.supported_methods(),
            scopes: self.scopes(),
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn invalid(&self, scope: &str, reason: impl Into<String>) -> DiscoveryError {
        DiscoveryError::validation(scope, self.item_type(), reason)
    }

    /// Resolve a scope string into the scope and its path builder
    fn resolve(&self, scope: &str) -> DiscoveryResult<(Scope, ArmPath)> {
        let resolved = self
            .scopes
            .resolve(scope)
            .map_err(|reason| self.invalid(scope, reason))?;
        let arm = ArmPath::for_scope(&resolved)
            .ok_or_else(|| self.invalid(scope, "scope does not name a resource group"))?;
        Ok((resolved, arm))
    }

    /// Decode a query into exactly `labels.len()` non-empty key parts
    fn decode_parts(&self, scope: &str, query: &str, labels: &[String]) -> DiscoveryResult<Vec<String>> {
        let parts = composite_key::decode(query).ok_or_else(|| {
            self.invalid(scope, format!("query '{}' has a malformed escape", query))
        })?;
        if parts.len() != labels.len() {
            return Err(self.invalid(
                scope,
                format!(
                    "query '{}' has {} part(s), expected {} ({})",
                    query,
                    parts.len(),
                    labels.len(),
                    labels.join(", ")
                ),
            ));
        }
        if let Some(idx) = parts.iter().position(String::is_empty) {
            return Err(self.invalid(
                scope,
                format!("query '{}' has an empty {}", query, labels[idx]),
            ));
        }
        Ok(parts)
    }

    fn require_list(&self, scope: &str) -> DiscoveryResult<()> {
        if self.def.is_child() {
            return Err(self.invalid(
                scope,
                format!(
                    "{} cannot be listed; search by {}",
                    self.item_type(),
                    self.def.search_lookups().join(", ")
                ),
            ));
        }
        Ok(())
    }

    fn require_search(&self, scope: &str) -> DiscoveryResult<()> {
        if !self.def.is_child() {
            return Err(self.invalid(
                scope,
                format!("{} has no parent to search under; use list", self.item_type()),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Mapping
    // =========================================================================

    fn map(&self, record: &Value, scope: &Scope, parent_parts: &[String]) -> Option<Item> {
        let item = map_record(
            self.def,
            self.binding,
            record,
            &scope.to_string(),
            parent_parts,
            &self.known_scopes,
        );
        if item.is_none() {
            tracing::warn!(
                "Skipping {} record without a name in {}: {}",
                self.item_type(),
                scope,
                record.get("id").and_then(|v| v.as_str()).unwrap_or("<no id>")
            );
        }
        item
    }

    /// Drain a collection into items, skipping unnamed records
    async fn collect(
        &self,
        scope: &Scope,
        collection_path: &str,
        parent_parts: &[String],
    ) -> DiscoveryResult<Vec<Item>> {
        let pager = self.client.list(collection_path);
        let records = fetcher::fetch_all(pager)
            .await
            .map_err(|e| DiscoveryError::provider(&scope.to_string(), self.item_type(), e))?;

        Ok(records
            .iter()
            .filter_map(|record| self.map(record, scope, parent_parts))
            .collect())
    }

    /// Stream a collection, one callback per item as pages arrive
    async fn stream<F, E>(
        &self,
        scope: &Scope,
        collection_path: &str,
        parent_parts: &[String],
        mut on_item: F,
        mut on_error: E,
    ) where
        F: FnMut(Item),
        E: FnMut(DiscoveryError),
    {
        let pager = self.client.list(collection_path);
        let result = fetcher::fetch_each(pager, |record| {
            if let Some(item) = self.map(&record, scope, parent_parts) {
                on_item(item);
            }
        })
        .await;

        if let Err(e) = result {
            tracing::error!("{} stream in {} aborted: {}", self.item_type(), scope, e);
            on_error(DiscoveryError::provider(&scope.to_string(), self.item_type(), e));
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetch exactly one item by its (possibly composite) key
    pub async fn get(&self, scope: &str, query: &str) -> DiscoveryResult<Item> {
        tracing::debug!("GET {} '{}' in '{}'", self.item_type(), query, scope);

        let (resolved, arm) = self.resolve(scope)?;
        let parts = self.decode_parts(scope, query, &self.def.lookups)?;
        let path = self.def.resource_path(&arm, &parts);

        let record = self
            .client
            .get(&path)
            .await
            .map_err(|e| DiscoveryError::provider(&resolved.to_string(), self.item_type(), e))?;

        map_record(
            self.def,
            self.binding,
            &record,
            &resolved.to_string(),
            &parts[..parts.len() - 1],
            &self.known_scopes,
        )
        .ok_or_else(|| {
            DiscoveryError::mapping(
                &resolved.to_string(),
                self.item_type(),
                format!("record at {} has no name", path),
            )
        })
    }

    /// Every item of a top-level type in one scope
    pub async fn list(&self, scope: &str) -> DiscoveryResult<Vec<Item>> {
        tracing::debug!("LIST {} in '{}'", self.item_type(), scope);

        self.require_list(scope)?;
        let (resolved, arm) = self.resolve(scope)?;
        let path = self.def.collection_path(&arm, &[]);
        self.collect(&resolved, &path, &[]).await
    }

    /// Every child of the parent named by `query`
    pub async fn search(&self, scope: &str, query: &str) -> DiscoveryResult<Vec<Item>> {
        tracing::debug!("SEARCH {} '{}' in '{}'", self.item_type(), query, scope);

        self.require_search(scope)?;
        let (resolved, arm) = self.resolve(scope)?;
        let parent_parts = self.decode_parts(scope, query, self.def.search_lookups())?;
        let path = self.def.collection_path(&arm, &parent_parts);
        self.collect(&resolved, &path, &parent_parts).await
    }

    /// Streaming [`list`](Self::list): items are handed over page by page, and
    /// a failure is reported once through `on_error`
    pub async fn list_stream<F, E>(&self, scope: &str, on_item: F, mut on_error: E)
    where
        F: FnMut(Item),
        E: FnMut(DiscoveryError),
    {
        tracing::debug!("LIST (stream) {} in '{}'", self.item_type(), scope);

        let (resolved, arm) = match self.require_list(scope).and_then(|_| self.resolve(scope)) {
            Ok(resolved) => resolved,
            Err(e) => return on_error(e),
        };
        let path = self.def.collection_path(&arm, &[]);
        self.stream(&resolved, &path, &[], on_item, on_error).await;
    }

    /// Streaming [`search`](Self::search)
    pub async fn search_stream<F, E>(&self, scope: &str, query: &str, on_item: F, mut on_error: E)
    where
        F: FnMut(Item),
        E: FnMut(DiscoveryError),
    {
        tracing::debug!("SEARCH (stream) {} '{}' in '{}'", self.item_type(), query, scope);

        let validated = self.require_search(scope).and_then(|_| {
            let (resolved, arm) = self.resolve(scope)?;
            let parts = self.decode_parts(scope, query, self.def.search_lookups())?;
            Ok((resolved, arm, parts))
        });
        let (resolved, arm, parent_parts) = match validated {
            Ok(validated) => validated,
            Err(e) => return on_error(e),
        };
        let path = self.def.collection_path(&arm, &parent_parts);
        self.stream(&resolved, &path, &parent_parts, on_item, on_error)
            .await;
    }
}
