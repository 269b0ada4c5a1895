//! Link building
//!
//! Turns the references found in one provider record into deduplicated
//! [`LinkedItemQuery`] edges.
//!
//! Bindings first collect every potential link into a [`ReferenceBag`]. Absent
//! optional fields are dropped at insertion, so bindings never need nested
//! guards. The [`LinkBuilder`] then resolves each reference:
//!
//! - **target type and key**: the target's registry segments are used to parse
//!   the identifier, and multi-part keys always go through the composite codec
//! - **scope**: taken from the reference's own identifier first, and from the
//!   referencing item's scope only when that fails. A scope matching one of
//!   the builder's known scopes ignoring ASCII case is rendered with the known
//!   spelling, since ARM references often lowercase the resource group
//! - **method and blast propagation**: fixed by the [`LinkKind`]

mod endpoint;

pub use endpoint::{classify_host, Classified, Endpoint};

use crate::azure::composite_key;
use crate::azure::resource_id;
use crate::azure::scope::{resolve_scope_or, GLOBAL_SCOPE};
use crate::item::{BlastPropagation, ItemType, LinkedItemQuery, Query, QueryMethod};
use crate::resource::registry::{find_owner_type, get_resource};
use std::collections::HashSet;

/// Relationship between an item and a referenced resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Parent to its collection of dependent children
    ChildCollection,
    /// A resource this item requires (including a child's parent)
    Dependency,
    /// An embedded child with its own identity and lifecycle
    OwnedChild,
    /// A resource that uses this item
    Dependent,
}

impl LinkKind {
    pub const fn method(self) -> QueryMethod {
        match self {
            Self::ChildCollection => QueryMethod::Search,
            Self::Dependency | Self::OwnedChild | Self::Dependent => QueryMethod::Get,
        }
    }

    pub const fn blast(self) -> BlastPropagation {
        match self {
            Self::ChildCollection => BlastPropagation::new(false, true),
            Self::Dependency => BlastPropagation::new(true, false),
            Self::OwnedChild => BlastPropagation::new(true, true),
            Self::Dependent => BlastPropagation::new(false, true),
        }
    }
}

/// Endpoints are shared infrastructure: impact flows both ways
const ENDPOINT_BLAST: BlastPropagation = BlastPropagation::new(true, true);

/// How a referenced resource is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A full ARM identifier, carrying both key parts and scope
    Id(String),
    /// Key parts known directly, with an optional identifier to take the scope from
    Parts {
        parts: Vec<String>,
        scope_from: Option<String>,
    },
}

/// A reference to another Azure resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: LinkKind,
    pub item_type: ItemType,
    pub target: Target,
}

/// Every potential link of one record
#[derive(Debug, Clone, Default)]
pub struct ReferenceBag {
    resources: Vec<ResourceRef>,
    endpoints: Vec<Endpoint>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ReferenceBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> &[ResourceRef] {
        &self.resources
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Reference by full identifier
    pub fn id(&mut self, kind: LinkKind, item_type: ItemType, id: Option<&str>) -> &mut Self {
        if let Some(id) = present(id) {
            self.resources.push(ResourceRef {
                kind,
                item_type,
                target: Target::Id(id.to_string()),
            });
        }
        self
    }

    /// References by full identifier, one per id
    pub fn ids<'a>(
        &mut self,
        kind: LinkKind,
        item_type: ItemType,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        for id in ids {
            self.id(kind, item_type, Some(id));
        }
        self
    }

    /// Reference by identifier whose type is worked out from the registry.
    /// Identifiers owned by a type outside `candidates` are dropped.
    pub fn owner(&mut self, kind: LinkKind, candidates: &[ItemType], id: Option<&str>) -> &mut Self {
        if let Some(id) = present(id) {
            match find_owner_type(id).filter(|item_type| candidates.contains(item_type)) {
                Some(item_type) => {
                    self.id(kind, item_type, Some(id));
                }
                None => tracing::trace!("No candidate type owns {}", id),
            }
        }
        self
    }

    /// Reference by explicit key parts
    pub fn parts(
        &mut self,
        kind: LinkKind,
        item_type: ItemType,
        parts: Option<Vec<String>>,
        scope_from: Option<&str>,
    ) -> &mut Self {
        if let Some(parts) = parts {
            self.resources.push(ResourceRef {
                kind,
                item_type,
                target: Target::Parts {
                    parts,
                    scope_from: present(scope_from).map(str::to_string),
                },
            });
        }
        self
    }

    /// Collection of children under the given parent key, in the item's own scope
    pub fn children(&mut self, item_type: ItemType, parent_parts: &[String]) -> &mut Self {
        self.parts(
            LinkKind::ChildCollection,
            item_type,
            Some(parent_parts.to_vec()),
            None,
        )
    }

    pub fn ip(&mut self, value: Option<&str>) -> &mut Self {
        if let Some(value) = present(value) {
            self.endpoints.push(Endpoint::Ip(value.to_string()));
        }
        self
    }

    pub fn host(&mut self, value: Option<&str>) -> &mut Self {
        if let Some(value) = present(value) {
            self.endpoints.push(Endpoint::Host(value.to_string()));
        }
        self
    }

    pub fn url(&mut self, value: Option<&str>) -> &mut Self {
        if let Some(value) = present(value) {
            self.endpoints.push(Endpoint::Url(value.to_string()));
        }
        self
    }
}

/// Accumulates deduplicated edges for one item
#[derive(Debug)]
pub struct LinkBuilder {
    scope: String,
    known_scopes: Vec<String>,
    links: Vec<LinkedItemQuery>,
    seen: HashSet<Query>,
}

impl LinkBuilder {
    /// Builder for an item living in `item_scope`
    pub fn new(item_scope: &str) -> Self {
        Self {
            scope: item_scope.to_string(),
            known_scopes: vec![item_scope.to_string()],
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Also render these scopes with their configured casing
    pub fn with_known_scopes<I>(mut self, scopes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.known_scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    fn canonical_scope(&self, scope: String) -> String {
        self.known_scopes
            .iter()
            .find(|known| known.eq_ignore_ascii_case(&scope))
            .cloned()
            .unwrap_or(scope)
    }

    /// Append an edge unless one with the same query already exists
    pub fn push(&mut self, query: Query, blast_propagation: BlastPropagation) -> bool {
        if !self.seen.insert(query.clone()) {
            return false;
        }
        self.links.push(LinkedItemQuery {
            query,
            blast_propagation,
        });
        true
    }

    /// Resolve and append a resource reference. Unresolvable references are skipped.
    pub fn add_resource(&mut self, reference: &ResourceRef) -> bool {
        match resolve_query(reference, &self.scope) {
            Some(mut query) => {
                query.scope = self.canonical_scope(query.scope);
                self.push(query, reference.kind.blast())
            }
            None => {
                tracing::trace!(
                    "Skipping unresolvable {} reference {:?}",
                    reference.item_type,
                    reference.target
                );
                false
            }
        }
    }

    /// Classify and append an endpoint. Unparseable values are skipped.
    pub fn add_endpoint(&mut self, endpoint: &Endpoint) {
        match endpoint.classify() {
            Some(classified) => self.add_classified(classified),
            None => tracing::trace!("Skipping unparseable endpoint {:?}", endpoint),
        }
    }

    fn add_classified(&mut self, classified: Classified) {
        match classified {
            Classified::Ip(ip) => {
                self.push(
                    global_query(ItemType::Ip, QueryMethod::Get, ip.to_string()),
                    ENDPOINT_BLAST,
                );
            }
            Classified::Host(host) => {
                self.push(
                    global_query(ItemType::Dns, QueryMethod::Search, host),
                    ENDPOINT_BLAST,
                );
            }
            Classified::Url { url, host } => {
                self.push(
                    global_query(ItemType::Http, QueryMethod::Search, url),
                    ENDPOINT_BLAST,
                );
                if let Some(host) = host.as_deref().and_then(classify_host) {
                    self.add_classified(host);
                }
            }
        }
    }

    /// Append everything in a reference bag, resources first
    pub fn add_bag(&mut self, bag: &ReferenceBag) {
        for reference in bag.resources() {
            self.add_resource(reference);
        }
        for endpoint in bag.endpoints() {
            self.add_endpoint(endpoint);
        }
    }

    pub fn finish(self) -> Vec<LinkedItemQuery> {
        self.links
    }
}

/// Build the edges for one item from its reference bag
pub fn build_links(bag: &ReferenceBag, item_scope: &str) -> Vec<LinkedItemQuery> {
    let mut builder = LinkBuilder::new(item_scope);
    builder.add_bag(bag);
    builder.finish()
}

fn global_query(item_type: ItemType, method: QueryMethod, query: String) -> Query {
    Query {
        item_type,
        method,
        query,
        scope: GLOBAL_SCOPE.to_string(),
    }
}

/// Work out the query a resource reference resolves to
fn resolve_query(reference: &ResourceRef, item_scope: &str) -> Option<Query> {
    let def = get_resource(reference.item_type)?;
    let labels = def.parse_labels();
    let method = reference.kind.method();
    let wanted = match method {
        QueryMethod::Get => &labels[..],
        QueryMethod::Search => &labels[..labels.len().saturating_sub(1)],
    };
    if wanted.is_empty() {
        return None;
    }

    let (parts, scope) = match &reference.target {
        Target::Id(id) => (
            resource_id::parse(id, wanted)?,
            resolve_scope_or(Some(id), item_scope),
        ),
        Target::Parts { parts, scope_from } => {
            if parts.len() != wanted.len() {
                return None;
            }
            (
                parts.clone(),
                resolve_scope_or(scope_from.as_deref(), item_scope),
            )
        }
    };

    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }

    Some(Query {
        item_type: reference.item_type,
        method,
        query: composite_key::encode(&parts),
        scope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIC_ID: &str =
        "/subscriptions/S2/resourceGroups/RG2/providers/Microsoft.Network/networkInterfaces/nic-1";

    #[test]
    fn test_kinds_fix_method_and_blast() {
        let child = LinkKind::ChildCollection.blast();
        assert_eq!(LinkKind::ChildCollection.method(), QueryMethod::Search);
        assert!(!child.inbound() && child.outbound());

        let dep = LinkKind::Dependency.blast();
        assert_eq!(LinkKind::Dependency.method(), QueryMethod::Get);
        assert!(dep.inbound() && !dep.outbound());

        let owned = LinkKind::OwnedChild.blast();
        assert!(owned.inbound() && owned.outbound());
    }

    #[test]
    fn test_reference_scope_comes_from_its_own_id() {
        let mut bag = ReferenceBag::new();
        bag.id(LinkKind::Dependency, ItemType::NetworkNetworkInterface, Some(NIC_ID));
        let links = build_links(&bag, "S1.RG1");

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].query.scope, "S2.RG2");
        assert_eq!(links[0].query.query, "nic-1");
    }

    #[test]
    fn test_parts_without_scope_fall_back_to_item_scope() {
        let mut bag = ReferenceBag::new();
        bag.parts(
            LinkKind::Dependency,
            ItemType::KeyVaultKey,
            Some(vec!["vault".to_string(), "key".to_string()]),
            Some("https://vault.vault.azure.net"),
        );
        let links = build_links(&bag, "S1.RG1");

        assert_eq!(links[0].query.scope, "S1.RG1");
        assert_eq!(links[0].query.query, "vault|key");
    }

    #[test]
    fn test_lowercased_resource_group_takes_known_casing() {
        let managed_by = "/subscriptions/S1/resourcegroups/rg1/providers/Microsoft.Compute/virtualMachines/vm-1";
        let other = "/subscriptions/S1/resourcegroups/rg2/providers/Microsoft.Compute/virtualMachines/vm-2";
        let mut bag = ReferenceBag::new();
        bag.id(LinkKind::Dependent, ItemType::ComputeVirtualMachine, Some(managed_by))
            .id(LinkKind::Dependent, ItemType::ComputeVirtualMachine, Some(other))
            .id(
                LinkKind::Dependent,
                ItemType::ComputeVirtualMachine,
                Some("/subscriptions/S2/resourceGroups/RG2/providers/Microsoft.Compute/virtualMachines/vm-3"),
            );

        let mut builder = LinkBuilder::new("S1.RG1").with_known_scopes(["S1.RG2"]);
        builder.add_bag(&bag);
        let scopes: Vec<String> = builder.finish().into_iter().map(|l| l.query.scope).collect();

        assert_eq!(scopes, vec!["S1.RG1", "S1.RG2", "S2.RG2"]);
    }

    #[test]
    fn test_duplicate_targets_collapse() {
        let mut bag = ReferenceBag::new();
        bag.id(LinkKind::Dependency, ItemType::NetworkNetworkInterface, Some(NIC_ID))
            .id(LinkKind::Dependency, ItemType::NetworkNetworkInterface, Some(NIC_ID))
            .ip(Some("10.0.0.4"))
            .host(Some("10.0.0.4"));
        let links = build_links(&bag, "S1.RG1");

        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_missing_and_malformed_references_are_skipped() {
        let mut bag = ReferenceBag::new();
        bag.id(LinkKind::Dependency, ItemType::NetworkSubnet, None)
            .id(LinkKind::Dependency, ItemType::NetworkSubnet, Some(""))
            .id(LinkKind::Dependency, ItemType::NetworkSubnet, Some(NIC_ID))
            .parts(LinkKind::Dependency, ItemType::NetworkSubnet, Some(vec!["only-one".to_string()]), None)
            .ip(Some("garbage"));
        assert!(build_links(&bag, "S1.RG1").is_empty());
    }

    #[test]
    fn test_child_collection_uses_parent_labels() {
        let mut bag = ReferenceBag::new();
        bag.id(
            LinkKind::ChildCollection,
            ItemType::NetworkSubnet,
            Some("/subscriptions/S/resourceGroups/RG/providers/Microsoft.Network/virtualNetworks/vnet"),
        );
        let links = build_links(&bag, "S.RG");
        assert_eq!(links[0].query.method, QueryMethod::Search);
        assert_eq!(links[0].query.query, "vnet");
    }

    #[test]
    fn test_url_links_http_and_dns() {
        let mut bag = ReferenceBag::new();
        bag.url(Some("https://acct.blob.core.windows.net/"));
        let links = build_links(&bag, "S.RG");

        let types: Vec<ItemType> = links.iter().map(|l| l.query.item_type).collect();
        assert_eq!(types, vec![ItemType::Http, ItemType::Dns]);
        assert!(links.iter().all(|l| l.query.scope == GLOBAL_SCOPE));
        assert!(links
            .iter()
            .all(|l| l.blast_propagation.inbound() && l.blast_propagation.outbound()));
    }

    #[test]
    fn test_owner_resolves_type_from_registry() {
        let mut bag = ReferenceBag::new();
        let config = "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Network/networkInterfaces/nic/ipConfigurations/ipconfig1";
        bag.owner(LinkKind::Dependent, &[ItemType::NetworkNetworkInterface], Some(config))
            .owner(LinkKind::Dependent, &[ItemType::NetworkLoadBalancer], Some(config));

        assert_eq!(bag.resources().len(), 1);
        assert_eq!(bag.resources()[0].item_type, ItemType::NetworkNetworkInterface);
    }
}
