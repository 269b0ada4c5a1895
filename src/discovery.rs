//! Discovery run
//!
//! Lists every top-level type in every configured scope, then follows the
//! `SEARCH` edges of the discovered items into child adapters until no new
//! query turns up. Calls run concurrently, bounded by
//! [`DiscoveryOptions::concurrency`]; failures are collected next to the items
//! instead of aborting the run.

use crate::azure::client::ResourceClient;
use crate::azure::scope::ScopeSet;
use crate::error::DiscoveryError;
use crate::item::{Item, ItemType, Query, QueryMethod};
use crate::resource::registry::get_all_item_types;
use crate::resource::Adapter;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Default number of provider calls in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Options for a discovery run
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Maximum number of provider calls in flight
    pub concurrency: usize,
    /// Item types to discover; empty means every registered type
    pub types: Vec<ItemType>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            types: Vec::new(),
        }
    }
}

impl DiscoveryOptions {
    fn wants(&self, item_type: ItemType) -> bool {
        self.types.is_empty() || self.types.contains(&item_type)
    }
}

/// Outcome of a discovery run
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Items sorted by globally unique name, one per name
    pub items: Vec<Item>,
    pub errors: Vec<DiscoveryError>,
}

/// One adapter per registered item type, sorted by type
pub fn adapters<C>(client: Arc<C>, scopes: &ScopeSet) -> Vec<Adapter<C>>
where
    C: ResourceClient + ?Sized,
{
    get_all_item_types()
        .into_iter()
        .filter_map(|item_type| Adapter::new(item_type, Arc::clone(&client), scopes.clone()))
        .collect()
}

/// Discover every item reachable from the configured scopes
pub async fn discover<C>(client: Arc<C>, scopes: &ScopeSet, options: &DiscoveryOptions) -> DiscoveryReport
where
    C: ResourceClient + ?Sized,
{
    let concurrency = options.concurrency.max(1);
    let by_type: HashMap<ItemType, Adapter<C>> = adapters(client, scopes)
        .into_iter()
        .filter(|adapter| options.wants(adapter.item_type()))
        .map(|adapter| (adapter.item_type(), adapter))
        .collect();

    let mut items: BTreeMap<String, Item> = BTreeMap::new();
    let mut errors = Vec::new();

    // Top-level types are listed in every scope
    let mut lists = Vec::new();
    for adapter in by_type.values().filter(|a| a.supported_methods().list) {
        for scope in adapter.scopes() {
            lists.push((adapter, scope));
        }
    }
    tracing::info!("Listing {} type/scope combinations", lists.len());

    let mut fresh = Vec::new();
    let results: Vec<_> = stream::iter(lists)
        .map(|(adapter, scope)| async move { adapter.list(&scope).await })
        .buffer_unordered(concurrency)
        .collect()
        .await;
    absorb(results, &mut items, &mut errors, &mut fresh);

    // Child types are reached through their parents' SEARCH edges
    let mut searched: HashSet<Query> = HashSet::new();
    loop {
        let searches: Vec<(&Adapter<C>, Query)> = fresh
            .iter()
            .flat_map(|item: &Item| item.linked_item_queries.iter())
            .map(|link| &link.query)
            .filter(|query| query.method == QueryMethod::Search)
            .filter_map(|query| {
                let adapter = by_type.get(&query.item_type)?;
                let in_scope = scopes.resolve(&query.scope).is_ok();
                (in_scope && searched.insert(query.clone())).then(|| (adapter, query.clone()))
            })
            .collect();

        if searches.is_empty() {
            break;
        }
        tracing::debug!("Following {} search edges", searches.len());

        fresh = Vec::new();
        let results: Vec<_> = stream::iter(searches)
            .map(|(adapter, query)| async move { adapter.search(&query.scope, &query.query).await })
            .buffer_unordered(concurrency)
            .collect()
            .await;
        absorb(results, &mut items, &mut errors, &mut fresh);
    }

    tracing::info!(
        "Discovered {} items with {} errors",
        items.len(),
        errors.len()
    );

    DiscoveryReport {
        items: items.into_values().collect(),
        errors,
    }
}

/// Merge call results, keeping the first item seen under each name
fn absorb(
    results: Vec<Result<Vec<Item>, DiscoveryError>>,
    items: &mut BTreeMap<String, Item>,
    errors: &mut Vec<DiscoveryError>,
    fresh: &mut Vec<Item>,
) {
    for result in results {
        match result {
            Ok(found) => {
                for item in found {
                    let name = item.globally_unique_name();
                    if !items.contains_key(&name) {
                        fresh.push(item.clone());
                        items.insert(name, item);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                errors.push(e);
            }
        }
    }
}
