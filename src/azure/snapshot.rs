//! Snapshot client
//!
//! An in-memory [`ResourceClient`] over an exported list of ARM records, as
//! produced by `az resource list -o json` or an ARM list response body.
//! Collections are paged by a configurable page size, and a transport failure
//! can be injected on a chosen page.

use super::client::{Pager, ResourceClient};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Resource client backed by a fixed set of records
#[derive(Debug)]
pub struct SnapshotClient {
    records: Vec<Value>,
    by_id: HashMap<String, usize>,
    page_size: usize,
    fail_on_page: Option<usize>,
    requests: AtomicUsize,
}

impl SnapshotClient {
    /// Create a client over the given records, indexed by lowercased `id`
    pub fn new(records: Vec<Value>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                record
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(|id| (normalize_path(id), idx))
            })
            .collect();

        Self {
            records,
            by_id,
            page_size: DEFAULT_PAGE_SIZE,
            fail_on_page: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Load records from a JSON file holding either an array of records or an
    /// ARM list body (`{ "value": [...] }`)
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let parsed: Value =
            serde_json::from_str(&content).context("Failed to parse snapshot JSON")?;

        let records = match parsed {
            Value::Array(records) => records,
            Value::Object(mut map) => match map.remove("value") {
                Some(Value::Array(records)) => records,
                _ => return Err(anyhow::anyhow!("Snapshot object has no 'value' array")),
            },
            _ => return Err(anyhow::anyhow!("Snapshot must be a JSON array or object")),
        };

        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    /// Set the number of records returned per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fail every enumeration when it reaches the given page (1-based)
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    /// Number of get/list calls that reached this client
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn members_of(&self, collection_path: &str) -> Vec<Value> {
        let collection = normalize_path(collection_path);
        self.records
            .iter()
            .filter(|record| {
                record
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(normalize_path)
                    .and_then(|id| id.rsplit_once('/').map(|(parent, _)| parent == collection))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResourceClient for SnapshotClient {
    async fn get(&self, resource_path: &str) -> Result<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("GET {}", resource_path);

        self.by_id
            .get(&normalize_path(resource_path))
            .and_then(|idx| self.records.get(*idx))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("ResourceNotFound: {}", resource_path))
    }

    fn list(&self, collection_path: &str) -> Box<dyn Pager> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("LIST {}", collection_path);

        let members = self.members_of(collection_path);
        let pages: VecDeque<Vec<Value>> = members
            .chunks(self.page_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        Box::new(SnapshotPager {
            collection: collection_path.to_string(),
            pages,
            fetched: 0,
            fail_on_page: self.fail_on_page,
        })
    }
}

/// Pager over pre-chunked records
struct SnapshotPager {
    collection: String,
    pages: VecDeque<Vec<Value>>,
    fetched: usize,
    fail_on_page: Option<usize>,
}

#[async_trait]
impl Pager for SnapshotPager {
    fn more(&self) -> bool {
        !self.pages.is_empty()
    }

    async fn next_page(&mut self) -> Result<Vec<Value>> {
        self.fetched += 1;
        if self.fail_on_page == Some(self.fetched) {
            return Err(anyhow::anyhow!(
                "connection reset while fetching page {} of {}",
                self.fetched,
                self.collection
            ));
        }
        Ok(self.pages.pop_front().unwrap_or_default())
    }
}

/// ARM paths compare case-insensitively and ignore a trailing slash
fn normalize_path(path: &str) -> String {
    path.trim_end_matches('/').to_ascii_lowercase()
}
