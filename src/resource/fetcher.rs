//! Resource Fetcher
//!
//! Drains a provider [`Pager`] page by page. Every page fetch is an await
//! point, so dropping the caller's future stops enumeration between pages.

use crate::azure::client::Pager;
use anyhow::Result;
use serde_json::Value;

/// Fetch all records of a collection (auto-paginate).
///
/// Any page error aborts the whole fetch; records from earlier pages are
/// discarded.
pub async fn fetch_all(pager: Box<dyn Pager>) -> Result<Vec<Value>> {
    let mut all_records = Vec::new();
    fetch_each(pager, |record| all_records.push(record)).await?;
    Ok(all_records)
}

/// Visit every record of a collection as its page arrives.
///
/// Returns the number of pages fetched. On a page error the records of
/// earlier pages have already been visited.
pub async fn fetch_each<F>(mut pager: Box<dyn Pager>, mut visit: F) -> Result<usize>
where
    F: FnMut(Value),
{
    let mut pages = 0;

    while pager.more() {
        let records = pager.next_page().await?;
        pages += 1;
        tracing::trace!("Fetched page {} ({} records)", pages, records.len());

        for record in records {
            visit(record);
        }
    }

    Ok(pages)
}
