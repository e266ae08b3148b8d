//! Turns search hits back into records, in the order the search service ranked them.

use std::collections::HashMap;

use common::search_result::{Identified, ResultPage, SearchResultSet};

use crate::db_utils::edition_store::{EagerLoad, RecordStore};


/// Loads the records behind `results` with a single store query and pages
/// them in hit order.
///
/// Hits whose record no longer exists (deleted since indexing) are dropped
/// from the page; `total_count` stays the provider's total.
pub async fn materialize<S: RecordStore>(
    store: &S,
    results: &SearchResultSet,
    eager_load: &EagerLoad,
    page: u64,
    per_page: u64,
) -> anyhow::Result<ResultPage<S::Record>>
where
    S::Record: Clone,
{
    if results.is_empty() {
        return Ok(ResultPage::empty(page, per_page));
    }

    let ids = results.ids();
    let mut unique_ids = ids.clone();
    unique_ids.sort_unstable();
    unique_ids.dedup();

    let records = store.fetch_by_ids(&unique_ids, eager_load).await?;
    let (records, missing) = order_by_ids(records, &ids);
    if !missing.is_empty() {
        tracing::warn!(?missing, "search hits without a matching record were left out of the page");
    }

    Ok(ResultPage { records, page, per_page, total_count: results.total })
}

/// Arranges `records` in the order of `ids`, returning the ids that had no record.
pub fn order_by_ids<T: Identified + Clone>(records: Vec<T>, ids: &[u64]) -> (Vec<T>, Vec<u64>) {
    let by_id: HashMap<u64, T> = records.into_iter().map(|record| (record.id(), record)).collect();
    let mut ordered = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match by_id.get(id) {
            Some(record) => ordered.push(record.clone()),
            None => missing.push(*id),
        }
    }
    (ordered, missing)
}
