//! Queryable-Store Adapter
//!
//! Wraps the shared record store behind the uniform adapter contract.
//! Pushes the tab classification hint, status constraint, search term and
//! sort to the store; the row range depends on the pagination mode. Also
//! provides `MemoryStore`, an embedded in-memory store implementation
//! used as the default backend and by tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::model::{self, CatalogRecord};
use crate::core::normalize;
use crate::core::source::{
    FetchOutcome, FetchPlan, PaginationMode, RecordStore, SourceAdapter, StoreQuery, StoreResponse,
};

// ============================================================================
// Store Adapter
// ============================================================================

/// Adapter for tabs backed by the shared queryable store.
#[derive(Clone)]
pub struct StoreAdapter {
    store: Arc<dyn RecordStore>,
}

impl StoreAdapter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn base_query(plan: &FetchPlan) -> StoreQuery {
        StoreQuery {
            kinds: plan
                .tab
                .spec()
                .kinds
                .iter()
                .map(|k| k.to_string())
                .collect(),
            status: plan.status,
            search: plan.search.clone(),
            sort: Some(plan.sort),
            offset: 0,
            limit: plan.superset_cap,
        }
    }
}

#[async_trait]
impl SourceAdapter for StoreAdapter {
    async fn fetch(&self, plan: &FetchPlan) -> Result<FetchOutcome> {
        let mut query = Self::base_query(plan);
        if plan.mode == PaginationMode::ServerPage {
            query.offset = (plan.page.saturating_sub(1) as usize) * plan.page_size as usize;
            query.limit = plan.page_size as usize;
        }
        log::debug!(
            "Store fetch tab={} mode={:?} offset={} limit={}",
            plan.tab.token(),
            plan.mode,
            query.offset,
            query.limit
        );
        let response = self.store.query(&query).await?;
        Ok(FetchOutcome {
            records: response.records,
            approx_total: response.total,
        })
    }

    async fn facet_projection(&self, plan: &FetchPlan) -> Result<Vec<CatalogRecord>> {
        // Same scoping as the candidate query, but never a page window:
        // facet counts need the whole (capped) candidate set.
        let query = Self::base_query(plan);
        let response = self.store.query(&query).await?;
        Ok(response.records)
    }
}

// ============================================================================
// Embedded In-Memory Store
// ============================================================================

/// In-memory `RecordStore`: filtering, sorting and windowing over a fixed
/// record list, matching the remote store's observable contract.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<CatalogRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query(&self, query: &StoreQuery) -> Result<StoreResponse> {
        let mut matched: Vec<CatalogRecord> = self
            .records
            .iter()
            .filter(|r| {
                if !query.kinds.is_empty() {
                    let classified = r
                        .record_type
                        .as_deref()
                        .map(|raw| query.kinds.iter().any(|kind| normalize::matches(kind, raw)))
                        .unwrap_or(false);
                    if !classified {
                        return false;
                    }
                }
                if let Some(status) = query.status {
                    if r.status != status {
                        return false;
                    }
                }
                r.matches_search(&query.search)
            })
            .cloned()
            .collect();

        if let Some(sort) = query.sort {
            model::sort_records(&mut matched, sort);
        }

        let total = matched.len();
        let windowed: Vec<CatalogRecord> = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(StoreResponse {
            records: windowed,
            total,
        })
    }
}
