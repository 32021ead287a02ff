//! Content Sources
//!
//! Uniform adapter boundary over the heterogeneous record sources: the
//! shared queryable store for most tabs, static in-memory collections for
//! the rest. Both produce records already shaped as `CatalogRecord` so
//! the assembler is source-agnostic. All fetch errors are converted to
//! typed results at this boundary, never thrown past the assembler.

pub mod fixed;
pub mod store;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::model::{CatalogRecord, RecordStatus, SortKey};
use crate::core::tabs::Tab;

// ============================================================================
// Fetch Plan
// ============================================================================

/// Pagination strategy chosen per cycle by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Every active constraint is pushable: the source returns exactly
    /// one page.
    ServerPage,
    /// Some filter needs client-side normalization: the source returns a
    /// bounded superset (up to a hard cap) for local processing.
    ClientSuperset,
}

/// One cycle's resolved fetch parameters.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub tab: Tab,
    pub mode: PaginationMode,
    /// Free-text term, pushable to the store
    pub search: String,
    pub sort: SortKey,
    /// Status constraint pushed to the source; `None` means the status
    /// filter itself needs client-side handling
    pub status: Option<RecordStatus>,
    /// Requested page (1-based) and size, used in `ServerPage` mode
    pub page: u32,
    pub page_size: u32,
    /// Row cap for `ClientSuperset` mode and facet projections
    pub superset_cap: usize,
}

/// Candidate records plus the source's total for the same constraints.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub records: Vec<CatalogRecord>,
    /// Exact or approximate post-filter count at the source
    pub approx_total: usize,
}

// ============================================================================
// Record Store Boundary
// ============================================================================

/// Query pushed to the shared store. The store's internal execution is
/// opaque; this is the whole contract.
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    /// Classification hint: record kinds to include (empty = all)
    pub kinds: Vec<String>,
    /// Status equality constraint
    pub status: Option<RecordStatus>,
    /// Case-insensitive containment over title and summary
    pub search: String,
    /// Store-side sort
    pub sort: Option<SortKey>,
    pub offset: usize,
    pub limit: usize,
}

/// Store response: one window of records plus the total matching count.
#[derive(Debug, Clone)]
pub struct StoreResponse {
    pub records: Vec<CatalogRecord>,
    pub total: usize,
}

/// The opaque remote filterable/sortable record source.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn query(&self, query: &StoreQuery) -> Result<StoreResponse>;
}

// ============================================================================
// Source Adapter
// ============================================================================

/// Uniform per-tab fetch operation.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Fetch candidate records per the plan: exactly one page in
    /// `ServerPage` mode, a capped superset in `ClientSuperset` mode.
    async fn fetch(&self, plan: &FetchPlan) -> Result<FetchOutcome>;

    /// Fetch the facet-counting projection: tab-scoped and
    /// search-matched, but unfiltered by any facet. Issued jointly with
    /// `fetch`; its failure degrades facets, never the whole cycle.
    async fn facet_projection(&self, plan: &FetchPlan) -> Result<Vec<CatalogRecord>>;
}
