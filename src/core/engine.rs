//! Catalog Engine
//!
//! Runs one fetch-and-assemble cycle per user interaction: read persisted
//! state, reconcile filters on a tab transition, plan the fetch, issue
//! the candidate and facet-projection fetches jointly, assemble the page,
//! recompute facets and commit any silent corrections back to the state
//! holder. Overlapping cycles resolve by last-cycle-wins: the monotonic
//! request token and the raw state captured at cycle start are both
//! compared at completion time and stale outcomes are discarded, never
//! merged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::CatalogConfig;
use crate::core::assemble::{self, AssembledPage};
use crate::core::error::Result;
use crate::core::facets;
use crate::core::model::PageResult;
use crate::core::query::state::QueryState;
use crate::core::query::store::QueryStateStore;
use crate::core::query::{decode, encode};
use crate::core::source::fixed::StaticAdapter;
use crate::core::source::store::StoreAdapter;
use crate::core::source::{PaginationMode, RecordStore, SourceAdapter};
use crate::core::tabs::{self, SourceKind, Tab};

/// Outcome of one cycle.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// This cycle's parameters were still current; render its page.
    Rendered(PageResult),
    /// A newer cycle started before this one resolved; discard.
    Superseded,
}

/// Central engine owning the state holder and the source adapters.
pub struct CatalogEngine {
    config: CatalogConfig,
    state: QueryStateStore,
    shared: StoreAdapter,
    fixed: StaticAdapter,
    cycle: AtomicU64,
    last_tab: Mutex<Option<Tab>>,
}

impl CatalogEngine {
    /// Build an engine over a record store. Fails on a malformed
    /// tab/filter registry - a configuration defect must surface during
    /// development, not silently at runtime.
    pub fn new(config: CatalogConfig, store: Arc<dyn RecordStore>) -> Result<Self> {
        tabs::validate_registry()?;
        Ok(Self {
            config,
            state: QueryStateStore::default(),
            shared: StoreAdapter::new(store),
            fixed: StaticAdapter::builtin(),
            cycle: AtomicU64::new(0),
            last_tab: Mutex::new(None),
        })
    }

    /// Replace the builtin static collections.
    pub fn with_static_records(
        mut self,
        records: Vec<crate::core::model::CatalogRecord>,
    ) -> Self {
        self.fixed = StaticAdapter::new(records);
        self
    }

    /// The persisted-state holder (read/commit are its only operations).
    pub fn query_store(&self) -> &QueryStateStore {
        &self.state
    }

    /// Current decoded query state.
    pub fn current_state(&self) -> QueryState {
        decode(&self.state.read(), &self.config)
    }

    /// Apply one discrete user edit to the persisted state. Every
    /// mutation routes through the holder's `commit`.
    pub fn update<F: FnOnce(&mut QueryState)>(&self, edit: F) {
        let mut state = self.current_state();
        edit(&mut state);
        self.state.commit(encode(&state, &self.config));
    }

    fn adapter_for(&self, tab: Tab) -> &dyn SourceAdapter {
        match tab.spec().source {
            SourceKind::SharedStore => &self.shared,
            SourceKind::Static => &self.fixed,
        }
    }

    /// Run one fetch-and-assemble cycle against the current state.
    ///
    /// Returns `Superseded` when a newer cycle was initiated, or the
    /// persisted state was edited, before this one resolved. Store
    /// failures on the candidate fetch propagate as
    /// typed errors (the retry action is re-running the cycle); facet
    /// projection failures degrade to an empty facet set.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let token = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = self.state.read();
        let mut state = decode(&snapshot, &self.config);

        // Reconcile on a tab transition, never on plain reads. `last_tab`
        // only advances when this cycle commits; a superseded cycle
        // leaves the transition pending so the winning cycle redoes the
        // purge instead of losing it.
        let prev = *self.last_tab.lock().expect("tab lock poisoned");
        if let Some(prev) = prev {
            if prev != state.tab {
                let reconciled = tabs::reconcile(prev, state.tab, &state.filters);
                if reconciled != state.filters {
                    // Candidate set size may change: back to page one.
                    state.filters = reconciled;
                    state.page = 1;
                }
            }
        }

        let plan = assemble::plan_fetch(&state, &self.config);
        let adapter = self.adapter_for(state.tab);

        // Candidate and facet fetches are issued together and awaited
        // jointly; the facet query is shaped differently (no page window,
        // no facet filters).
        let (candidates, projection) =
            tokio::join!(adapter.fetch(&plan), adapter.facet_projection(&plan));
        let outcome = candidates?;
        let projection = match projection {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Facet projection failed, degrading to empty facets: {}", e);
                Vec::new()
            }
        };

        let mut assembled = assemble::assemble(outcome, &plan, &state);

        // Server-paginated out-of-range page: refetch page one once and
        // reflect the correction, converging with the client-side reset.
        if plan.mode == PaginationMode::ServerPage && state.page > assembled.last_page {
            log::debug!(
                "Page {} beyond last page {}, resetting to 1",
                state.page,
                assembled.last_page
            );
            state.page = 1;
            let retry_plan = assemble::plan_fetch(&state, &self.config);
            let retry = adapter.fetch(&retry_plan).await?;
            assembled = assemble::assemble(retry, &retry_plan, &state);
        }
        state.page = assembled.page;

        // Facets see the same tab-scoped rule as the assembler: keys the
        // tab does not recognize never constrain sibling facets.
        let mut facet_filters = state.filters.clone();
        facet_filters.retain_keys(|key| state.tab.recognizes(key));
        let facet_keys = state.tab.facet_keys();
        let facet_set = facets::compute_facets(&projection, &facet_filters, &facet_keys);

        // Last cycle wins: a stale outcome is discarded, not merged, and
        // must not clobber newer persisted state. The token detects a
        // newer cycle; the raw-state comparison detects a discrete edit
        // that landed mid-flight without starting one.
        if self.cycle.load(Ordering::SeqCst) != token || self.state.read() != snapshot {
            log::debug!("Cycle {} superseded, discarding outcome", token);
            return Ok(CycleOutcome::Superseded);
        }
        *self.last_tab.lock().expect("tab lock poisoned") = Some(state.tab);
        self.state.commit(encode(&state, &self.config));

        let AssembledPage {
            records,
            total,
            page,
            last_page,
        } = assembled;
        Ok(CycleOutcome::Rendered(PageResult {
            records,
            total,
            page,
            last_page,
            facets: facet_set,
        }))
    }
}
