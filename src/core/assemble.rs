//! Hybrid Pagination Planner & Result Assembler
//!
//! The planner decides per cycle whether the source can hand back exactly
//! one page (every active constraint is pushable) or must return a capped
//! superset for client-side processing (any facet filter needs
//! normalization the source cannot perform). The assembler applies the
//! fixed-order pipeline: classification, search, field filters,
//! tab-scoped rules, image backfill, sort, page slice. The order must not
//! change.

use crate::config::CatalogConfig;
use crate::core::model::{self, CatalogRecord, PageResult, RecordStatus};
use crate::core::normalize::{comparable_token, record_matches_filter};
use crate::core::query::state::QueryState;
use crate::core::source::{FetchOutcome, FetchPlan, PaginationMode};
use crate::core::tabs::Tab;

// ============================================================================
// Planner
// ============================================================================

/// Whether one filter entry can be pushed to the source. Only a
/// single-valued, well-known status constraint is store-side; every other
/// filter needs the normalizer and forces client-side processing.
fn pushable(key: &str, values: &[String]) -> bool {
    key == "status"
        && values.len() == 1
        && RecordStatus::from_token(&comparable_token(&values[0])).is_some()
}

/// Status constraint pushed to the source. Absent filter means approved
/// records only; a single well-known value is pushed as-is; anything else
/// is handled client-side (no store constraint).
fn effective_status(state: &QueryState) -> Option<RecordStatus> {
    match state.filters.get("status") {
        None => Some(RecordStatus::Approved),
        Some(values) if values.len() == 1 => {
            RecordStatus::from_token(&comparable_token(&values[0]))
        }
        Some(_) => None,
    }
}

/// Resolve the fetch parameters for one cycle.
pub fn plan_fetch(state: &QueryState, config: &CatalogConfig) -> FetchPlan {
    let all_pushable = state.filters.iter().all(|(k, v)| pushable(k, v));
    let mode = if all_pushable {
        PaginationMode::ServerPage
    } else {
        PaginationMode::ClientSuperset
    };
    log::debug!(
        "Planned {:?} for tab={} ({} active filters)",
        mode,
        state.tab.token(),
        state.filters.len()
    );
    FetchPlan {
        tab: state.tab,
        mode,
        search: state.search.clone(),
        sort: state.sort,
        status: effective_status(state),
        page: state.page,
        page_size: state.page_size,
        superset_cap: config.superset_cap,
    }
}

// ============================================================================
// Assembler
// ============================================================================

/// Post-pipeline page, before facets are attached.
#[derive(Debug, Clone)]
pub struct AssembledPage {
    pub records: Vec<CatalogRecord>,
    pub total: usize,
    pub page: u32,
    pub last_page: u32,
}

/// Placeholder image shown when a record carries none.
fn default_image(tab: Tab) -> &'static str {
    match tab {
        Tab::Guides => "/assets/defaults/guide.svg",
        Tab::Strategies => "/assets/defaults/strategy.svg",
        Tab::Offerings => "/assets/defaults/offering.svg",
        Tab::Testimonials => "/assets/defaults/testimonial.svg",
        Tab::Glossary => "/assets/defaults/term.svg",
        Tab::Faq => "/assets/defaults/faq.svg",
    }
}

fn backfill_images(records: &mut [CatalogRecord], tab: Tab) {
    for record in records {
        if record.image.is_none() {
            record.image = Some(default_image(tab).to_string());
        }
    }
}

/// Assemble the final page from fetched candidates.
///
/// In `ClientSuperset` mode the whole pipeline runs locally; if filtering
/// shrank the set below the requested page's range the result reports
/// page 1 rather than a silently empty page. In `ServerPage` mode the
/// source already filtered, sorted and windowed; only classification
/// verification and display backfill apply, and an out-of-range page is
/// reported as-is for the caller to correct.
pub fn assemble(outcome: FetchOutcome, plan: &FetchPlan, state: &QueryState) -> AssembledPage {
    match plan.mode {
        PaginationMode::ServerPage => {
            let mut records: Vec<CatalogRecord> = outcome
                .records
                .into_iter()
                .filter(|r| state.tab.classifies(r))
                .collect();
            backfill_images(&mut records, state.tab);
            let total = outcome.approx_total;
            AssembledPage {
                records,
                total,
                page: state.page,
                last_page: PageResult::last_page_for(total, state.page_size),
            }
        }
        PaginationMode::ClientSuperset => {
            // (1) tab classification
            let mut records: Vec<CatalogRecord> = outcome
                .records
                .into_iter()
                .filter(|r| state.tab.classifies(r))
                // (2) search containment
                .filter(|r| r.matches_search(&state.search))
                .collect();
            // (3) per-field filters, (4) tab-scoped rule: a key the tab
            // does not recognize is ignored here, never applied
            records.retain(|r| {
                state
                    .filters
                    .iter()
                    .filter(|(key, _)| state.tab.recognizes(key))
                    .all(|(key, selected)| record_matches_filter(r, key, selected))
            });
            // (5) display backfill
            backfill_images(&mut records, state.tab);
            // (6) sort
            model::sort_records(&mut records, state.sort);
            // (7) page slice
            let total = records.len();
            let last_page = PageResult::last_page_for(total, state.page_size);
            let page = if state.page > last_page { 1 } else { state.page };
            let start = (page.saturating_sub(1) as usize) * state.page_size as usize;
            let records = records
                .into_iter()
                .skip(start)
                .take(state.page_size as usize)
                .collect();
            AssembledPage {
                records,
                total,
                page,
                last_page,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SortKey;
    use crate::core::query::state::FilterState;

    fn record(id: &str, kind: &str, unit: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            id: id.to_string(),
            slug: id.to_string(),
            title: format!("Title {}", id),
            record_type: Some(kind.to_string()),
            unit: unit.map(str::to_string),
            published_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            ..Default::default()
        }
    }

    fn state_with_filters(entries: &[(&str, &[&str])]) -> QueryState {
        let mut filters = FilterState::new();
        for (key, values) in entries {
            filters.insert(*key, values.iter().map(|v| v.to_string()).collect());
        }
        let mut state = QueryState::for_tab(Tab::Guides, 12);
        state.filters = filters;
        state
    }

    fn superset(records: Vec<CatalogRecord>) -> FetchOutcome {
        let total = records.len();
        FetchOutcome {
            records,
            approx_total: total,
        }
    }

    #[test]
    fn test_plan_without_filters_is_server_page() {
        let state = QueryState::for_tab(Tab::Guides, 12);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        assert_eq!(plan.mode, PaginationMode::ServerPage);
        assert_eq!(plan.status, Some(RecordStatus::Approved));
    }

    #[test]
    fn test_plan_with_facet_filter_is_client_superset() {
        let state = state_with_filters(&[("unit", &["deals"])]);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        assert_eq!(plan.mode, PaginationMode::ClientSuperset);
    }

    #[test]
    fn test_single_status_filter_stays_pushable() {
        let state = state_with_filters(&[("status", &["draft"])]);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        assert_eq!(plan.mode, PaginationMode::ServerPage);
        assert_eq!(plan.status, Some(RecordStatus::Draft));
    }

    #[test]
    fn test_multi_status_goes_client_side() {
        let state = state_with_filters(&[("status", &["draft", "approved"])]);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        assert_eq!(plan.mode, PaginationMode::ClientSuperset);
        assert_eq!(plan.status, None);
    }

    #[test]
    fn test_pipeline_filters_and_excludes_missing_fields() {
        let state = state_with_filters(&[("unit", &["deals"])]);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        let outcome = superset(vec![
            record("a", "guide", Some("Deals")),
            record("b", "guide", Some("Finance")),
            record("c", "guide", None),       // missing unit: excluded
            record("d", "strategy", Some("Deals")), // wrong tab: excluded
        ]);
        let page = assemble(outcome, &plan, &state);
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].id, "a");
    }

    #[test]
    fn test_unrecognized_filter_key_is_ignored() {
        // strategy_framework only applies on the strategies tab
        let state = state_with_filters(&[("strategy_framework", &["ghc"])]);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        let outcome = superset(vec![record("a", "guide", Some("Deals"))]);
        let page = assemble(outcome, &plan, &state);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_shrunk_result_resets_to_page_one() {
        let mut state = state_with_filters(&[("unit", &["deals"])]);
        state.page = 4;
        state.page_size = 2;
        let plan = plan_fetch(&state, &CatalogConfig::default());
        let outcome = superset(vec![
            record("a", "guide", Some("Deals")),
            record("b", "guide", Some("Deals")),
            record("c", "guide", Some("Deals")),
        ]);
        let page = assemble(outcome, &plan, &state);
        assert_eq!(page.last_page, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.records.len(), 2);
    }

    #[test]
    fn test_image_backfill() {
        let state = state_with_filters(&[("unit", &["deals"])]);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        let mut with_image = record("a", "guide", Some("Deals"));
        with_image.image = Some("/custom.png".to_string());
        let outcome = superset(vec![with_image, record("b", "guide", Some("Deals"))]);
        let page = assemble(outcome, &plan, &state);
        assert_eq!(page.records[0].image.as_deref(), Some("/custom.png"));
        assert_eq!(
            page.records[1].image.as_deref(),
            Some("/assets/defaults/guide.svg")
        );
    }

    #[test]
    fn test_client_sort_orders_page() {
        let mut state = state_with_filters(&[("unit", &["deals"])]);
        state.sort = SortKey::Title;
        let plan = plan_fetch(&state, &CatalogConfig::default());
        let mut z = record("z", "guide", Some("Deals"));
        z.title = "Zebra".to_string();
        let mut a = record("a", "guide", Some("Deals"));
        a.title = "Aardvark".to_string();
        let page = assemble(superset(vec![z, a]), &plan, &state);
        assert_eq!(page.records[0].title, "Aardvark");
    }

    #[test]
    fn test_server_page_uses_store_total() {
        let state = QueryState::for_tab(Tab::Guides, 12);
        let plan = plan_fetch(&state, &CatalogConfig::default());
        let outcome = FetchOutcome {
            records: vec![record("a", "guide", None)],
            approx_total: 40,
        };
        let page = assemble(outcome, &plan, &state);
        assert_eq!(page.total, 40);
        assert_eq!(page.last_page, 4);
        assert_eq!(page.records.len(), 1);
    }
}
