//! Facet Aggregator
//!
//! Computes, per filterable field, the options present in the tab-scoped
//! candidate set with counts. Each facet is counted over records filtered
//! by every facet EXCEPT itself, so selecting an option never removes its
//! siblings from view.

use indexmap::IndexMap;

use crate::core::model::{CatalogRecord, Facet, FacetOption};
use crate::core::normalize::{self, record_matches_filter};
use crate::core::query::state::FilterState;

/// Compute facets over a tab-scoped candidate set.
///
/// `records` must already be tab-classified and search-matched but NOT
/// facet-filtered; the self-exclusion rule applies the other facets'
/// active filters here. Options are deduplicated by normalization token,
/// labelled with the first-seen raw value, sorted alphabetically; options
/// with no matching records are omitted by construction.
pub fn compute_facets(
    records: &[CatalogRecord],
    active: &FilterState,
    facet_keys: &[&str],
) -> Vec<Facet> {
    facet_keys
        .iter()
        .map(|key| Facet {
            key: key.to_string(),
            options: compute_options(records, active, key),
        })
        .collect()
}

fn compute_options(records: &[CatalogRecord], active: &FilterState, key: &str) -> Vec<FacetOption> {
    // token -> (first-seen label, count)
    let mut buckets: IndexMap<String, (String, usize)> = IndexMap::new();

    for record in records {
        let passes_other_facets = active
            .iter()
            .filter(|(k, _)| *k != key)
            .all(|(k, selected)| record_matches_filter(record, k, selected));
        if !passes_other_facets {
            continue;
        }
        let Some(raw) = record.filter_field(key) else {
            continue;
        };
        let token = normalize::comparable_token(raw);
        if token.is_empty() {
            continue;
        }
        let entry = buckets.entry(token).or_insert((raw.to_string(), 0));
        entry.1 += 1;
    }

    let mut options: Vec<FacetOption> = buckets
        .into_iter()
        .map(|(id, (label, count))| FacetOption { id, label, count })
        .collect();
    options.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));
    options
}
