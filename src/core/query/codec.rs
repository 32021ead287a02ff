//! Query Codec
//!
//! Pure translation between the persisted textual representation
//! (URL-encoded key/value pairs) and `QueryState`. Defaults and empty
//! values are omitted from the encoded form; out-of-range numerics and
//! unknown tab tokens are corrected silently. Tab compatibility is NOT
//! validated here - that is the resolver's job.

use url::form_urlencoded;

use crate::config::CatalogConfig;
use crate::core::model::SortKey;
use crate::core::query::state::{FilterState, QueryState};
use crate::core::tabs::{self, Tab};

/// Reserved query keys; everything else decodes as a filter key.
const KEY_TAB: &str = "tab";
const KEY_SEARCH: &str = "q";
const KEY_PAGE: &str = "page";
const KEY_PAGE_SIZE: &str = "pageSize";
const KEY_SORT: &str = "sort";
const KEY_COLLAPSED: &str = "collapsed";

fn is_reserved(key: &str) -> bool {
    matches!(
        key,
        KEY_TAB | KEY_SEARCH | KEY_PAGE | KEY_PAGE_SIZE | KEY_SORT | KEY_COLLAPSED
    )
}

fn default_tab(config: &CatalogConfig) -> Tab {
    Tab::from_token(&config.default_tab).unwrap_or(Tab::Guides)
}

/// Decode the persisted representation into a query state.
///
/// Unknown tab tokens fall back to the configured default tab; `page`
/// below 1 corrects to 1; `pageSize` is clamped to the configured
/// maximum. Multi-valued filters are comma-delimited under one key;
/// keys registered with no tab are dropped outright.
pub fn decode(raw: &str, config: &CatalogConfig) -> QueryState {
    let raw = raw.trim_start_matches('?');
    let pairs: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let lookup = |key: &str| -> Option<&str> {
        pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let tab = lookup(KEY_TAB)
        .and_then(Tab::from_token)
        .unwrap_or_else(|| default_tab(config));

    let page = lookup(KEY_PAGE)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);

    let page_size = lookup(KEY_PAGE_SIZE)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(config.default_page_size)
        .clamp(1, config.max_page_size);

    let sort = lookup(KEY_SORT)
        .and_then(SortKey::from_token)
        .unwrap_or(tab.spec().default_sort);

    let search = lookup(KEY_SEARCH).unwrap_or("").to_string();

    let collapsed: Vec<String> = lookup(KEY_COLLAPSED)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut filters = FilterState::new();
    for (key, value) in &pairs {
        if is_reserved(key) {
            continue;
        }
        if !tabs::is_registered_key(key) {
            log::debug!("Dropping unregistered filter key '{}'", key);
            continue;
        }
        let values: Vec<String> = value.split(',').map(str::to_string).collect();
        filters.insert(key.clone(), values);
    }

    QueryState {
        tab,
        search,
        page,
        page_size,
        sort,
        filters,
        collapsed,
    }
}

/// Encode a query state back to the persisted representation.
///
/// Keys with default or empty values are dropped, not stored as empty
/// strings, so `encode(decode(x))` is idempotent for well-formed `x`.
pub fn encode(state: &QueryState, config: &CatalogConfig) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if state.tab != default_tab(config) {
        serializer.append_pair(KEY_TAB, state.tab.token());
    }
    if !state.search.is_empty() {
        serializer.append_pair(KEY_SEARCH, &state.search);
    }
    for (key, values) in state.filters.iter() {
        serializer.append_pair(key, &values.join(","));
    }
    if state.sort != state.tab.spec().default_sort {
        serializer.append_pair(KEY_SORT, state.sort.token());
    }
    if state.page > 1 {
        serializer.append_pair(KEY_PAGE, &state.page.to_string());
    }
    if state.page_size != config.default_page_size {
        serializer.append_pair(KEY_PAGE_SIZE, &state.page_size.to_string());
    }
    if !state.collapsed.is_empty() {
        serializer.append_pair(KEY_COLLAPSED, &state.collapsed.join(","));
    }

    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> CatalogConfig {
        CatalogConfig::default()
    }

    #[test]
    fn test_decode_defaults_on_empty_input() {
        let state = decode("", &config());
        assert_eq!(state.tab, Tab::Guides);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 12);
        assert_eq!(state.sort, SortKey::Featured);
        assert!(state.filters.is_empty());
        assert!(state.search.is_empty());
    }

    #[test]
    fn test_decode_multi_valued_filter() {
        let state = decode("tab=primary-content&unit=deals,finance", &config());
        assert_eq!(
            state.filters.get("unit"),
            Some(&["deals".to_string(), "finance".to_string()][..])
        );
    }

    #[test]
    fn test_decode_corrects_invalid_values() {
        let state = decode("tab=bogus&page=0&pageSize=9999&sort=nope", &config());
        assert_eq!(state.tab, Tab::Guides);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 200);
        assert_eq!(state.sort, SortKey::Featured);
    }

    #[test]
    fn test_encode_omits_defaults() {
        let state = QueryState::for_tab(Tab::Guides, 12);
        assert_eq!(encode(&state, &config()), "");

        let mut state = QueryState::for_tab(Tab::Glossary, 12);
        state.page = 3;
        let encoded = encode(&state, &config());
        assert_eq!(encoded, "tab=glossary&page=3");
    }

    #[test]
    fn test_unregistered_filter_keys_are_dropped() {
        // a typo'd key must not survive decoding, where it would force
        // client-side pagination forever without ever matching anything
        let state = decode("uniit=deals&unit=deals", &config());
        assert!(state.filters.get("uniit").is_none());
        assert_eq!(state.filters.get("unit"), Some(&["deals".to_string()][..]));
        assert_eq!(encode(&state, &config()), "unit=deals");
    }

    #[test]
    fn test_empty_filter_values_are_dropped() {
        let state = decode("unit=,,&domain=finance", &config());
        assert!(state.filters.get("unit").is_none());
        assert_eq!(
            state.filters.get("domain"),
            Some(&["finance".to_string()][..])
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let raw = "tab=testimonial-content&q=audit&testimonial_category=case-study&sort=popular&page=2&pageSize=24&collapsed=intro,sidebar";
        let once = decode(raw, &config());
        let encoded = encode(&once, &config());
        let twice = decode(&encoded, &config());
        assert_eq!(once, twice);
        assert_eq!(encode(&twice, &config()), encoded);
    }

    #[test]
    fn test_sort_default_is_per_tab() {
        // glossary defaults to title sort; encoding drops it
        let state = decode("tab=glossary", &config());
        assert_eq!(state.sort, SortKey::Title);
        assert_eq!(encode(&state, &config()), "tab=glossary");
        // explicit non-default sort survives
        let state = decode("tab=glossary&sort=recent", &config());
        assert_eq!(state.sort, SortKey::Recent);
        assert!(encode(&state, &config()).contains("sort=recent"));
    }

    // --------------------------------------------------------------------
    // Property: decode(encode(s)) == s for any well-formed state
    // --------------------------------------------------------------------

    fn option_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,8}".prop_map(|s| s)
    }

    fn filter_state() -> impl Strategy<Value = FilterState> {
        let key = prop::sample::select(vec![
            "domain",
            "content_type",
            "unit",
            "location",
            "strategy_framework",
        ]);
        prop::collection::vec((key, prop::collection::vec(option_id(), 1..4)), 0..4).prop_map(
            |entries| {
                let mut filters = FilterState::new();
                for (key, values) in entries {
                    filters.insert(key, values);
                }
                filters
            },
        )
    }

    fn query_state() -> impl Strategy<Value = QueryState> {
        (
            prop::sample::select(Tab::all().to_vec()),
            "[a-z ]{0,12}",
            1u32..50,
            prop::sample::select(vec![
                SortKey::Featured,
                SortKey::Recent,
                SortKey::Popular,
                SortKey::Title,
            ]),
            filter_state(),
            prop::collection::vec("[a-z]{1,6}", 0..3),
        )
            .prop_map(|(tab, search, page, sort, filters, collapsed)| QueryState {
                tab,
                search: search.trim().to_string(),
                page,
                page_size: 12,
                sort,
                filters,
                collapsed,
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip(state in query_state()) {
            let config = config();
            let encoded = encode(&state, &config);
            let decoded = decode(&encoded, &config);
            prop_assert_eq!(decoded, state);
        }
    }
}
