//! Filter Normalizer
//!
//! Canonicalises raw field values and user-facing filter option ids into
//! comparable tokens, with an override table for known irregular
//! mappings. All filter matching in the engine funnels through here.

use crate::core::model::CatalogRecord;

/// Irregular mappings: a filter option also matches raw values whose
/// token contains one of the listed alias tokens. Additions here are
/// data, not new code paths.
const OVERRIDES: &[(&str, &[&str])] = &[
    ("resources", &["guideline"]),
    ("case-study", &["casestudies"]),
    ("faq", &["frequentlyaskedquestion"]),
];

/// Lossy canonical token: lowercase, alphanumeric only. Whitespace,
/// hyphens, underscores and punctuation all collapse away, so
/// "Case Study", "case-study" and "case_study" compare equal.
pub fn comparable_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Whether a filter option id matches a raw field value.
///
/// Symmetric and case-insensitive via the token form on both sides. An
/// empty raw value never matches: records with no value for a filtered
/// field stay excluded once that filter is active.
pub fn matches(option_id: &str, raw: &str) -> bool {
    let raw_token = comparable_token(raw);
    if raw_token.is_empty() {
        return false;
    }
    let option_token = comparable_token(option_id);
    if option_token.is_empty() {
        return false;
    }
    if raw_token == option_token {
        return true;
    }
    for (option, aliases) in OVERRIDES {
        if comparable_token(option) == option_token {
            if aliases
                .iter()
                .any(|alias| raw_token.contains(&comparable_token(alias)))
            {
                return true;
            }
        }
    }
    false
}

/// Whether a record satisfies one filter entry (any selected option
/// matches the addressed field). A record lacking the field is excluded —
/// deliberate policy, preserved from the original behavior.
pub fn record_matches_filter(record: &CatalogRecord, key: &str, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    match record.filter_field(key) {
        Some(raw) => selected.iter().any(|option| matches(option, raw)),
        None => false,
    }
}
