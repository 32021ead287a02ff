//! Catalog Record Models
//!
//! Data structures for catalog records, facets and page results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Record Status
// ============================================================================

/// Editorial status of a record. Absent status means approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Approved,
    Draft,
    Archived,
}

impl RecordStatus {
    pub fn token(&self) -> &'static str {
        match self {
            RecordStatus::Approved => "approved",
            RecordStatus::Draft => "draft",
            RecordStatus::Archived => "archived",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "approved" => Some(RecordStatus::Approved),
            "draft" => Some(RecordStatus::Draft),
            "archived" => Some(RecordStatus::Archived),
            _ => None,
        }
    }
}

// ============================================================================
// Sort Keys
// ============================================================================

/// Available sort orders.
///
/// Every key chains the same tie-break: editorial pick descending, then
/// published timestamp descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Editorial picks first (the relevance default).
    #[default]
    Featured,
    /// Newest first.
    Recent,
    /// Most viewed first.
    Popular,
    /// Alphabetical by title.
    Title,
}

impl SortKey {
    pub fn token(&self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::Recent => "recent",
            SortKey::Popular => "popular",
            SortKey::Title => "title",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "featured" => Some(SortKey::Featured),
            "recent" => Some(SortKey::Recent),
            "popular" => Some(SortKey::Popular),
            "title" => Some(SortKey::Title),
            _ => None,
        }
    }
}

// ============================================================================
// Catalog Record
// ============================================================================

/// A normalized projection of one content item, source-agnostic.
///
/// Classification fields are raw labels as found in the underlying
/// source; comparisons always go through the filter normalizer, never
/// through string equality on these fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogRecord {
    /// Unique record ID
    pub id: String,
    /// URL-safe slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Short summary
    #[serde(default)]
    pub summary: String,

    /// Knowledge domain (e.g. "Finance", "Engineering")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Sub-classification within the domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Record type - the tab-defining classification (guide, strategy,
    /// testimonial, offering, term, faq)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// Owning unit/team
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Geographic location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Editorial status; absent means approved
    #[serde(default)]
    pub status: RecordStatus,

    /// Publication timestamp (recency sort key)
    pub published_at: DateTime<Utc>,
    /// View counter (popularity sort key)
    #[serde(default)]
    pub views: u64,
    /// Editorial-pick flag (sort tie-break)
    #[serde(default)]
    pub featured: bool,
    /// Display image; backfilled with a tab default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    // Tab-specific extension fields
    /// Strategy framework label (strategies tab only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_framework: Option<String>,
    /// Testimonial classification (testimonials tab only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial_category: Option<String>,
    /// Offering lifecycle stage (offerings tab only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offering_stage: Option<String>,
    /// Offering type (offerings tab only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offering_type: Option<String>,
}

impl CatalogRecord {
    /// Raw field value addressed by a filter key, if the record carries
    /// one. The single place where filter keys map onto record fields.
    pub fn filter_field(&self, key: &str) -> Option<&str> {
        match key {
            "domain" => self.domain.as_deref(),
            "topic" => self.topic.as_deref(),
            "content_type" => self.record_type.as_deref(),
            "unit" => self.unit.as_deref(),
            "location" => self.location.as_deref(),
            "status" => Some(self.status.token()),
            "strategy_framework" => self.strategy_framework.as_deref(),
            "testimonial_category" => self.testimonial_category.as_deref(),
            "offering_stage" => self.offering_stage.as_deref(),
            "offering_type" => self.offering_type.as_deref(),
            _ => None,
        }
    }

    /// Case-insensitive containment match against title and summary.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.summary.to_lowercase().contains(&needle)
    }
}

/// Sort a record set in place.
///
/// Every key chains the same tie-break: editorial pick descending, then
/// published timestamp descending. Shared by the result assembler and the
/// in-memory store so both sides paginate identically.
pub fn sort_records(records: &mut [CatalogRecord], key: SortKey) {
    let tie = |a: &CatalogRecord, b: &CatalogRecord| {
        b.featured
            .cmp(&a.featured)
            .then(b.published_at.cmp(&a.published_at))
    };
    match key {
        SortKey::Featured => records.sort_by(tie),
        SortKey::Recent => {
            records.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(tie(a, b)))
        }
        SortKey::Popular => records.sort_by(|a, b| b.views.cmp(&a.views).then(tie(a, b))),
        SortKey::Title => records.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then(tie(a, b))
        }),
    }
}

// ============================================================================
// Facets
// ============================================================================

/// One selectable option within a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    /// Stable option identifier (normalization token)
    pub id: String,
    /// First-seen raw label, casing preserved
    pub label: String,
    /// Matching record count
    pub count: usize,
}

/// A filter key bound to its currently available options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub key: String,
    pub options: Vec<FacetOption>,
}

// ============================================================================
// Page Result
// ============================================================================

/// The final output of one fetch-and-assemble cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// Ordered slice of records for the current page
    pub records: Vec<CatalogRecord>,
    /// Post-filter, pre-pagination count
    pub total: usize,
    /// Current page (always within `[1, last_page]`)
    pub page: u32,
    /// Last valid page for the current total (at least 1)
    pub last_page: u32,
    /// Facets recomputed for the current candidate set
    pub facets: Vec<Facet>,
}

impl PageResult {
    pub fn last_page_for(total: usize, page_size: u32) -> u32 {
        let size = page_size.max(1) as usize;
        (total.div_ceil(size)).max(1) as u32
    }
}
