//! Static-Collection Adapter
//!
//! Source adapter for tabs whose records are not part of the shared
//! store: productized offerings, glossary terms and FAQ entries live as
//! fixed in-memory collections, already shaped as `CatalogRecord`, and
//! fulfil the same fetch contract entirely in memory.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::core::error::Result;
use crate::core::model::{self, CatalogRecord, RecordStatus};
use crate::core::source::{FetchOutcome, FetchPlan, PaginationMode, SourceAdapter};

/// Adapter over one or more fixed record collections.
#[derive(Debug, Clone, Default)]
pub struct StaticAdapter {
    records: Vec<CatalogRecord>,
}

impl StaticAdapter {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Adapter preloaded with the builtin static collections.
    pub fn builtin() -> Self {
        Self::new(builtin_records())
    }

    fn candidates(&self, plan: &FetchPlan) -> Vec<CatalogRecord> {
        let mut matched: Vec<CatalogRecord> = self
            .records
            .iter()
            .filter(|r| plan.tab.classifies(r))
            .filter(|r| match plan.status {
                Some(status) => r.status == status,
                None => true,
            })
            .filter(|r| r.matches_search(&plan.search))
            .cloned()
            .collect();
        model::sort_records(&mut matched, plan.sort);
        matched
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    async fn fetch(&self, plan: &FetchPlan) -> Result<FetchOutcome> {
        let matched = self.candidates(plan);
        let total = matched.len();
        let records: Vec<CatalogRecord> = match plan.mode {
            PaginationMode::ServerPage => matched
                .into_iter()
                .skip((plan.page.saturating_sub(1) as usize) * plan.page_size as usize)
                .take(plan.page_size as usize)
                .collect(),
            PaginationMode::ClientSuperset => {
                matched.into_iter().take(plan.superset_cap).collect()
            }
        };
        Ok(FetchOutcome {
            records,
            approx_total: total,
        })
    }

    async fn facet_projection(&self, plan: &FetchPlan) -> Result<Vec<CatalogRecord>> {
        Ok(self
            .candidates(plan)
            .into_iter()
            .take(plan.superset_cap)
            .collect())
    }
}

// ============================================================================
// Builtin Collections
// ============================================================================

fn day(year: i32, month: u32, dom: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, dom, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn entry(
    id: &str,
    kind: &str,
    title: &str,
    summary: &str,
    published: DateTime<Utc>,
) -> CatalogRecord {
    CatalogRecord {
        id: id.to_string(),
        slug: id.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        record_type: Some(kind.to_string()),
        status: RecordStatus::Approved,
        published_at: published,
        ..Default::default()
    }
}

/// The builtin static collections (offerings, glossary, FAQ).
pub fn builtin_records() -> Vec<CatalogRecord> {
    let mut records = Vec::new();

    // Productized offerings
    let mut diligence = entry(
        "offering-deal-diligence",
        "offering",
        "Deal Diligence Accelerator",
        "Packaged due-diligence workflow for acquisition teams",
        day(2024, 2, 12),
    );
    diligence.unit = Some("Deals".to_string());
    diligence.offering_stage = Some("Live".to_string());
    diligence.offering_type = Some("Managed Service".to_string());
    diligence.featured = true;
    records.push(diligence);

    let mut close = entry(
        "offering-close-copilot",
        "offering",
        "Close Copilot",
        "Automated close checklist and reconciliation for finance units",
        day(2024, 4, 3),
    );
    close.unit = Some("Finance".to_string());
    close.offering_stage = Some("Pilot".to_string());
    close.offering_type = Some("Software".to_string());
    records.push(close);

    let mut onboard = entry(
        "offering-vendor-onboarding",
        "offering",
        "Vendor Onboarding Kit",
        "Template pack for standardised vendor onboarding",
        day(2023, 11, 20),
    );
    onboard.unit = Some("Procurement".to_string());
    onboard.offering_stage = Some("Live".to_string());
    onboard.offering_type = Some("Toolkit".to_string());
    records.push(onboard);

    // Glossary terms
    let mut ghc = entry(
        "term-ghc",
        "term",
        "GHC",
        "Growth horizon canvas: the strategy framework behind horizon planning",
        day(2024, 1, 8),
    );
    ghc.domain = Some("Strategy".to_string());
    records.push(ghc);

    let mut runway = entry(
        "term-runway",
        "term",
        "Runway",
        "Months of operation funded at the current burn rate",
        day(2024, 1, 8),
    );
    runway.domain = Some("Finance".to_string());
    records.push(runway);

    let mut facet = entry(
        "term-facet",
        "term",
        "Facet",
        "A filterable field with its available options and counts",
        day(2024, 1, 8),
    );
    facet.domain = Some("Catalog".to_string());
    records.push(facet);

    // FAQ entries
    let mut contribute = entry(
        "faq-contribute",
        "faq",
        "How do I contribute a guide?",
        "Submissions go through the editorial queue of the owning unit",
        day(2024, 3, 15),
    );
    contribute.domain = Some("Editorial".to_string());
    records.push(contribute);

    let mut access = entry(
        "faq-access",
        "faq",
        "Who can see draft content?",
        "Draft records are visible to editors only until approved",
        day(2024, 3, 15),
    );
    access.domain = Some("Editorial".to_string());
    records.push(access);

    records
}
