/// Knowledge Catalog - Faceted Content Browsing Engine
///
/// Core library providing query-state synchronization, tab/filter
/// compatibility resolution, filter normalization, facet aggregation and
/// hybrid pagination over heterogeneous content sources.

pub mod config;
pub mod core;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
