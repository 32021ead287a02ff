pub mod error;
pub mod model;
pub mod normalize;
pub mod tabs;

// Persisted query state: codec + single state-holder
pub mod query;

// Facet aggregation (self-excluding counts)
pub mod facets;

// Content sources: queryable-store and static-collection adapters
pub mod source;

// Hybrid pagination planning + result assembly
pub mod assemble;

// Fetch-and-assemble cycle runner (last cycle wins)
pub mod engine;
