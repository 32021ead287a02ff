//! Persisted Query State
//!
//! The persisted textual query representation is the single source of
//! truth for the whole engine: `state` holds the value objects, `codec`
//! translates to and from the textual form, `store` is the one
//! state-holder every mutation routes through.

pub mod codec;
pub mod state;
pub mod store;

pub use codec::{decode, encode};
pub use state::{FilterState, QueryState};
pub use store::QueryStateStore;
