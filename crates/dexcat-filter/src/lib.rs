//! Dexcat filtering
//!
//! A [`FilterState`] holds one tri-state [`FacetSelector`] per facet plus a
//! name query. Two evaluators share its semantics:
//!
//! - [`engine::apply`] checks the predicate record by record.
//! - [`FilterEngine`] answers from a roaring-bitmap [`FacetIndex`] built once
//!   over the frozen catalog.
//!
//! Both are total. Unknown selector values cannot be constructed, and an
//! included value nothing carries simply yields an empty result.

pub mod engine;
pub mod facet;
pub mod index;
pub mod state;

pub use engine::{apply, count};
pub use facet::{FacetSelector, FacetValue, Polarity, SelectionMode, TriState};
pub use index::{FacetIndex, FilterEngine};
pub use state::{FilterState, MatchMode};
