//! Reference evaluation: walk the catalog once and keep what the predicate
//! accepts.

use dexcat_model::{Catalog, EntityRecord, Locale};

use crate::state::FilterState;

/// Records of `catalog` that `state` displays, in catalog (id) order.
///
/// Pure: the same catalog, state and locale always produce the same list.
pub fn apply<'a>(catalog: &'a Catalog, state: &FilterState, locale: &Locale) -> Vec<&'a EntityRecord> {
    if state.is_unconstrained() {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|record| state.matches(record, locale))
        .collect()
}

/// Number of records `state` displays, without collecting them.
pub fn count(catalog: &Catalog, state: &FilterState, locale: &Locale) -> usize {
    catalog
        .iter()
        .filter(|record| state.matches(record, locale))
        .count()
}
