//! Bitmap facet index.
//!
//! Every facet value maps to the set of catalog positions carrying it. A
//! filter state then evaluates as set algebra:
//!
//! ```text
//!   candidates = universe
//!   per facet:  candidates ∩= ⋃ included      (⋂ for categories in All mode)
//!               candidates −=  ⋃ excluded
//!   name query: scan the surviving candidates
//! ```
//!
//! Positions, not ids, are stored so results come back in catalog order and
//! map to records without a lookup.

use std::collections::HashMap;

use dexcat_model::{
    Catalog, Category, CategoryCount, Color, EntityRecord, EvolutionDepth, Generation, Locale,
    SpecialFlag,
};
use roaring::RoaringBitmap;

use crate::facet::{FacetSelector, FacetValue};
use crate::state::{FilterState, MatchMode};

/// Postings for one facet.
type Postings<V> = HashMap<V, RoaringBitmap>;

#[derive(Debug, Clone, Default)]
pub struct FacetIndex {
    universe: RoaringBitmap,
    by_generation: Postings<Generation>,
    by_category: Postings<Category>,
    by_category_count: Postings<CategoryCount>,
    by_evolution_depth: Postings<EvolutionDepth>,
    by_flag: Postings<SpecialFlag>,
    by_color: Postings<Color>,
}

fn post<V: FacetValue>(postings: &mut Postings<V>, value: V, position: u32) {
    postings
        .entry(value)
        .or_insert_with(RoaringBitmap::new)
        .insert(position);
}

impl FacetIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::default();
        for (position, record) in catalog.iter().enumerate() {
            let position = position as u32;
            index.universe.insert(position);
            post(&mut index.by_generation, record.generation, position);
            for &category in &record.categories {
                post(&mut index.by_category, category, position);
            }
            post(&mut index.by_category_count, record.category_count(), position);
            post(&mut index.by_evolution_depth, record.evolution_depth, position);
            for &flag in &record.flags {
                post(&mut index.by_flag, flag, position);
            }
            if let Some(color) = record.color {
                post(&mut index.by_color, color, position);
            }
        }
        tracing::debug!(
            records = index.universe.len(),
            categories = index.by_category.len(),
            colors = index.by_color.len(),
            "facet index built"
        );
        index
    }

    /// Number of indexed records.
    pub fn len(&self) -> u64 {
        self.universe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.universe.is_empty()
    }

    /// Positions passing every facet of `state`. The name query is not
    /// consulted.
    pub fn facet_candidates(&self, state: &FilterState) -> RoaringBitmap {
        let mut candidates = self.universe.clone();
        narrow(&mut candidates, &state.generation, &self.by_generation, false);
        narrow(
            &mut candidates,
            &state.category,
            &self.by_category,
            state.category_mode == MatchMode::All,
        );
        narrow(&mut candidates, &state.category_count, &self.by_category_count, false);
        narrow(&mut candidates, &state.evolution_depth, &self.by_evolution_depth, false);
        narrow(&mut candidates, &state.special_flag, &self.by_flag, false);
        narrow(&mut candidates, &state.color, &self.by_color, false);
        candidates
    }

    /// How many records carry `category`.
    pub fn category_frequency(&self, category: Category) -> u64 {
        self.by_category.get(&category).map_or(0, RoaringBitmap::len)
    }
}

fn narrow<V: FacetValue>(
    candidates: &mut RoaringBitmap,
    selector: &FacetSelector<V>,
    postings: &Postings<V>,
    require_all: bool,
) {
    if selector.has_included() {
        if require_all {
            for value in selector.included() {
                match postings.get(&value) {
                    Some(bits) => *candidates &= bits,
                    None => candidates.clear(),
                }
            }
        } else {
            let mut any = RoaringBitmap::new();
            for value in selector.included() {
                if let Some(bits) = postings.get(&value) {
                    any |= bits;
                }
            }
            *candidates &= &any;
        }
    }
    for value in selector.excluded() {
        if let Some(bits) = postings.get(&value) {
            *candidates -= bits;
        }
    }
}

/// A frozen catalog paired with its facet index.
///
/// Produces exactly what [`crate::engine::apply`] produces for the same
/// inputs; the index only changes how the answer is computed.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    catalog: Catalog,
    index: FacetIndex,
}

impl FilterEngine {
    pub fn new(catalog: Catalog) -> Self {
        let index = FacetIndex::build(&catalog);
        Self { catalog, index }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &FacetIndex {
        &self.index
    }

    pub fn apply(&self, state: &FilterState, locale: &Locale) -> Vec<&EntityRecord> {
        let records = self.catalog.records();
        self.index
            .facet_candidates(state)
            .iter()
            .map(|position| &records[position as usize])
            .filter(|record| state.matches_name(record, locale))
            .collect()
    }

    pub fn count(&self, state: &FilterState, locale: &Locale) -> usize {
        if state.name_query.trim().is_empty() {
            return self.index.facet_candidates(state).len() as usize;
        }
        self.apply(state, locale).len()
    }
}
