//! The declarative filter state and the per-record predicate it defines.

use dexcat_model::{
    Category, CategoryCount, Color, EntityRecord, EvolutionDepth, Generation, Locale, SpecialFlag,
};
use serde::{Deserialize, Serialize};

use crate::facet::FacetSelector;

/// How the category facet's inclusion test combines included values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// At least one included category (OR).
    #[default]
    Any,
    /// Every included category (AND).
    All,
}

/// One selector per facet plus a free-text name query.
///
/// The default value ignores every facet and matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub name_query: String,
    pub generation: FacetSelector<Generation>,
    pub category: FacetSelector<Category>,
    pub category_mode: MatchMode,
    pub category_count: FacetSelector<CategoryCount>,
    pub evolution_depth: FacetSelector<EvolutionDepth>,
    pub special_flag: FacetSelector<SpecialFlag>,
    pub color: FacetSelector<Color>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to all-ignoring: every selector cleared, empty name query,
    /// category mode `Any`. Selection modes are left as they are.
    pub fn reset(&mut self) {
        self.name_query.clear();
        self.generation.clear();
        self.category.clear();
        self.category_mode = MatchMode::Any;
        self.category_count.clear();
        self.evolution_depth.clear();
        self.special_flag.clear();
        self.color.clear();
    }

    /// No facet constrains and the name query is blank.
    pub fn is_unconstrained(&self) -> bool {
        self.name_query.trim().is_empty()
            && self.generation.is_ignored()
            && self.category.is_ignored()
            && self.category_count.is_ignored()
            && self.evolution_depth.is_ignored()
            && self.special_flag.is_ignored()
            && self.color.is_ignored()
    }

    /// Whether `record` is displayed under this state. Facets are conjunctive;
    /// within a facet, include and exclude are both applied.
    pub fn matches(&self, record: &EntityRecord, locale: &Locale) -> bool {
        self.matches_name(record, locale) && self.matches_facets(record)
    }

    pub fn matches_name(&self, record: &EntityRecord, locale: &Locale) -> bool {
        record.matches_name(&self.name_query, locale)
    }

    /// Every facet test, name query excluded.
    pub fn matches_facets(&self, record: &EntityRecord) -> bool {
        let require_all = self.category_mode == MatchMode::All;

        self.generation.passes_inclusion(false, |g| record.generation == g)
            && self.generation.passes_exclusion(|g| record.generation == g)
            && self.category.passes_inclusion(require_all, |c| record.has_category(c))
            && self.category.passes_exclusion(|c| record.has_category(c))
            && self.category_count.passes_inclusion(false, |n| record.category_count() == n)
            && self.category_count.passes_exclusion(|n| record.category_count() == n)
            && self.evolution_depth.passes_inclusion(false, |d| record.evolution_depth == d)
            && self.evolution_depth.passes_exclusion(|d| record.evolution_depth == d)
            && self.special_flag.passes_inclusion(false, |f| record.has_flag(f))
            && self.special_flag.passes_exclusion(|f| record.has_flag(f))
            && self.color.passes_inclusion(false, |c| record.color == Some(c))
            && self.color.passes_exclusion(|c| record.color == Some(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charmander() -> EntityRecord {
        EntityRecord::new(4, "charmander", vec![Category::Fire])
            .unwrap()
            .with_color(Some(Color::Red))
    }

    #[test]
    fn default_state_matches_everything() {
        let state = FilterState::new();
        assert!(state.is_unconstrained());
        assert!(state.matches(&charmander(), &Locale::default()));
    }

    #[test]
    fn category_all_mode_requires_every_included_category() {
        let mut state = FilterState::new();
        state.category.include(Category::Fire);
        state.category.include(Category::Flying);

        assert!(state.matches_facets(&charmander()));
        state.category_mode = MatchMode::All;
        assert!(!state.matches_facets(&charmander()));
    }

    #[test]
    fn exclusion_ignores_category_mode() {
        let mut state = FilterState::new();
        state.category_mode = MatchMode::All;
        state.category.exclude(Category::Fire);
        state.category.exclude(Category::Water);
        assert!(!state.matches_facets(&charmander()));
    }

    #[test]
    fn records_without_color_fail_color_inclusion_but_pass_exclusion() {
        let colorless = EntityRecord::new(9, "x", vec![Category::Water]).unwrap();
        let mut state = FilterState::new();
        state.color.exclude(Color::Blue);
        assert!(state.matches_facets(&colorless));
        state.color.include(Color::Red);
        assert!(!state.matches_facets(&colorless));
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = FilterState::new();
        state.name_query = "char".into();
        state.generation.include(Generation::new(1).unwrap());
        state.special_flag.exclude(SpecialFlag::Legendary);
        state.category_mode = MatchMode::All;
        state.reset();
        assert!(state.is_unconstrained());
        assert_eq!(state, FilterState::new());
    }
}
