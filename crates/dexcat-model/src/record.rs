//! Enriched entity records and the lineage index they are derived with.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Category, CategoryCount, Color, EvolutionDepth, Generation, Locale, ModelError, SpecialFlag};

/// Primary key of a catalog record. Always positive.
pub type EntityId = u32;

// ============================================================================
// Lineage index
// ============================================================================

/// `species key -> generation`.
///
/// Built once during ingestion. Lookups never fail: a species the index does
/// not know about belongs to [`Generation::DEFAULT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageIndex {
    by_species: HashMap<String, Generation>,
}

impl LineageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, species_key: impl Into<String>, generation: Generation) {
        self.by_species.insert(species_key.into(), generation);
    }

    /// Record every key of one generation's species listing.
    pub fn extend_generation<I, S>(&mut self, generation: Generation, species_keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in species_keys {
            self.insert(key, generation);
        }
    }

    pub fn generation_of(&self, species_key: &str) -> Generation {
        self.by_species
            .get(species_key)
            .copied()
            .unwrap_or(Generation::DEFAULT)
    }

    pub fn contains(&self, species_key: &str) -> bool {
        self.by_species.contains_key(species_key)
    }

    pub fn len(&self) -> usize {
        self.by_species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_species.is_empty()
    }
}

// ============================================================================
// Image reference
// ============================================================================

/// A resolvable sprite reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRef {
    Remote { url: String },
    /// Generated stand-in for entities the source has no sprite for.
    Placeholder { id: EntityId },
}

impl ImageRef {
    pub fn from_locator(locator: Option<String>, id: EntityId) -> Self {
        match locator {
            Some(url) if !url.trim().is_empty() => ImageRef::Remote { url },
            _ => ImageRef::Placeholder { id },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageRef::Placeholder { .. })
    }

    /// A URI a renderer can load directly.
    ///
    /// Placeholders become an inline SVG so they never need a network round trip.
    pub fn uri(&self) -> Cow<'_, str> {
        match self {
            ImageRef::Remote { url } => Cow::Borrowed(url),
            ImageRef::Placeholder { id } => Cow::Owned(format!(
                "data:image/svg+xml;utf8,\
                 <svg xmlns='http://www.w3.org/2000/svg' width='96' height='96' viewBox='0 0 96 96'>\
                 <rect width='96' height='96' rx='12' fill='lightgray'/>\
                 <text x='48' y='52' font-size='36' text-anchor='middle' fill='dimgray'>?</text>\
                 <text x='48' y='84' font-size='14' text-anchor='middle' fill='dimgray'>{id}</text>\
                 </svg>"
            )),
        }
    }
}

// ============================================================================
// Entity record
// ============================================================================

/// The catalog's unit: one fully enriched entity.
///
/// A record is either complete or absent. The ingestion pipeline never inserts
/// a record with missing enrichment, and fields that the source may omit carry
/// documented defaults (`Generation::DEFAULT`, `ImageRef::Placeholder`, no
/// color, canonical-name fallback for locales).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub canonical_name: String,
    /// Display names by locale code. May cover only some supported locales.
    pub localized_names: BTreeMap<String, String>,
    pub image: ImageRef,
    /// One or two categories, in slot order.
    pub categories: Vec<Category>,
    pub generation: Generation,
    pub evolution_depth: EvolutionDepth,
    pub flags: BTreeSet<SpecialFlag>,
    pub color: Option<Color>,
}

impl EntityRecord {
    /// Build a record with default enrichment (generation 1, base depth, no
    /// flags, no color, no localized names).
    pub fn new(
        id: EntityId,
        canonical_name: impl Into<String>,
        categories: Vec<Category>,
    ) -> Result<Self, ModelError> {
        let record = Self {
            id,
            canonical_name: canonical_name.into(),
            localized_names: BTreeMap::new(),
            image: ImageRef::Placeholder { id },
            categories,
            generation: Generation::DEFAULT,
            evolution_depth: EvolutionDepth::Base,
            flags: BTreeSet::new(),
            color: None,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_evolution_depth(mut self, depth: EvolutionDepth) -> Self {
        self.evolution_depth = depth;
        self
    }

    pub fn with_flag(mut self, flag: SpecialFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = image;
        self
    }

    pub fn with_localized_name(mut self, locale: impl Into<String>, name: impl Into<String>) -> Self {
        self.localized_names.insert(locale.into(), name.into());
        self
    }

    /// Check the structural rules every catalog record must satisfy.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id == 0 {
            return Err(ModelError::ZeroEntityId);
        }
        CategoryCount::from_len(self.categories.len())?;
        Ok(())
    }

    pub fn category_count(&self) -> CategoryCount {
        // `validate` runs on construction; a hand-built record with a bad
        // length is reported as dual rather than panicking.
        CategoryCount::from_len(self.categories.len()).unwrap_or(CategoryCount::Dual)
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn has_flag(&self, flag: SpecialFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Name shown for `locale`, falling back to the canonical name.
    pub fn display_name(&self, locale: &Locale) -> &str {
        self.localized_names
            .get(locale.as_str())
            .map(String::as_str)
            .unwrap_or(&self.canonical_name)
    }

    /// Case-insensitive substring match against the canonical name or the
    /// name for `locale`. An empty query matches everything.
    pub fn matches_name(&self, query: &str, locale: &Locale) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        if self.canonical_name.to_lowercase().contains(&needle) {
            return true;
        }
        self.localized_names
            .get(locale.as_str())
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> EntityRecord {
        EntityRecord::new(1, "bulbasaur", vec![Category::Grass, Category::Poison])
            .unwrap()
            .with_localized_name("fr", "Bulbizarre")
            .with_localized_name("ja", "フシギダネ")
    }

    #[test]
    fn display_name_falls_back_to_canonical() {
        let r = bulbasaur();
        assert_eq!(r.display_name(&Locale::new("fr")), "Bulbizarre");
        assert_eq!(r.display_name(&Locale::new("de")), "bulbasaur");
    }

    #[test]
    fn name_match_uses_canonical_and_active_locale_only() {
        let r = bulbasaur();
        let fr = Locale::new("fr");
        let en = Locale::new("en");
        assert!(r.matches_name("BULB", &en));
        assert!(r.matches_name("bizar", &fr));
        assert!(!r.matches_name("bizar", &en));
        assert!(r.matches_name("フシギ", &Locale::new("ja")));
        assert!(r.matches_name("", &en));
        assert!(r.matches_name("   ", &en));
    }

    #[test]
    fn name_query_whitespace_is_part_of_the_substring() {
        let r = EntityRecord::new(122, "mr-mime", vec![Category::Psychic])
            .unwrap()
            .with_localized_name("en", "Mr. Mime");
        let en = Locale::new("en");
        assert!(r.matches_name("mr. m", &en));
        assert!(!r.matches_name("mr ", &en));
        assert!(!r.matches_name(" mime", &Locale::new("fr")));
    }

    #[test]
    fn record_rejects_bad_category_lengths_and_zero_id() {
        assert!(matches!(
            EntityRecord::new(3, "x", vec![]),
            Err(ModelError::InvalidCategoryCount(0))
        ));
        assert!(EntityRecord::new(
            3,
            "x",
            vec![Category::Fire, Category::Water, Category::Ice]
        )
        .is_err());
        assert!(matches!(
            EntityRecord::new(0, "x", vec![Category::Fire]),
            Err(ModelError::ZeroEntityId)
        ));
    }

    #[test]
    fn lineage_index_defaults_missing_keys_to_first_generation() {
        let mut index = LineageIndex::new();
        index.extend_generation(Generation::new(4).unwrap(), ["turtwig", "chimchar"]);
        assert_eq!(index.generation_of("turtwig").get(), 4);
        assert_eq!(index.generation_of("missingno").get(), 1);
        assert!(index.contains("chimchar"));
        assert!(!index.contains("missingno"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn placeholder_image_is_an_inline_svg() {
        let image = ImageRef::from_locator(None, 42);
        assert!(image.is_placeholder());
        let uri = image.uri();
        assert!(uri.starts_with("data:image/svg+xml"));
        assert!(uri.contains(">42<"));

        let remote = ImageRef::from_locator(Some("https://img/1.png".into()), 1);
        assert_eq!(remote.uri(), "https://img/1.png");
    }
}
