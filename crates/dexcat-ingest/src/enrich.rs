//! Turning fetched detail + species records into a catalog record.

use dexcat_model::{
    Category, Color, EntityRecord, EvolutionDepth, ImageRef, LineageIndex, SpecialFlag,
};

use crate::source::{DetailRecord, SourceError, SpeciesRecord};

/// Assemble a fully enriched record.
///
/// `predecessor_hops` is the number of lineage-predecessor hops observed while
/// fetching (0, 1 or 2); it saturates into [`EvolutionDepth`].
pub fn enrich(
    detail: DetailRecord,
    species: SpeciesRecord,
    predecessor_hops: usize,
    lineage: &LineageIndex,
    supported_locales: &[String],
) -> Result<EntityRecord, SourceError> {
    let categories = detail
        .categories
        .iter()
        .map(|tag| tag.parse::<Category>())
        .collect::<Result<Vec<_>, _>>()?;

    let color = species.color.as_deref().and_then(|tag| match tag.parse::<Color>() {
        Ok(color) => Some(color),
        Err(err) => {
            tracing::debug!(id = detail.id, error = %err, "ignoring color outside the palette");
            None
        }
    });

    if !lineage.contains(&detail.species_key) {
        tracing::debug!(
            id = detail.id,
            species = %detail.species_key,
            "species missing from lineage index, using generation 1"
        );
    }

    let mut record = EntityRecord::new(detail.id, detail.canonical_name, categories)?
        .with_image(ImageRef::from_locator(detail.sprite_locator, detail.id))
        .with_generation(lineage.generation_of(&detail.species_key))
        .with_evolution_depth(EvolutionDepth::from_hops(predecessor_hops))
        .with_color(color);

    for (flag, set) in [
        (SpecialFlag::Baby, species.is_baby),
        (SpecialFlag::Legendary, species.is_legendary),
        (SpecialFlag::Mythical, species.is_mythical),
    ] {
        if set {
            record = record.with_flag(flag);
        }
    }

    for (locale, name) in species.localized_names {
        if supported_locales.iter().any(|l| *l == locale) {
            record = record.with_localized_name(locale, name);
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexcat_model::{Generation, ModelError};
    use std::collections::BTreeMap;

    fn detail(categories: &[&str]) -> DetailRecord {
        DetailRecord {
            id: 172,
            canonical_name: "pichu".to_string(),
            sprite_locator: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            species_key: "pichu".to_string(),
            species_locator: "memory://species/172".to_string(),
        }
    }

    fn locales() -> Vec<String> {
        vec!["en".to_string(), "ja".to_string()]
    }

    #[test]
    fn enrich_fills_every_field() {
        let mut lineage = LineageIndex::new();
        lineage.insert("pichu", Generation::new(2).unwrap());

        let species = SpeciesRecord {
            localized_names: BTreeMap::from([
                ("ja".to_string(), "ピチュー".to_string()),
                ("xx".to_string(), "dropped".to_string()),
            ]),
            is_baby: true,
            color: Some("yellow".to_string()),
            ..Default::default()
        };

        let record = enrich(detail(&["electric"]), species, 0, &lineage, &locales()).unwrap();
        assert_eq!(record.generation.get(), 2);
        assert_eq!(record.evolution_depth, EvolutionDepth::Base);
        assert!(record.has_flag(SpecialFlag::Baby));
        assert_eq!(record.color, Some(Color::Yellow));
        assert!(record.image.is_placeholder());
        assert_eq!(record.localized_names.len(), 1);
        assert_eq!(record.localized_names["ja"], "ピチュー");
    }

    #[test]
    fn unknown_color_is_absent_not_fatal() {
        let species = SpeciesRecord {
            color: Some("chartreuse".to_string()),
            ..Default::default()
        };
        let record =
            enrich(detail(&["electric"]), species, 1, &LineageIndex::new(), &locales()).unwrap();
        assert_eq!(record.color, None);
        assert_eq!(record.generation, Generation::DEFAULT);
        assert_eq!(record.evolution_depth, EvolutionDepth::Middle);
    }

    #[test]
    fn unknown_or_missing_categories_fail_the_entity() {
        let err = enrich(
            detail(&["stellar"]),
            SpeciesRecord::default(),
            0,
            &LineageIndex::new(),
            &locales(),
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::Model(ModelError::UnknownCategory(_))));

        let err = enrich(detail(&[]), SpeciesRecord::default(), 0, &LineageIndex::new(), &locales())
            .unwrap_err();
        assert!(matches!(err, SourceError::Model(ModelError::InvalidCategoryCount(0))));
    }
}
