//! Catalog Source capability
//!
//! The ingestion pipeline only ever talks to the remote service through
//! [`CatalogSource`]. The shapes below are what ingestion consumes, not the
//! service's wire format; each implementation owns its own decoding.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dexcat_model::{EntityId, Generation, ModelError};
use serde::{Deserialize, Serialize};

/// One entry of the complete entity listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityReference {
    pub id: EntityId,
    /// Where the detail record for this entity lives.
    pub locator: String,
}

/// Per-entity detail as ingestion needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: EntityId,
    pub canonical_name: String,
    #[serde(default)]
    pub sprite_locator: Option<String>,
    /// Category tags in slot order.
    pub categories: Vec<String>,
    /// Stable key the lineage index is keyed by.
    pub species_key: String,
    pub species_locator: String,
}

/// Per-species auxiliary record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    /// Display names by locale code.
    #[serde(default)]
    pub localized_names: BTreeMap<String, String>,
    #[serde(default)]
    pub is_baby: bool,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    #[serde(default)]
    pub color: Option<String>,
    /// Locator of the species this one evolves from.
    #[serde(default)]
    pub predecessor_locator: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[cfg(feature = "http")]
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[cfg(feature = "http")]
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid locator: {0:?}")]
    InvalidLocator(String),
    #[error("nothing found at {0}")]
    NotFound(String),
    #[error("source unavailable for {0}")]
    Unavailable(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Remote catalog capability consumed by the ingestion pipeline.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Species keys introduced in `generation`.
    async fn list_generation(&self, generation: Generation) -> Result<Vec<String>, SourceError>;

    /// The complete, ordered entity listing. Implementations backed by a
    /// paginated service must walk every page before returning.
    async fn list_entity_references(&self) -> Result<Vec<EntityReference>, SourceError>;

    async fn fetch_detail(&self, locator: &str) -> Result<DetailRecord, SourceError>;

    async fn fetch_species(&self, locator: &str) -> Result<SpeciesRecord, SourceError>;
}

/// Decode the numeric id from the last non-empty path segment of a locator,
/// e.g. `https://host/api/v2/pokemon/25/` → `25`.
pub fn decode_locator_id(locator: &str) -> Option<EntityId> {
    let path = locator.split(['?', '#']).next().unwrap_or_default();
    let id: EntityId = path
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())?
        .parse()
        .ok()?;
    (id > 0).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_locator_id_reads_the_trailing_segment() {
        assert_eq!(decode_locator_id("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(decode_locator_id("https://pokeapi.co/api/v2/pokemon/10034"), Some(10034));
        assert_eq!(decode_locator_id("memory://pokemon/7?x=1"), Some(7));
        assert_eq!(decode_locator_id("https://pokeapi.co/api/v2/pokemon/mew/"), None);
        assert_eq!(decode_locator_id("https://pokeapi.co/api/v2/pokemon/0/"), None);
        assert_eq!(decode_locator_id(""), None);
    }

    proptest::proptest! {
        #[test]
        fn decode_locator_id_finds_any_positive_id(
            id in 1u32..=u32::MAX,
            host in "[a-z]{1,8}",
            trailing_slash in proptest::bool::ANY,
        ) {
            let slash = if trailing_slash { "/" } else { "" };
            let locator = format!("https://{host}.example/api/v2/pokemon/{id}{slash}");
            proptest::prop_assert_eq!(decode_locator_id(&locator), Some(id));
        }
    }
}
