//! HTTP catalog source backed by the public REST catalog service.
//!
//! Endpoints used:
//! - `GET generation/{n}/` for lineage listings,
//! - `GET pokemon?limit=&offset=` for the paginated entity listing (followed
//!   via `next` links),
//! - detail and species records at the locators the listing hands out.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use dexcat_model::Generation;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::IngestConfig;
use crate::source::{
    decode_locator_id, CatalogSource, DetailRecord, EntityReference, SourceError, SpeciesRecord,
};

pub struct HttpCatalogSource {
    client: Client,
    base: Url,
    page_size: usize,
}

impl HttpCatalogSource {
    pub fn new(config: &IngestConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("dexcat")),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SourceError::Client)?;

        // `Url::join` replaces the last segment unless the base ends in `/`.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|_| SourceError::InvalidLocator(base.clone()))?;

        Ok(Self {
            client,
            base,
            page_size: config.page_size.max(1),
        })
    }

    fn resolve(&self, locator: &str) -> Result<Url, SourceError> {
        Url::parse(locator)
            .or_else(|_| self.base.join(locator.trim_start_matches('/')))
            .map_err(|_| SourceError::InvalidLocator(locator.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|source| SourceError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn list_generation(&self, generation: Generation) -> Result<Vec<String>, SourceError> {
        let url = self.resolve(&format!("generation/{}/", generation.get()))?;
        let payload: GenerationPayload = self.get_json(url).await?;
        Ok(payload
            .pokemon_species
            .into_iter()
            .map(|species| species.name)
            .collect())
    }

    async fn list_entity_references(&self) -> Result<Vec<EntityReference>, SourceError> {
        let first = self.resolve(&format!("pokemon?limit={}&offset=0", self.page_size))?;
        walk_listing(first, move |url| self.get_json::<ListPage>(url)).await
    }

    async fn fetch_detail(&self, locator: &str) -> Result<DetailRecord, SourceError> {
        let payload: DetailPayload = self.get_json(self.resolve(locator)?).await?;
        Ok(payload.into_detail())
    }

    async fn fetch_species(&self, locator: &str) -> Result<SpeciesRecord, SourceError> {
        let payload: SpeciesPayload = self.get_json(self.resolve(locator)?).await?;
        Ok(payload.into_species())
    }
}

/// Follow `next` links from `first` until the service returns a page without
/// one. A `next` link back to a page already read ends the walk.
///
/// A reference whose locator carries no numeric id is kept with id 0 so the
/// pipeline counts it as out of range.
async fn walk_listing<F, Fut>(
    first: Url,
    mut fetch_page: F,
) -> Result<Vec<EntityReference>, SourceError>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<ListPage, SourceError>>,
{
    let mut visited = HashSet::new();
    let mut references = Vec::new();
    let mut next = Some(first);

    while let Some(url) = next.take() {
        visited.insert(url.clone());
        let page = fetch_page(url.clone()).await?;
        for entry in page.results {
            let id = decode_locator_id(&entry.url).unwrap_or_else(|| {
                tracing::debug!(locator = %entry.url, "reference without numeric id");
                0
            });
            references.push(EntityReference {
                id,
                locator: entry.url,
            });
        }

        if let Some(link) = page.next {
            let link = Url::parse(&link)
                .or_else(|_| url.join(&link))
                .map_err(|_| SourceError::InvalidLocator(link.clone()))?;
            if visited.contains(&link) {
                tracing::warn!(
                    url = %link,
                    pages = visited.len(),
                    "entity listing links back to a visited page"
                );
            } else {
                next = Some(link);
            }
        }
    }

    Ok(references)
}

// ============================================================================
// Wire shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct GenerationPayload {
    pokemon_species: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    next: Option<String>,
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    id: u32,
    name: String,
    #[serde(default)]
    sprites: Sprites,
    types: Vec<TypeSlot>,
    species: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
    other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<Artwork>,
}

#[derive(Debug, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

impl DetailPayload {
    fn into_detail(self) -> DetailRecord {
        let artwork = self
            .sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default);
        let sprite_locator = artwork.or(self.sprites.front_default);

        let mut types = self.types;
        types.sort_by_key(|t| t.slot);

        DetailRecord {
            id: self.id,
            canonical_name: self.name,
            sprite_locator,
            categories: types.into_iter().map(|t| t.kind.name).collect(),
            species_key: self.species.name,
            species_locator: self.species.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpeciesPayload {
    #[serde(default)]
    names: Vec<LocalizedName>,
    #[serde(default)]
    is_baby: bool,
    #[serde(default)]
    is_legendary: bool,
    #[serde(default)]
    is_mythical: bool,
    color: Option<NamedResource>,
    evolves_from_species: Option<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct LocalizedName {
    language: NamedResource,
    name: String,
}

impl SpeciesPayload {
    fn into_species(self) -> SpeciesRecord {
        SpeciesRecord {
            localized_names: self
                .names
                .into_iter()
                .map(|n| (n.language.name, n.name))
                .collect(),
            is_baby: self.is_baby,
            is_legendary: self.is_legendary,
            is_mythical: self.is_mythical,
            color: self.color.map(|c| c.name),
            predecessor_locator: self.evolves_from_species.map(|s| s.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source() -> HttpCatalogSource {
        HttpCatalogSource::new(&IngestConfig::default()).unwrap()
    }

    #[test]
    fn relative_locators_resolve_under_the_base_path() {
        let s = source();
        assert_eq!(
            s.resolve("generation/3/").unwrap().as_str(),
            "https://pokeapi.co/api/v2/generation/3/"
        );
        assert_eq!(
            s.resolve("https://example.org/pokemon/1/").unwrap().as_str(),
            "https://example.org/pokemon/1/"
        );
    }

    #[test]
    fn detail_payload_prefers_artwork_and_orders_types_by_slot() {
        let payload: DetailPayload = serde_json::from_value(serde_json::json!({
            "id": 6,
            "name": "charizard",
            "sprites": {
                "front_default": "https://sprites/6.png",
                "other": { "official-artwork": { "front_default": "https://art/6.png" } }
            },
            "types": [
                { "slot": 2, "type": { "name": "flying", "url": "https://x/type/3/" } },
                { "slot": 1, "type": { "name": "fire", "url": "https://x/type/10/" } }
            ],
            "species": { "name": "charizard", "url": "https://x/pokemon-species/6/" }
        }))
        .unwrap();

        let detail = payload.into_detail();
        assert_eq!(detail.sprite_locator.as_deref(), Some("https://art/6.png"));
        assert_eq!(detail.categories, vec!["fire", "flying"]);
        assert_eq!(detail.species_key, "charizard");
    }

    #[test]
    fn detail_payload_without_sprites_has_no_locator() {
        let payload: DetailPayload = serde_json::from_value(serde_json::json!({
            "id": 1000,
            "name": "gholdengo",
            "sprites": { "front_default": null },
            "types": [{ "slot": 1, "type": { "name": "steel", "url": "u" } }],
            "species": { "name": "gholdengo", "url": "https://x/pokemon-species/1000/" }
        }))
        .unwrap();
        assert_eq!(payload.into_detail().sprite_locator, None);
    }

    #[test]
    fn species_payload_maps_names_flags_and_predecessor() {
        let payload: SpeciesPayload = serde_json::from_value(serde_json::json!({
            "names": [
                { "language": { "name": "fr", "url": "u" }, "name": "Dracaufeu" },
                { "language": { "name": "en", "url": "u" }, "name": "Charizard" }
            ],
            "is_baby": false,
            "is_legendary": false,
            "is_mythical": false,
            "color": { "name": "red", "url": "u" },
            "evolves_from_species": { "name": "charmeleon", "url": "https://x/pokemon-species/5/" }
        }))
        .unwrap();

        let species = payload.into_species();
        assert_eq!(species.localized_names["fr"], "Dracaufeu");
        assert_eq!(species.color.as_deref(), Some("red"));
        assert_eq!(
            species.predecessor_locator.as_deref(),
            Some("https://x/pokemon-species/5/")
        );
    }

    fn pages(pages: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
        pages
            .iter()
            .map(|(url, body)| (url.to_string(), body.clone()))
            .collect()
    }

    async fn walk(
        first: &str,
        served: &HashMap<String, serde_json::Value>,
    ) -> (Result<Vec<EntityReference>, SourceError>, Vec<String>) {
        let mut requested = Vec::new();
        let result = walk_listing(Url::parse(first).unwrap(), |url| {
            requested.push(url.to_string());
            let page: Result<ListPage, SourceError> = match served.get(url.as_str()) {
                Some(body) => serde_json::from_value(body.clone()).map_err(|source| {
                    SourceError::Decode {
                        url: url.to_string(),
                        source,
                    }
                }),
                None => Err(SourceError::NotFound(url.to_string())),
            };
            async move { page }
        })
        .await;
        (result, requested)
    }

    #[tokio::test]
    async fn listing_walk_follows_next_until_null() {
        let served = pages(&[
            (
                "https://x/api/pokemon?limit=2&offset=0",
                serde_json::json!({
                    "next": "https://x/api/pokemon?limit=2&offset=2",
                    "results": [
                        { "name": "bulbasaur", "url": "https://x/api/pokemon/1/" },
                        { "name": "ivysaur", "url": "https://x/api/pokemon/2/" }
                    ]
                }),
            ),
            (
                "https://x/api/pokemon?limit=2&offset=2",
                serde_json::json!({
                    "next": null,
                    "results": [{ "name": "venusaur", "url": "https://x/api/pokemon/3/" }]
                }),
            ),
        ]);

        let (result, requested) = walk("https://x/api/pokemon?limit=2&offset=0", &served).await;
        let ids: Vec<u32> = result.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(requested.len(), 2);
    }

    #[tokio::test]
    async fn listing_walk_stops_on_a_link_back_to_a_visited_page() {
        let served = pages(&[
            (
                "https://x/api/pokemon?offset=0",
                serde_json::json!({
                    "next": "pokemon?offset=1",
                    "results": [{ "name": "bulbasaur", "url": "https://x/api/pokemon/1/" }]
                }),
            ),
            (
                "https://x/api/pokemon?offset=1",
                serde_json::json!({
                    "next": "https://x/api/pokemon?offset=0",
                    "results": [{ "name": "ivysaur", "url": "https://x/api/pokemon/2/" }]
                }),
            ),
        ]);

        let (result, requested) = walk("https://x/api/pokemon?offset=0", &served).await;
        let ids: Vec<u32> = result.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            requested,
            vec!["https://x/api/pokemon?offset=0", "https://x/api/pokemon?offset=1"]
        );
    }

    #[tokio::test]
    async fn listing_walk_keeps_references_without_a_numeric_id_as_id_zero() {
        let served = pages(&[(
            "https://x/api/pokemon",
            serde_json::json!({
                "next": null,
                "results": [
                    { "name": "bulbasaur", "url": "https://x/api/pokemon/1/" },
                    { "name": "odd", "url": "https://x/api/pokemon/odd-form/" }
                ]
            }),
        )]);

        let (result, _) = walk("https://x/api/pokemon", &served).await;
        let references = result.unwrap();
        assert_eq!(references[1].id, 0);
        assert_eq!(references[1].locator, "https://x/api/pokemon/odd-form/");
    }

    #[tokio::test]
    async fn listing_walk_fails_when_a_page_fails() {
        let served = pages(&[(
            "https://x/api/pokemon",
            serde_json::json!({
                "next": "https://x/api/pokemon?offset=9",
                "results": []
            }),
        )]);
        let (result, _) = walk("https://x/api/pokemon", &served).await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }
}
