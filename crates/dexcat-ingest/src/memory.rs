//! In-memory catalog source.
//!
//! Serves a [`Fixture`] (usually loaded from JSON) and lets callers inject
//! failures per generation, per locator, or for the whole reference listing.
//! It also records how many detail fetches were in flight at once so batch
//! backpressure can be observed.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dexcat_model::Generation;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::source::{CatalogSource, DetailRecord, EntityReference, SourceError, SpeciesRecord};

/// Everything a catalog source can serve, keyed the way ingestion asks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    /// `generation number -> species keys`.
    pub generations: BTreeMap<u8, Vec<String>>,
    pub references: Vec<EntityReference>,
    /// `detail locator -> detail`.
    pub details: HashMap<String, DetailRecord>,
    /// `species locator -> species`.
    pub species: HashMap<String, SpeciesRecord>,
}

impl Fixture {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// What the source has been asked to do so far, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Generation(u8),
    References,
    Detail(String),
    Species(String),
}

#[derive(Default)]
pub struct InMemorySource {
    fixture: Fixture,
    failing_generations: HashSet<u8>,
    failing_locators: HashSet<String>,
    fail_references: bool,
    calls: Mutex<Vec<SourceCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemorySource {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            ..Default::default()
        }
    }

    pub fn fixture_mut(&mut self) -> &mut Fixture {
        &mut self.fixture
    }

    /// Register a generation's species keys.
    pub fn with_generation<I, S>(mut self, generation: u8, species_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixture
            .generations
            .insert(generation, species_keys.into_iter().map(Into::into).collect());
        self
    }

    /// Register an entity: its listing entry and its detail record.
    pub fn with_entity(mut self, locator: impl Into<String>, detail: DetailRecord) -> Self {
        let locator = locator.into();
        self.fixture.references.push(EntityReference {
            id: detail.id,
            locator: locator.clone(),
        });
        self.fixture.details.insert(locator, detail);
        self
    }

    pub fn with_species(mut self, locator: impl Into<String>, species: SpeciesRecord) -> Self {
        self.fixture.species.insert(locator.into(), species);
        self
    }

    pub fn fail_generation(mut self, generation: u8) -> Self {
        self.failing_generations.insert(generation);
        self
    }

    /// Any detail or species fetch at `locator` fails.
    pub fn fail_locator(mut self, locator: impl Into<String>) -> Self {
        self.failing_locators.insert(locator.into());
        self
    }

    pub fn fail_references(mut self) -> Self {
        self.fail_references = true;
        self
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().clone()
    }

    /// Highest number of detail fetches observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().push(call);
    }

    fn check_locator(&self, locator: &str) -> Result<(), SourceError> {
        if self.failing_locators.contains(locator) {
            return Err(SourceError::Unavailable(locator.to_string()));
        }
        Ok(())
    }
}

/// Decrements the in-flight counter however the fetch ends.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogSource for InMemorySource {
    async fn list_generation(&self, generation: Generation) -> Result<Vec<String>, SourceError> {
        let n = generation.get();
        self.record(SourceCall::Generation(n));
        tokio::task::yield_now().await;
        if self.failing_generations.contains(&n) {
            return Err(SourceError::Unavailable(format!("generation/{n}")));
        }
        Ok(self.fixture.generations.get(&n).cloned().unwrap_or_default())
    }

    async fn list_entity_references(&self) -> Result<Vec<EntityReference>, SourceError> {
        self.record(SourceCall::References);
        if self.fail_references {
            return Err(SourceError::Unavailable("references".to_string()));
        }
        Ok(self.fixture.references.clone())
    }

    async fn fetch_detail(&self, locator: &str) -> Result<DetailRecord, SourceError> {
        self.record(SourceCall::Detail(locator.to_string()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Let sibling fetches start before this one settles.
        tokio::task::yield_now().await;

        self.check_locator(locator)?;
        self.fixture
            .details
            .get(locator)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(locator.to_string()))
    }

    async fn fetch_species(&self, locator: &str) -> Result<SpeciesRecord, SourceError> {
        self.record(SourceCall::Species(locator.to_string()));
        tokio::task::yield_now().await;
        self.check_locator(locator)?;
        self.fixture
            .species
            .get(locator)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(locator.to_string()))
    }
}
