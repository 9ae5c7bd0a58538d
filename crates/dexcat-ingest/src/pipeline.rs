//! Ingestion Pipeline
//!
//! ```text
//!   lineage fan-out (one request per generation, all concurrent)
//!          │  all settle
//!          ▼
//!   entity listing  ──✗──► IngestError::ReferenceList (fatal)
//!          │
//!          ▼  keep ids in 1..=max_entity_id
//!   batch 1 ─► batch 2 ─► … ─► batch N        (strictly sequential)
//!     │ detail → species → predecessor species  (concurrent within a batch)
//!     │ any step fails → that entity is dropped
//!     ▼
//!   progress event per batch
//!          │
//!          ▼
//!   sort by id, freeze → Catalog
//! ```
//!
//! Everything runs on the caller's task: entity fetches are joined, never
//! spawned, so the only concurrency is in-flight I/O and at most one batch of
//! entities is in flight at a time.

use std::sync::Arc;

use dexcat_model::{Catalog, EntityId, EntityRecord, Generation, LineageIndex};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::IngestConfig;
use crate::enrich::enrich;
use crate::source::{CatalogSource, EntityReference, SourceError};

// ============================================================================
// Events and results
// ============================================================================

/// Observational progress. Handlers cannot influence ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestProgress {
    /// `0..=100`, derived from completed batches.
    pub percent: u8,
    pub message: String,
}

/// Callback for progress events
pub type ProgressHandler = Box<dyn Fn(&IngestProgress) + Send + Sync>;

/// An entity left out of the catalog and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedEntity {
    pub id: EntityId,
    pub locator: String,
    pub reason: String,
}

/// Diagnostics for tolerated failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub failed_generations: Vec<Generation>,
    pub dropped: Vec<DroppedEntity>,
    /// References discarded because their id is outside `1..=max_entity_id`.
    pub out_of_range: usize,
    pub batches: usize,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.failed_generations.is_empty() && self.dropped.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub catalog: Catalog,
    pub lineage: LineageIndex,
    pub report: IngestReport,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Without the entity listing there is no catalog to build.
    #[error("failed to list catalog entities: {0}")]
    ReferenceList(#[source] SourceError),
}

// ============================================================================
// Ingestor
// ============================================================================

pub struct Ingestor {
    source: Arc<dyn CatalogSource>,
    config: IngestConfig,
    handlers: Vec<ProgressHandler>,
}

impl Ingestor {
    pub fn new(source: Arc<dyn CatalogSource>, config: IngestConfig) -> Self {
        Self {
            source,
            config,
            handlers: Vec::new(),
        }
    }

    /// Add a progress handler
    pub fn on_progress(&mut self, handler: ProgressHandler) {
        self.handlers.push(handler);
    }

    fn emit(&self, percent: u8, message: String) {
        let event = IngestProgress { percent, message };
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Build the catalog. Only a failed entity listing is fatal.
    pub async fn ingest(&self) -> Result<IngestOutcome, IngestError> {
        let mut report = IngestReport::default();

        let lineage = self.fetch_lineage(&mut report).await;
        tracing::info!(species = lineage.len(), "lineage index built");

        let references = self
            .source
            .list_entity_references()
            .await
            .map_err(IngestError::ReferenceList)?;

        let total_references = references.len();
        let max_id = self.config.max_entity_id;
        let references: Vec<EntityReference> = references
            .into_iter()
            .filter(|r| r.id >= 1 && r.id <= max_id)
            .collect();
        report.out_of_range = total_references - references.len();

        let batch_size = self.config.batch_size.max(1);
        let batches: Vec<&[EntityReference]> = references.chunks(batch_size).collect();
        report.batches = batches.len();

        tracing::info!(
            references = references.len(),
            out_of_range = report.out_of_range,
            batches = batches.len(),
            batch_size,
            "starting entity ingestion"
        );
        self.emit(0, format!("Fetching {} entries…", references.len()));

        let mut records: Vec<EntityRecord> = Vec::with_capacity(references.len());
        for (index, batch) in batches.iter().enumerate() {
            let results = join_all(batch.iter().map(|r| self.resolve_entity(r, &lineage))).await;

            for (reference, result) in batch.iter().zip(results) {
                match result {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        tracing::warn!(
                            id = reference.id,
                            locator = %reference.locator,
                            error = %err,
                            "dropping entity after failed fetch"
                        );
                        report.dropped.push(DroppedEntity {
                            id: reference.id,
                            locator: reference.locator.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }

            let done = index + 1;
            tracing::debug!(batch = done, of = batches.len(), kept = records.len(), "batch settled");
            self.emit(
                percent(done, batches.len()),
                format!("Loaded {} of {} entries", records.len(), references.len()),
            );
        }

        let catalog = Catalog::from_records(records);
        tracing::info!(
            kept = catalog.len(),
            dropped = report.dropped.len(),
            failed_generations = report.failed_generations.len(),
            "catalog frozen"
        );
        self.emit(100, format!("Catalog ready: {} entries", catalog.len()));

        Ok(IngestOutcome {
            catalog,
            lineage,
            report,
        })
    }

    /// One request per configured generation, all in flight together. A failed
    /// generation contributes nothing.
    async fn fetch_lineage(&self, report: &mut IngestReport) -> LineageIndex {
        let generations = &self.config.generations;
        let results = join_all(generations.iter().map(|&g| self.source.list_generation(g))).await;

        let mut lineage = LineageIndex::new();
        for (&generation, result) in generations.iter().zip(results) {
            match result {
                Ok(keys) => lineage.extend_generation(generation, keys),
                Err(err) => {
                    tracing::warn!(
                        generation = generation.get(),
                        error = %err,
                        "lineage generation unavailable; its species default to generation 1"
                    );
                    report.failed_generations.push(generation);
                }
            }
        }
        lineage
    }

    /// detail → species → (predecessor species). At most three suspension
    /// points, first failure wins. The predecessor's own predecessor is only
    /// inspected, never fetched.
    async fn resolve_entity(
        &self,
        reference: &EntityReference,
        lineage: &LineageIndex,
    ) -> Result<EntityRecord, SourceError> {
        let detail = self.source.fetch_detail(&reference.locator).await?;
        let species = self.source.fetch_species(&detail.species_locator).await?;

        let hops = match &species.predecessor_locator {
            None => 0,
            Some(locator) => {
                let predecessor = self.source.fetch_species(locator).await?;
                if predecessor.predecessor_locator.is_some() {
                    2
                } else {
                    1
                }
            }
        };

        enrich(detail, species, hops, lineage, &self.config.supported_locales)
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done * 100) / total).min(100) as u8
}
