//! Dexcat ingestion: remote catalog → frozen, enriched [`Catalog`]
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        INGESTION PIPELINE                            │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │  ┌───────────────┐   generations    ┌──────────────┐                 │
//! │  │               │─────────────────►│ LineageIndex │──┐              │
//! │  │  Catalog      │                  └──────────────┘  │              │
//! │  │  Source       │   references                       ▼              │
//! │  │               │─────────────────►┌──────────────────────┐         │
//! │  │ (HTTP / in-   │                  │  batched resolver    │         │
//! │  │  memory)      │◄─── detail ──────│  detail → species →  │         │
//! │  │               │◄─── species ─────│  predecessor         │         │
//! │  └───────────────┘                  └──────────┬───────────┘         │
//! │                                                │ progress events     │
//! │                                                ▼                     │
//! │                                         ┌─────────────┐              │
//! │                                         │   Catalog   │ (frozen)     │
//! │                                         └─────────────┘              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tolerated failures (a generation listing, any per-entity fetch) are logged
//! through `tracing` and summarized in [`IngestReport`]. A failed entity
//! listing aborts with [`IngestError::ReferenceList`].
//!
//! [`Catalog`]: dexcat_model::Catalog

pub mod config;
pub mod enrich;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;
pub mod pipeline;
pub mod source;

pub use config::{ConfigError, IngestConfig};
#[cfg(feature = "http")]
pub use http::HttpCatalogSource;
pub use memory::{Fixture, InMemorySource, SourceCall};
pub use pipeline::{
    DroppedEntity, IngestError, IngestOutcome, IngestProgress, IngestReport, Ingestor,
    ProgressHandler,
};
pub use source::{
    decode_locator_id, CatalogSource, DetailRecord, EntityReference, SourceError, SpeciesRecord,
};
