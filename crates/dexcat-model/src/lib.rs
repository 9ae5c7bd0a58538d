//! Dexcat catalog data model
//!
//! This crate defines the enriched entity record that the ingestion pipeline
//! materializes and the filter engine reads, together with the closed value
//! domains of every filterable facet.
//!
//! Records are plain values. Once a catalog has been ingested and sorted it is
//! never mutated again, so nothing here carries interior mutability.

pub mod catalog;
pub mod facets;
pub mod locale;
pub mod record;

pub use catalog::Catalog;
pub use facets::{Category, CategoryCount, Color, EvolutionDepth, Generation, SpecialFlag};
pub use locale::{Locale, SUPPORTED_LOCALES};
pub use record::{EntityId, EntityRecord, ImageRef, LineageIndex};

/// Errors raised when a raw value does not fit a model domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("generation {0} is outside 1..=9")]
    InvalidGeneration(u8),
    #[error("evolution depth {0} is outside 1..=3")]
    InvalidEvolutionDepth(u8),
    #[error("unknown category tag: {0}")]
    UnknownCategory(String),
    #[error("unknown color tag: {0}")]
    UnknownColor(String),
    #[error("unknown special flag: {0}")]
    UnknownFlag(String),
    #[error("entity must carry 1 or 2 categories, got {0}")]
    InvalidCategoryCount(usize),
    #[error("entity id must be positive")]
    ZeroEntityId,
}
