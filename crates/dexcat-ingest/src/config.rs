//! Ingestion configuration
//!
//! Defaults target the public catalog service. Environment variables overlay
//! the defaults and CLI flags overlay the environment.

use dexcat_model::{EntityId, Generation, SUPPORTED_LOCALES};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Entities fetched concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Highest entity id kept. Alternate forms are listed with ids far above it.
pub const DEFAULT_MAX_ENTITY_ID: EntityId = 1025;

pub const DEFAULT_PAGE_SIZE: usize = 200;

pub const DEXCAT_BASE_URL_ENV: &str = "DEXCAT_BASE_URL";
pub const DEXCAT_BATCH_SIZE_ENV: &str = "DEXCAT_BATCH_SIZE";
pub const DEXCAT_MAX_ENTITY_ID_ENV: &str = "DEXCAT_MAX_ENTITY_ID";
pub const DEXCAT_PAGE_SIZE_ENV: &str = "DEXCAT_PAGE_SIZE";
pub const DEXCAT_TIMEOUT_SECS_ENV: &str = "DEXCAT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub base_url: String,
    pub batch_size: usize,
    pub max_entity_id: EntityId,
    /// Generations whose species listings make up the lineage index.
    pub generations: Vec<Generation>,
    /// Page size used when walking the paginated entity listing.
    pub page_size: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Locales whose display names are kept on each record.
    pub supported_locales: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_entity_id: DEFAULT_MAX_ENTITY_ID,
            generations: Generation::all().collect(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            user_agent: concat!("dexcat/", env!("CARGO_PKG_VERSION")).to_string(),
            supported_locales: SUPPORTED_LOCALES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotAPositiveInteger { var: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl IngestConfig {
    /// Defaults overlaid with `DEXCAT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(DEXCAT_BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Some(n) = positive_env(DEXCAT_BATCH_SIZE_ENV)? {
            config.batch_size = n as usize;
        }
        if let Some(n) = positive_env(DEXCAT_MAX_ENTITY_ID_ENV)? {
            config.max_entity_id = EntityId::try_from(n).map_err(|_| {
                ConfigError::Invalid(format!(
                    "{DEXCAT_MAX_ENTITY_ID_ENV} {n} does not fit an entity id"
                ))
            })?;
        }
        if let Some(n) = positive_env(DEXCAT_PAGE_SIZE_ENV)? {
            config.page_size = n as usize;
        }
        if let Some(n) = positive_env(DEXCAT_TIMEOUT_SECS_ENV)? {
            config.timeout_secs = n;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_entity_id(mut self, max_entity_id: EntityId) -> Self {
        self.max_entity_id = max_entity_id;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".to_string()));
        }
        Ok(())
    }
}

fn positive_env(var: &'static str) -> Result<Option<u64>, ConfigError> {
    let Ok(value) = std::env::var(var) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::NotAPositiveInteger { var, value }),
    }
}
