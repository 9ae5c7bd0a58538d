//! Dexcat session context
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          SESSION                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   Catalog (frozen, shared) ──► FilterEngine ──► displayed       │
//! │                                    ▲               │            │
//! │   FilterState (mutable) ───────────┘               ▼            │
//! │                                            minus disabled ids   │
//! │   SelectionState (mutable) ─────────────────────►  random pick  │
//! │                                                                 │
//! │   Preferences (opaque locale / theme)                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One [`Session`] owns all mutable state for a user session. It is created
//! once the catalog is frozen, mutated through discrete actions, and reset
//! through [`Session::reset`]. Nothing here can fail.

pub mod preferences;
pub mod selection;


use dexcat_filter::{FilterEngine, FilterState};
use dexcat_model::{Catalog, EntityId, EntityRecord, Locale};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub use preferences::Preferences;
pub use selection::SelectionState;

#[derive(Debug)]
pub struct Session {
    engine: FilterEngine,
    filter: FilterState,
    selection: SelectionState,
    preferences: Preferences,
    rng: SmallRng,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, SmallRng::from_entropy())
    }

    /// A session whose random picks are reproducible.
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, rng: SmallRng) -> Self {
        tracing::debug!(records = catalog.len(), "session created");
        Self {
            engine: FilterEngine::new(catalog),
            filter: FilterState::default(),
            selection: SelectionState::default(),
            preferences: Preferences::default(),
            rng,
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn locale(&self) -> &Locale {
        &self.preferences.locale
    }

    /// The displayed subset under the current filter state, re-evaluated
    /// from the full catalog.
    pub fn apply(&self) -> Vec<&EntityRecord> {
        self.engine.apply(&self.filter, &self.preferences.locale)
    }

    /// Displayed records that are not disabled: the random-pick pool.
    pub fn eligible(&self) -> Vec<&EntityRecord> {
        self.apply()
            .into_iter()
            .filter(|r| !self.selection.is_disabled(r.id))
            .collect()
    }

    pub fn toggle_disabled(&mut self, id: EntityId) -> bool {
        self.selection.toggle_disabled(id)
    }

    pub fn choose(&mut self, id: EntityId) -> Option<EntityId> {
        self.selection.choose(id)
    }

    /// Pick uniformly among the displayed, non-disabled records. `None` when
    /// there is nothing to pick from.
    pub fn choose_random(&mut self) -> Option<EntityId> {
        let displayed: Vec<EntityId> = self
            .engine
            .apply(&self.filter, &self.preferences.locale)
            .into_iter()
            .map(|r| r.id)
            .collect();
        let drawn = self.selection.choose_random(displayed, &mut self.rng);
        if drawn.is_none() {
            tracing::debug!("random pick skipped: no eligible records");
        }
        drawn
    }

    /// Clear disabled ids and the choice, and return the filter to
    /// all-ignoring. Preferences are kept.
    pub fn reset(&mut self) {
        self.selection.reset();
        self.filter.reset();
    }
}
