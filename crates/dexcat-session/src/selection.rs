//! Disabled entries and the single chosen entry.

use std::collections::BTreeSet;

use dexcat_model::EntityId;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    disabled_ids: BTreeSet<EntityId>,
    chosen_id: Option<EntityId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled_ids(&self) -> &BTreeSet<EntityId> {
        &self.disabled_ids
    }

    pub fn is_disabled(&self, id: EntityId) -> bool {
        self.disabled_ids.contains(&id)
    }

    pub fn chosen_id(&self) -> Option<EntityId> {
        self.chosen_id
    }

    /// Flip `id` in or out of the disabled set. Returns whether it is now
    /// disabled.
    pub fn toggle_disabled(&mut self, id: EntityId) -> bool {
        if self.disabled_ids.remove(&id) {
            false
        } else {
            self.disabled_ids.insert(id);
            true
        }
    }

    /// Choose `id`, or un-choose it if it is already the chosen one.
    /// Returns the chosen id afterwards.
    pub fn choose(&mut self, id: EntityId) -> Option<EntityId> {
        self.chosen_id = if self.chosen_id == Some(id) {
            None
        } else {
            Some(id)
        };
        self.chosen_id
    }

    /// Draw uniformly from `displayed` minus the disabled ids and feed the
    /// draw to [`choose`](Self::choose).
    ///
    /// Returns the drawn id. With nothing eligible, returns `None` and leaves
    /// the current choice untouched.
    pub fn choose_random<R>(
        &mut self,
        displayed: impl IntoIterator<Item = EntityId>,
        rng: &mut R,
    ) -> Option<EntityId>
    where
        R: Rng + ?Sized,
    {
        let eligible: Vec<EntityId> = displayed
            .into_iter()
            .filter(|id| !self.disabled_ids.contains(id))
            .collect();
        let &drawn = eligible.choose(rng)?;
        self.choose(drawn);
        Some(drawn)
    }

    pub fn reset(&mut self) {
        self.disabled_ids.clear();
        self.chosen_id = None;
    }
}
