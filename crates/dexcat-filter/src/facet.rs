//! Tri-state facet selectors.
//!
//! A selector stores at most one [`Polarity`] per value, in the order values
//! were first selected. A value that is absent is unselected. Because each
//! value has exactly one slot, "included and excluded at once" cannot be
//! represented.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Anything a facet can range over.
pub trait FacetValue: Copy + Eq + Hash + Ord + Debug {}

impl<T: Copy + Eq + Hash + Ord + Debug> FacetValue for T {}

/// Per-value state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    Unselected,
    Included,
    Excluded,
}

impl TriState {
    /// unselected → included → excluded → unselected
    pub fn next(self) -> Self {
        match self {
            TriState::Unselected => TriState::Included,
            TriState::Included => TriState::Excluded,
            TriState::Excluded => TriState::Unselected,
        }
    }
}

/// State of a value that is actively constraining its facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Included,
    Excluded,
}

impl From<Polarity> for TriState {
    fn from(p: Polarity) -> Self {
        match p {
            Polarity::Included => TriState::Included,
            Polarity::Excluded => TriState::Excluded,
        }
    }
}

/// Whether a facet allows several active values or only one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Multiple,
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "V: Serialize",
    deserialize = "V: Deserialize<'de> + FacetValue"
))]
pub struct FacetSelector<V: FacetValue> {
    entries: IndexMap<V, Polarity>,
    mode: SelectionMode,
}

impl<V: FacetValue> Default for FacetSelector<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            mode: SelectionMode::Multiple,
        }
    }
}

impl<V: FacetValue> FacetSelector<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, value: V) -> TriState {
        self.entries
            .get(&value)
            .map_or(TriState::Unselected, |&p| p.into())
    }

    /// Advance `value` one step around the cycle and return its new state.
    pub fn toggle(&mut self, value: V) -> TriState {
        let next = self.state(value).next();
        self.set(value, next);
        next
    }

    /// Put `value` into `state`.
    ///
    /// A value keeps its original selection position when it moves between
    /// included and excluded. In [`SelectionMode::Single`] activating a value
    /// deactivates every other one.
    pub fn set(&mut self, value: V, state: TriState) {
        let polarity = match state {
            TriState::Unselected => {
                self.entries.shift_remove(&value);
                return;
            }
            TriState::Included => Polarity::Included,
            TriState::Excluded => Polarity::Excluded,
        };
        if self.mode == SelectionMode::Single {
            self.entries.retain(|v, _| *v == value);
        }
        match self.entries.get_mut(&value) {
            Some(slot) => *slot = polarity,
            None => {
                self.entries.insert(value, polarity);
            }
        }
    }

    pub fn include(&mut self, value: V) {
        self.set(value, TriState::Included);
    }

    pub fn exclude(&mut self, value: V) {
        self.set(value, TriState::Excluded);
    }

    /// "All": stop constraining this facet.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch selection mode.
    ///
    /// Moving to [`SelectionMode::Single`] keeps one active value: the
    /// earliest-selected included value, or failing that the earliest-selected
    /// excluded value.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::Multiple || self.entries.len() <= 1 {
            return;
        }
        let keep = self
            .entries
            .iter()
            .find(|(_, p)| **p == Polarity::Included)
            .or_else(|| self.entries.first())
            .map(|(v, _)| *v);
        if let Some(keep) = keep {
            self.entries.retain(|v, _| *v == keep);
        }
    }

    /// Included values in selection order.
    pub fn included(&self) -> impl Iterator<Item = V> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| **p == Polarity::Included)
            .map(|(v, _)| *v)
    }

    /// Excluded values in selection order.
    pub fn excluded(&self) -> impl Iterator<Item = V> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| **p == Polarity::Excluded)
            .map(|(v, _)| *v)
    }

    pub fn has_included(&self) -> bool {
        self.included().next().is_some()
    }

    /// Both sets empty.
    pub fn is_ignored(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.entries.len()
    }

    /// Inclusion test: unconstrained when nothing is included, otherwise any
    /// (or, with `require_all`, every) included value must match.
    pub fn passes_inclusion(&self, require_all: bool, mut matches: impl FnMut(V) -> bool) -> bool {
        let mut included = self.included().peekable();
        if included.peek().is_none() {
            return true;
        }
        if require_all {
            included.all(&mut matches)
        } else {
            included.any(&mut matches)
        }
    }

    /// Exclusion test: no excluded value may match.
    pub fn passes_exclusion(&self, mut matches: impl FnMut(V) -> bool) -> bool {
        !self.excluded().any(&mut matches)
    }
}
