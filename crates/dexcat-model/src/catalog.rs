//! The frozen catalog.
//!
//! A [`Catalog`] is produced exactly once, at the end of ingestion, and is
//! shared read-only for the rest of the session. Cloning it is an `Arc` bump.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::{EntityId, EntityRecord};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Arc<[EntityRecord]>,
}

impl Catalog {
    /// Sort `records` ascending by id and freeze them.
    ///
    /// Ids are unique in a catalog; if the input repeats an id, the first
    /// occurrence in input order is kept.
    pub fn from_records(mut records: Vec<EntityRecord>) -> Self {
        records.sort_by_key(|r| r.id);
        records.dedup_by_key(|r| r.id);
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.position(id).map(|pos| &self.records[pos])
    }

    /// Index of `id` in the sorted record slice.
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.records.binary_search_by_key(&id, |r| r.id).ok()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.records.iter().map(|r| r.id)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a EntityRecord;
    type IntoIter = std::slice::Iter<'a, EntityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records().serialize(serializer)
    }
}
