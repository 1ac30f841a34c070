//! In-memory record store
//!
//! Holds every accepted entry together with one sort index per field, the
//! status groups and the review ledger. The store is filled once by the
//! ingestion pipeline and only read afterwards.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Entry, EntryId, RejectReason, RequirementKey, ReviewLine, SortKey};

/// Ids kept in ascending order of their comparison values
///
/// Both sequences are mutated together by [`SortIndex::insert`] only, so they
/// always have the same length.
#[derive(Debug, Clone)]
pub struct SortIndex<V> {
    ids: Vec<EntryId>,
    values: Vec<V>,
}

impl<V> Default for SortIndex<V> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<V: PartialOrd> SortIndex<V> {
    /// Inserts at the leftmost position among equal values.
    ///
    /// A newly inserted id therefore precedes every previously inserted id
    /// with an equal value.
    pub fn insert(&mut self, id: EntryId, value: V) -> usize {
        let position = self.values.partition_point(|existing| *existing < value);
        self.values.insert(position, value);
        self.ids.insert(position, id);
        position
    }
}

impl<V> SortIndex<V> {
    pub fn ids(&self) -> &[EntryId] {
        &self.ids
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &V)> + '_ {
        self.ids.iter().copied().zip(self.values.iter())
    }
}

/// Ids sharing one status value, in insertion order
#[derive(Debug, Clone)]
pub struct StatusGroup {
    pub status: String,
    pub ids: Vec<EntryId>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    entries: BTreeMap<EntryId, Entry>,
    by_requirement: SortIndex<RequirementKey>,
    by_test_case: SortIndex<String>,
    by_duration: SortIndex<f64>,
    by_status: SortIndex<String>,
    status_groups: Vec<StatusGroup>,
    status_positions: HashMap<String, usize>,
    review_lines: Vec<ReviewLine>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry under `id` and updates every index.
    ///
    /// Ids are write-once: returns `false` and leaves the store untouched
    /// when `id` is already present.
    pub fn add_entry(&mut self, id: EntryId, entry: Entry) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }

        self.by_requirement
            .insert(id, RequirementKey::from_requirement(&entry.requirement));
        self.by_test_case.insert(id, entry.test_case.clone());
        self.by_duration.insert(id, entry.duration);
        self.by_status.insert(id, entry.status.clone());

        match self.status_positions.get(&entry.status) {
            Some(&position) => self.status_groups[position].ids.push(id),
            None => {
                self.status_positions
                    .insert(entry.status.clone(), self.status_groups.len());
                self.status_groups.push(StatusGroup {
                    status: entry.status.clone(),
                    ids: vec![id],
                });
            }
        }

        self.entries.insert(id, entry);
        true
    }

    /// Records a skipped line in the review ledger
    pub fn add_review_line(&mut self, line_number: usize, reason: RejectReason) {
        self.review_lines.push(ReviewLine {
            line_number,
            reason,
        });
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    /// Entries in id order
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &Entry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Pre-built id order for `key`
    pub fn sorted_ids(&self, key: SortKey) -> &[EntryId] {
        match key {
            SortKey::Requirement => self.by_requirement.ids(),
            SortKey::TestCase => self.by_test_case.ids(),
            SortKey::Duration => self.by_duration.ids(),
            SortKey::Status => self.by_status.ids(),
        }
    }

    pub fn requirement_index(&self) -> &SortIndex<RequirementKey> {
        &self.by_requirement
    }

    pub fn test_case_index(&self) -> &SortIndex<String> {
        &self.by_test_case
    }

    pub fn duration_index(&self) -> &SortIndex<f64> {
        &self.by_duration
    }

    pub fn status_index(&self) -> &SortIndex<String> {
        &self.by_status
    }

    /// Status buckets in the order each status was first seen
    pub fn status_groups(&self) -> &[StatusGroup] {
        &self.status_groups
    }

    pub fn status_group(&self, status: &str) -> Option<&[EntryId]> {
        self.status_positions
            .get(status)
            .map(|&position| self.status_groups[position].ids.as_slice())
    }

    pub fn review_lines(&self) -> &[ReviewLine] {
        &self.review_lines
    }
}
