use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Set of selected instrument field ids.
///
/// Field ids are arbitrary `u32`s, so membership is sparse. Iteration yields
/// ids in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct SelectedFields {
    ids: BTreeSet<u32>,
}

impl SelectedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, field_id: u32) -> bool {
        self.ids.contains(&field_id)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, field_id: u32) -> bool {
        self.ids.insert(field_id)
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, field_id: u32) -> bool {
        self.ids.remove(&field_id)
    }

    /// Flips membership of `field_id`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, field_id: u32) -> bool {
        if self.remove(field_id) {
            false
        } else {
            self.insert(field_id)
        }
    }

    /// Copy of the set with `field_id` flipped.
    pub fn toggled(&self, field_id: u32) -> Self {
        let mut out = self.clone();
        out.toggle(field_id);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl From<Vec<u32>> for SelectedFields {
    fn from(ids: Vec<u32>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<SelectedFields> for Vec<u32> {
    fn from(s: SelectedFields) -> Self {
        s.to_vec()
    }
}

/// Highlight state of observation footprints, keyed by observation key.
///
/// Owned by the renderer; `revision` advances on every toggle so the redraw
/// observer sees local changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationSelection {
    highlighted: BTreeMap<String, bool>,
    revision: u64,
}

impl ObservationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self, key: &str) -> bool {
        self.highlighted.get(key).copied().unwrap_or(false)
    }

    /// Flips the highlight of `key`; returns the new state.
    pub fn toggle(&mut self, key: &str) -> bool {
        let slot = self.highlighted.entry(key.to_string()).or_insert(false);
        *slot = !*slot;
        self.revision += 1;
        *slot
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drops every highlight. Bumps the revision only when something was
    /// highlighted.
    pub fn clear(&mut self) {
        if !self.highlighted.is_empty() {
            self.highlighted.clear();
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ObservationSelection, SelectedFields};
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_remove_contains_and_len() {
        let mut s = SelectedFields::new();
        assert!(s.is_empty());
        assert!(!s.contains(1));

        assert!(s.insert(1));
        assert!(s.contains(1));
        assert_eq!(s.len(), 1);
        assert!(!s.insert(1));
        assert_eq!(s.len(), 1);

        assert!(s.remove(1));
        assert!(!s.contains(1));
        assert_eq!(s.len(), 0);
        assert!(!s.remove(1));
    }

    #[test]
    fn iter_is_sorted() {
        let s = SelectedFields::from_ids([10, 2, 65]);
        assert_eq!(s.to_vec(), vec![2, 10, 65]);
    }

    #[test]
    fn double_toggle_restores_original() {
        let original = SelectedFields::from_ids([3, 700]);
        let once = original.toggled(1200);
        assert!(once.contains(1200));
        let twice = once.toggled(1200);
        assert_eq!(twice, original);

        let removed = original.toggled(3);
        assert_eq!(removed.to_vec(), vec![700]);
        assert_eq!(removed.toggled(3), original);
    }

    #[test]
    fn large_ids_stay_sparse() {
        let s = SelectedFields::from_ids([4_000_000_000, 7]);
        assert_eq!(s.len(), 2);
        assert!(s.contains(4_000_000_000));
        assert_eq!(s.to_vec(), vec![7, 4_000_000_000]);
        assert_eq!(s.toggled(4_000_000_000).toggled(u32::MAX).to_vec(), vec![7, u32::MAX]);
    }

    #[test]
    fn serializes_as_id_list() {
        let s = SelectedFields::from_ids([5, 1]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[1,5]");
        let back: SelectedFields = serde_json::from_str("[5,1,5]").unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn observation_highlights_toggle_and_bump_revision() {
        let mut obs = ObservationSelection::new();
        assert!(!obs.is_highlighted("42"));
        assert!(obs.toggle("42"));
        assert!(obs.is_highlighted("42"));
        assert_eq!(obs.revision(), 1);
        assert!(!obs.toggle("42"));
        assert_eq!(obs.revision(), 2);
        obs.toggle("7");
        obs.clear();
        assert_eq!(obs.revision(), 4);
        assert!(!obs.is_highlighted("7"));
        obs.clear();
        assert_eq!(obs.revision(), 4);
    }
}
