use std::{collections::HashSet, hash::Hash};

/// Multi-select state of a list, keyed by item.
///
/// Selection mode is active while at least one item is selected. Clearing
/// the selection leaves selection mode.
#[derive(Debug, Clone)]
pub struct Selection<K> {
    selected: HashSet<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }
}

impl<K> Selection<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `false` if `key` was already selected.
    pub fn select(&mut self, key: K) -> bool {
        self.selected.insert(key)
    }

    /// Returns `false` if `key` was not selected.
    pub fn unselect(&mut self, key: &K) -> bool {
        self.selected.remove(key)
    }

    /// Flips `key` and returns whether it is now selected.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    pub fn select_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.selected.extend(keys);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_all_selected(&self, total: usize) -> bool {
        total > 0 && self.selected.len() == total
    }

    /// Drops keys that are no longer in `keys`, e.g. after the list reloads.
    pub fn retain_present<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let present: HashSet<&K> = keys.into_iter().collect();
        self.selected.retain(|key| present.contains(key));
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_enters_and_leaves_selection_mode() {
        let mut selection = Selection::new();
        assert!(!selection.is_active());
        assert!(selection.toggle(3));
        assert!(selection.is_active());
        assert!(!selection.toggle(3));
        assert!(!selection.is_active());
    }

    #[test]
    fn select_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.select("a"));
        assert!(!selection.select("a"));
        assert_eq!(selection.len(), 1);
        assert!(selection.unselect(&"a"));
        assert!(!selection.unselect(&"a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_then_clear() {
        let mut selection = Selection::new();
        selection.select_all(0..4);
        assert!(selection.is_all_selected(4));
        assert!(!selection.is_all_selected(5));
        selection.clear();
        assert!(!selection.is_all_selected(4));
        assert!(!selection.is_active());
    }

    #[test]
    fn retain_present_drops_stale_keys() {
        let mut selection = Selection::new();
        selection.select_all([1, 2, 3]);
        selection.retain_present(&[2, 3, 4]);
        assert!(!selection.is_selected(&1));
        assert!(selection.is_selected(&2));
        assert_eq!(selection.len(), 2);
    }
}
