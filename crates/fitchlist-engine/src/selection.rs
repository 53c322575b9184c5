use fitchlist_types::RowKey;
use std::collections::BTreeSet;

/// Set of selected row keys.
///
/// Independent of the view state: searching, sorting, filtering and paging
/// leave it untouched, and keys are not checked against the loaded page.
/// Only an explicit clear empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keys: BTreeSet<RowKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, key: RowKey) {
        self.keys.insert(key);
    }

    pub fn deselect(&mut self, key: &RowKey) {
        self.keys.remove(key);
    }

    /// Flip a key's membership. Returns true when the key ends up selected.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Select every key of a page. If the whole page is already selected,
    /// deselect it instead (header checkbox behaviour).
    pub fn toggle_page<I>(&mut self, page_keys: I)
    where
        I: IntoIterator<Item = RowKey>,
    {
        let page_keys: Vec<RowKey> = page_keys.into_iter().collect();
        if !page_keys.is_empty() && page_keys.iter().all(|key| self.keys.contains(key)) {
            for key in &page_keys {
                self.keys.remove(key);
            }
        } else {
            self.keys.extend(page_keys);
        }
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.keys.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> Vec<RowKey> {
        self.keys.iter().cloned().collect()
    }
}
