//! Ordered per-category record storage.

use crate::item::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header click cycle: ascending -> descending -> unsorted.
    pub fn cycle(current: Option<SortDirection>) -> Option<SortDirection> {
        match current {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        }
    }
}

/// Insertion-ordered records of one category. Ids are unique.
#[derive(Debug, Clone)]
pub struct ItemStore<T> {
    items: Vec<T>,
}

impl<T> Default for ItemStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> ItemStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Returns it back if the id is already taken.
    pub(crate) fn add(&mut self, item: T) -> Result<(), T> {
        if self.contains(item.id()) {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<T> {
        let idx = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(idx))
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Stable in-place sort on one field.
    pub fn sort_by(&mut self, field: T::SortField, direction: SortDirection) {
        self.items.sort_by(|a, b| {
            let ord = a.sort_key(field).compare(&b.sort_key(field));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    /// Lazy view over the current contents; call again to restart.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.id())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: Record> IntoIterator for &'a ItemStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{BlurField, BlurItem};

    fn blur(id: &str, score: f64, size: &str) -> BlurItem {
        BlurItem::new(id, format!("/photos/{id}.jpg"), score).with_size(size)
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = ItemStore::new();
        assert!(store.add(blur("b1", 10.0, "1 MB")).is_ok());
        let rejected = store.add(blur("b1", 20.0, "2 MB")).unwrap_err();
        assert_eq!(rejected.blur_score, 20.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b1").unwrap().blur_score, 10.0);
    }

    #[test]
    fn test_sort_by_huge_resolution() {
        let mut store = ItemStore::new();
        let mut huge = blur("huge", 10.0, "1 MB");
        huge.resolution = Some("4294967296x4294967296".to_string());
        let mut hd = blur("hd", 10.0, "1 MB");
        hd.resolution = Some("1920x1080".to_string());
        store.add(hd).unwrap();
        store.add(huge).unwrap();

        store.sort_by(BlurField::Resolution, SortDirection::Ascending);
        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["huge", "hd"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store: ItemStore<BlurItem> = ItemStore::new();
        assert!(store.remove("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_sort_is_stable() {
        let mut store = ItemStore::new();
        store.add(blur("first", 50.0, "1 MB")).unwrap();
        store.add(blur("second", 90.0, "1 MB")).unwrap();
        store.add(blur("third", 50.0, "1 MB")).unwrap();

        store.sort_by(BlurField::BlurScore, SortDirection::Ascending);
        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["first", "third", "second"]);

        store.sort_by(BlurField::FileSize, SortDirection::Descending);
        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["first", "third", "second"]);
    }

    #[test]
    fn test_sort_by_size_uses_numeric_order() {
        let mut store = ItemStore::new();
        store.add(blur("big", 1.0, "900 KB")).unwrap();
        store.add(blur("huge", 1.0, "2 GB")).unwrap();
        store.add(blur("small", 1.0, "10 MB")).unwrap();
        store.sort_by(BlurField::FileSize, SortDirection::Descending);
        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["huge", "small", "big"]);
    }

    #[test]
    fn test_iter_reflects_current_contents() {
        let mut store = ItemStore::new();
        store.add(blur("a", 1.0, "1 MB")).unwrap();
        assert_eq!(store.iter().count(), 1);
        store.add(blur("b", 1.0, "1 MB")).unwrap();
        assert_eq!(store.iter().count(), 2);
    }

    #[test]
    fn test_sort_direction_cycle() {
        let asc = SortDirection::cycle(None);
        assert_eq!(asc, Some(SortDirection::Ascending));
        let desc = SortDirection::cycle(asc);
        assert_eq!(desc, Some(SortDirection::Descending));
        assert_eq!(SortDirection::cycle(desc), None);
    }
}
