//! The three result categories and their selection state.
//!
//! `ResultSet` is the only way to mutate stores and ledger together, which is
//! what keeps selection free of dangling ids: every removal purges the ledger
//! in the same `&mut self` call.

use crate::aggregate::Aggregator;
use crate::category::Category;
use crate::error::{CleanupError, Result};
use crate::item::{BlurItem, ErrorItem, ItemRecord, PairSide, RecommendedSide, SimilarPairItem};
use crate::scan::ScanResults;
use crate::selection::SelectionLedger;
use crate::store::ItemStore;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    blur: ItemStore<BlurItem>,
    similar: ItemStore<SimilarPairItem>,
    errors: ItemStore<ErrorItem>,
    ledger: SelectionLedger,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh result set from a completed scan. Fails without side
    /// effects if the scan reported duplicate ids or a degenerate pair.
    pub fn from_scan(results: ScanResults) -> Result<Self> {
        let mut set = Self::new();
        for item in results.blur {
            set.add(item)?;
        }
        for item in results.similar {
            set.add(item)?;
        }
        for item in results.error {
            set.add(item)?;
        }
        Ok(set)
    }

    pub fn blur(&self) -> &ItemStore<BlurItem> {
        &self.blur
    }

    pub fn similar(&self) -> &ItemStore<SimilarPairItem> {
        &self.similar
    }

    pub fn errors(&self) -> &ItemStore<ErrorItem> {
        &self.errors
    }

    /// Mutable access for sorting. Stores only expose `sort_by` publicly.
    pub fn blur_mut(&mut self) -> &mut ItemStore<BlurItem> {
        &mut self.blur
    }

    pub fn similar_mut(&mut self) -> &mut ItemStore<SimilarPairItem> {
        &mut self.similar
    }

    pub fn errors_mut(&mut self) -> &mut ItemStore<ErrorItem> {
        &mut self.errors
    }

    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    pub fn aggregate(&self) -> Aggregator<'_> {
        Aggregator::new(self)
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Blur => self.blur.len(),
            Category::Similar => self.similar.len(),
            Category::Error => self.errors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|&c| self.len(c) == 0)
    }

    pub fn contains(&self, category: Category, id: &str) -> bool {
        match category {
            Category::Blur => self.blur.contains(id),
            Category::Similar => self.similar.contains(id),
            Category::Error => self.errors.contains(id),
        }
    }

    fn require(&self, category: Category, id: &str) -> Result<()> {
        if self.contains(category, id) {
            Ok(())
        } else {
            Err(CleanupError::UnknownIdentity {
                category,
                id: id.to_string(),
            })
        }
    }

    /// Append a record to its category.
    pub fn add(&mut self, record: impl Into<ItemRecord>) -> Result<()> {
        let record = record.into();
        let category = record.category();
        let duplicate = |id: String| CleanupError::DuplicateIdentity { category, id };

        match record {
            ItemRecord::Blur(item) => self.blur.add(item).map_err(|item| duplicate(item.id)),
            ItemRecord::Similar(item) => {
                if !item.has_distinct_paths() {
                    return Err(CleanupError::SamePairPaths {
                        path: item.a.file_path.display().to_string(),
                        id: item.id,
                    });
                }
                self.similar.add(item).map_err(|item| duplicate(item.id))
            }
            ItemRecord::Error(item) => self.errors.add(item).map_err(|item| duplicate(item.id)),
        }
    }

    /// Remove a record and its selection. Absent ids are ignored.
    pub fn remove(&mut self, category: Category, id: &str) -> Option<ItemRecord> {
        // Purge first so a selection can never outlive its record.
        self.ledger.purge(category, id);
        match category {
            Category::Blur => self.blur.remove(id).map(ItemRecord::Blur),
            Category::Similar => self.similar.remove(id).map(ItemRecord::Similar),
            Category::Error => self.errors.remove(id).map(ItemRecord::Error),
        }
    }

    pub fn clear(&mut self, category: Category) {
        self.ledger.clear(category);
        match category {
            Category::Blur => self.blur.clear(),
            Category::Similar => self.similar.clear(),
            Category::Error => self.errors.clear(),
        }
    }

    pub fn clear_all(&mut self) {
        for category in Category::ALL {
            self.clear(category);
        }
    }

    pub fn set_selected(&mut self, category: Category, id: &str, selected: bool) -> Result<()> {
        self.require(category, id)?;
        self.ledger.set_selected(category, id, selected);
        Ok(())
    }

    pub fn set_pair_selected(&mut self, id: &str, selected: bool) -> Result<()> {
        self.set_selected(Category::Similar, id, selected)
    }

    pub fn set_pair_side_selected(&mut self, id: &str, side: PairSide, selected: bool) -> Result<()> {
        self.require(Category::Similar, id)?;
        self.ledger.set_pair_side_selected(id, side, selected);
        Ok(())
    }

    pub fn is_selected(&self, category: Category, id: &str) -> bool {
        self.ledger.is_selected(category, id)
    }

    pub fn is_pair_side_selected(&self, id: &str, side: PairSide) -> bool {
        self.ledger.is_pair_side_selected(id, side)
    }

    /// Row checkbox click: deselect when fully selected, select otherwise.
    pub fn toggle(&mut self, category: Category, id: &str) -> Result<bool> {
        self.require(category, id)?;
        let fully_selected = match category {
            Category::Similar => self.ledger.is_pair_fully_selected(id),
            _ => self.ledger.is_selected(category, id),
        };
        self.ledger.set_selected(category, id, !fully_selected);
        Ok(!fully_selected)
    }

    pub fn select_all(&mut self, category: Category) {
        self.set_all(category, true);
    }

    pub fn deselect_all(&mut self, category: Category) {
        self.set_all(category, false);
    }

    fn set_all(&mut self, category: Category, selected: bool) {
        let ids: Vec<String> = match category {
            Category::Blur => self.blur.ids().map(str::to_string).collect(),
            Category::Similar => self.similar.ids().map(str::to_string).collect(),
            Category::Error => self.errors.ids().map(str::to_string).collect(),
        };
        self.ledger
            .set_many(category, ids.iter().map(String::as_str), selected);
    }

    /// Pre-check side B of every pair, unless B is the recommended file.
    /// Side A is never pre-checked.
    pub fn preselect_recommended(&mut self) {
        let picks: Vec<String> = self
            .similar
            .iter()
            .filter(|pair| pair.recommended != RecommendedSide::B)
            .map(|pair| pair.id.clone())
            .collect();
        for id in picks {
            self.ledger.set_pair_side_selected(&id, PairSide::B, true);
        }
    }

    /// Drop every blur item and every pair that references one of `paths`.
    /// Returns the number of rows removed.
    pub fn remove_paths(&mut self, paths: &HashSet<PathBuf>) -> usize {
        let blur_ids: Vec<String> = self
            .blur
            .iter()
            .filter(|item| paths.contains(&item.file_path))
            .map(|item| item.id.clone())
            .collect();
        let pair_ids: Vec<String> = self
            .similar
            .iter()
            .filter(|pair| paths.contains(&pair.a.file_path) || paths.contains(&pair.b.file_path))
            .map(|pair| pair.id.clone())
            .collect();

        for id in &blur_ids {
            self.remove(Category::Blur, id);
        }
        for id in &pair_ids {
            self.remove(Category::Similar, id);
        }
        blur_ids.len() + pair_ids.len()
    }

    /// Remove the selected rows of one category. Returns the removed ids.
    pub fn remove_selected(&mut self, category: Category) -> Vec<String> {
        let ids: Vec<String> = self
            .ledger
            .selected_ids(category)
            .map(str::to_string)
            .collect();
        for id in &ids {
            self.remove(category, id);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PairFile;

    fn pair(id: &str, a: &str, b: &str) -> SimilarPairItem {
        SimilarPairItem::new(
            id,
            PairFile::new(a).with_size("1 MB"),
            PairFile::new(b).with_size("1 MB"),
            95.0,
        )
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut set = ResultSet::new();
        set.add(BlurItem::new("b1", "/p/1.jpg", 80.0)).unwrap();
        let err = set.add(BlurItem::new("b1", "/p/2.jpg", 80.0)).unwrap_err();
        assert!(matches!(err, CleanupError::DuplicateIdentity { category: Category::Blur, .. }));
        assert_eq!(set.len(Category::Blur), 1);
    }

    #[test]
    fn test_same_id_allowed_across_categories() {
        let mut set = ResultSet::new();
        set.add(BlurItem::new("x", "/p/1.jpg", 80.0)).unwrap();
        set.add(ErrorItem::new("x", "/p/1.jpg", "corrupted")).unwrap();
        assert_eq!(set.len(Category::Blur), 1);
        assert_eq!(set.len(Category::Error), 1);
    }

    #[test]
    fn test_pair_with_same_paths_rejected() {
        let mut set = ResultSet::new();
        let err = set.add(pair("s1", "/p/a.jpg", "/p/a.jpg")).unwrap_err();
        assert!(matches!(err, CleanupError::SamePairPaths { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_purges_selection() {
        let mut set = ResultSet::new();
        set.add(pair("s1", "/p/a.jpg", "/p/b.jpg")).unwrap();
        set.set_pair_selected("s1", true).unwrap();
        assert!(set.remove(Category::Similar, "s1").is_some());
        assert!(!set.is_pair_side_selected("s1", PairSide::A));
        assert!(!set.is_pair_side_selected("s1", PairSide::B));
        assert_eq!(set.ledger().entry_count(), 0);
    }

    #[test]
    fn test_selecting_unknown_id_fails() {
        let mut set = ResultSet::new();
        let err = set.set_selected(Category::Blur, "ghost", true).unwrap_err();
        assert!(matches!(err, CleanupError::UnknownIdentity { .. }));
        assert_eq!(set.ledger().entry_count(), 0);
    }

    #[test]
    fn test_toggle_pair_row() {
        let mut set = ResultSet::new();
        set.add(pair("s1", "/p/a.jpg", "/p/b.jpg")).unwrap();
        set.set_pair_side_selected("s1", PairSide::A, true).unwrap();
        // Partially selected row becomes fully selected.
        assert!(set.toggle(Category::Similar, "s1").unwrap());
        assert!(set.is_pair_side_selected("s1", PairSide::B));
        assert!(!set.toggle(Category::Similar, "s1").unwrap());
        assert!(!set.is_selected(Category::Similar, "s1"));
    }

    #[test]
    fn test_preselect_recommended_checks_side_b_only() {
        let mut set = ResultSet::new();
        set.add(pair("s1", "/p/a.jpg", "/p/b.jpg").with_recommended(RecommendedSide::A))
            .unwrap();
        set.add(pair("s2", "/p/c.jpg", "/p/d.jpg").with_recommended(RecommendedSide::B))
            .unwrap();
        set.add(pair("s3", "/p/e.jpg", "/p/f.jpg")).unwrap();
        set.preselect_recommended();
        assert!(set.is_pair_side_selected("s1", PairSide::B));
        assert!(!set.is_pair_side_selected("s1", PairSide::A));
        // A recommended B leaves the pair unchecked.
        assert!(!set.is_pair_side_selected("s2", PairSide::A));
        assert!(!set.is_pair_side_selected("s2", PairSide::B));
        assert!(set.is_pair_side_selected("s3", PairSide::B));
        assert!(!set.is_pair_side_selected("s3", PairSide::A));
    }

    #[test]
    fn test_remove_paths_drops_blur_and_pairs() {
        let mut set = ResultSet::new();
        set.add(BlurItem::new("b1", "/p/a.jpg", 90.0)).unwrap();
        set.add(BlurItem::new("b2", "/p/z.jpg", 90.0)).unwrap();
        set.add(pair("s1", "/p/a.jpg", "/p/b.jpg")).unwrap();
        set.add(pair("s2", "/p/c.jpg", "/p/d.jpg")).unwrap();
        set.select_all(Category::Blur);

        let paths: HashSet<PathBuf> = [PathBuf::from("/p/a.jpg")].into_iter().collect();
        assert_eq!(set.remove_paths(&paths), 2);
        assert!(!set.contains(Category::Blur, "b1"));
        assert!(set.contains(Category::Blur, "b2"));
        assert!(!set.contains(Category::Similar, "s1"));
        assert!(set.contains(Category::Similar, "s2"));
        assert!(!set.is_selected(Category::Blur, "b1"));
        assert!(set.is_selected(Category::Blur, "b2"));
    }

    #[test]
    fn test_from_scan_is_all_or_nothing() {
        let results = ScanResults {
            blur: vec![
                BlurItem::new("b1", "/p/1.jpg", 1.0),
                BlurItem::new("b1", "/p/2.jpg", 1.0),
            ],
            ..Default::default()
        };
        assert!(ResultSet::from_scan(results).is_err());
    }
}
