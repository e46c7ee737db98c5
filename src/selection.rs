//! Identity-keyed selection state.
//!
//! Blur and error rows are either selected or not. A similar pair carries two
//! independent checkboxes, one per file, and the row checkbox simply drives
//! both at once. The ledger stores ids only; whether an id still exists is
//! enforced by [`crate::results::ResultSet`].

use crate::category::Category;
use crate::item::PairSide;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SelectionLedger {
    blur: HashSet<String>,
    error: HashSet<String>,
    pair_a: HashSet<String>,
    pair_b: HashSet<String>,
    revision: u64,
}

impl SelectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped by every mutation, including no-op ones.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn side_set(&mut self, side: PairSide) -> &mut HashSet<String> {
        match side {
            PairSide::A => &mut self.pair_a,
            PairSide::B => &mut self.pair_b,
        }
    }

    fn toggle_in(set: &mut HashSet<String>, id: &str, selected: bool) {
        if selected {
            set.insert(id.to_string());
        } else {
            set.remove(id);
        }
    }

    /// Row selection. For [`Category::Similar`] this selects both sides.
    pub fn set_selected(&mut self, category: Category, id: &str, selected: bool) {
        match category {
            Category::Blur => Self::toggle_in(&mut self.blur, id, selected),
            Category::Error => Self::toggle_in(&mut self.error, id, selected),
            Category::Similar => {
                Self::toggle_in(&mut self.pair_a, id, selected);
                Self::toggle_in(&mut self.pair_b, id, selected);
            }
        }
        self.touch();
    }

    pub fn set_pair_selected(&mut self, id: &str, selected: bool) {
        self.set_selected(Category::Similar, id, selected);
    }

    pub fn set_pair_side_selected(&mut self, id: &str, side: PairSide, selected: bool) {
        Self::toggle_in(self.side_set(side), id, selected);
        self.touch();
    }

    /// For pairs, a row counts as selected when either side is.
    pub fn is_selected(&self, category: Category, id: &str) -> bool {
        match category {
            Category::Blur => self.blur.contains(id),
            Category::Error => self.error.contains(id),
            Category::Similar => self.pair_a.contains(id) || self.pair_b.contains(id),
        }
    }

    pub fn is_pair_side_selected(&self, id: &str, side: PairSide) -> bool {
        match side {
            PairSide::A => self.pair_a.contains(id),
            PairSide::B => self.pair_b.contains(id),
        }
    }

    /// Both sides of a pair selected.
    pub fn is_pair_fully_selected(&self, id: &str) -> bool {
        self.pair_a.contains(id) && self.pair_b.contains(id)
    }

    /// Bulk-set every id in `ids`.
    pub fn set_many<'a>(
        &mut self,
        category: Category,
        ids: impl IntoIterator<Item = &'a str>,
        selected: bool,
    ) {
        for id in ids {
            match category {
                Category::Blur => Self::toggle_in(&mut self.blur, id, selected),
                Category::Error => Self::toggle_in(&mut self.error, id, selected),
                Category::Similar => {
                    Self::toggle_in(&mut self.pair_a, id, selected);
                    Self::toggle_in(&mut self.pair_b, id, selected);
                }
            }
        }
        self.touch();
    }

    /// Drop every entry for `id` in `category`.
    pub fn purge(&mut self, category: Category, id: &str) {
        match category {
            Category::Blur => {
                self.blur.remove(id);
            }
            Category::Error => {
                self.error.remove(id);
            }
            Category::Similar => {
                self.pair_a.remove(id);
                self.pair_b.remove(id);
            }
        }
        self.touch();
    }

    pub fn clear(&mut self, category: Category) {
        match category {
            Category::Blur => self.blur.clear(),
            Category::Error => self.error.clear(),
            Category::Similar => {
                self.pair_a.clear();
                self.pair_b.clear();
            }
        }
        self.touch();
    }

    /// Selected row ids of a blur or error category (unordered).
    pub fn selected_ids(&self, category: Category) -> impl Iterator<Item = &str> + '_ {
        let (first, second): (&HashSet<String>, Option<&HashSet<String>>) = match category {
            Category::Blur => (&self.blur, None),
            Category::Error => (&self.error, None),
            Category::Similar => (&self.pair_a, Some(&self.pair_b)),
        };
        first.iter().map(String::as_str).chain(
            second
                .into_iter()
                .flat_map(|set| set.iter())
                .filter(move |id| !first.contains(*id))
                .map(String::as_str),
        )
    }

    /// Number of entries held across all sets, used to check for leaks.
    pub fn entry_count(&self) -> usize {
        self.blur.len() + self.error.len() + self.pair_a.len() + self.pair_b.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_row_selection_sets_both_sides() {
        let mut ledger = SelectionLedger::new();
        ledger.set_pair_selected("s1", true);
        assert!(ledger.is_pair_side_selected("s1", PairSide::A));
        assert!(ledger.is_pair_side_selected("s1", PairSide::B));

        ledger.set_pair_side_selected("s1", PairSide::B, false);
        assert!(ledger.is_pair_side_selected("s1", PairSide::A));
        assert!(!ledger.is_pair_side_selected("s1", PairSide::B));
        assert!(ledger.is_selected(Category::Similar, "s1"));
    }

    #[test]
    fn test_categories_are_independent_namespaces() {
        let mut ledger = SelectionLedger::new();
        ledger.set_selected(Category::Blur, "x", true);
        assert!(ledger.is_selected(Category::Blur, "x"));
        assert!(!ledger.is_selected(Category::Error, "x"));
        assert!(!ledger.is_selected(Category::Similar, "x"));
    }

    #[test]
    fn test_purge_removes_both_sides() {
        let mut ledger = SelectionLedger::new();
        ledger.set_pair_side_selected("s1", PairSide::A, true);
        ledger.set_pair_side_selected("s1", PairSide::B, true);
        ledger.purge(Category::Similar, "s1");
        assert!(!ledger.is_pair_side_selected("s1", PairSide::A));
        assert!(!ledger.is_pair_side_selected("s1", PairSide::B));
        assert_eq!(ledger.entry_count(), 0);
    }

    #[test]
    fn test_selected_ids_for_pairs_are_unique() {
        let mut ledger = SelectionLedger::new();
        ledger.set_pair_selected("s1", true);
        ledger.set_pair_side_selected("s2", PairSide::B, true);
        let mut ids: Vec<&str> = ledger.selected_ids(Category::Similar).collect();
        ids.sort();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[test]
    fn test_revision_advances_on_mutation() {
        let mut ledger = SelectionLedger::new();
        let before = ledger.revision();
        ledger.set_selected(Category::Blur, "b1", true);
        assert!(ledger.revision() > before);
    }
}
