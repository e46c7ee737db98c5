//! Row filters for the result tables.
//!
//! Filters only decide which rows are shown. Selection and totals always
//! cover the whole store.

use crate::category::Category;
use crate::item::{BlurItem, ErrorItem, SimilarPairItem};
use crate::results::ResultSet;
use std::collections::BTreeSet;

/// Inclusive score range on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl ScoreRange {
    /// Clamped to 0-100; swapped bounds are put back in order.
    pub fn new(min: f64, max: f64) -> Self {
        let min = min.clamp(0.0, 100.0);
        let max = max.clamp(0.0, 100.0);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub blur_score: ScoreRange,
    pub similarity: ScoreRange,
    /// `None` shows every error type.
    pub error_type: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_blur_range(&mut self, min: f64, max: f64) {
        self.blur_score = ScoreRange::new(min, max);
    }

    pub fn set_similarity_range(&mut self, min: f64, max: f64) {
        self.similarity = ScoreRange::new(min, max);
    }

    /// An empty string means "all types".
    pub fn set_error_type(&mut self, error_type: Option<&str>) {
        self.error_type = error_type
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }

    pub fn reset(&mut self, category: Category) {
        match category {
            Category::Blur => self.blur_score = ScoreRange::default(),
            Category::Similar => self.similarity = ScoreRange::default(),
            Category::Error => self.error_type = None,
        }
    }

    pub fn is_active(&self, category: Category) -> bool {
        match category {
            Category::Blur => !self.blur_score.is_unbounded(),
            Category::Similar => !self.similarity.is_unbounded(),
            Category::Error => self.error_type.is_some(),
        }
    }

    pub fn matches_blur(&self, item: &BlurItem) -> bool {
        self.blur_score.contains(item.blur_score)
    }

    pub fn matches_pair(&self, pair: &SimilarPairItem) -> bool {
        self.similarity.contains(pair.similarity)
    }

    pub fn matches_error(&self, item: &ErrorItem) -> bool {
        match &self.error_type {
            Some(wanted) => item.error_type == *wanted,
            None => true,
        }
    }
}

impl ResultSet {
    /// Ids of the rows that pass `filters`, in store order.
    pub fn visible(&self, category: Category, filters: &FilterState) -> Vec<&str> {
        match category {
            Category::Blur => self
                .blur()
                .iter()
                .filter(|item| filters.matches_blur(item))
                .map(|item| item.id.as_str())
                .collect(),
            Category::Similar => self
                .similar()
                .iter()
                .filter(|pair| filters.matches_pair(pair))
                .map(|pair| pair.id.as_str())
                .collect(),
            Category::Error => self
                .errors()
                .iter()
                .filter(|item| filters.matches_error(item))
                .map(|item| item.id.as_str())
                .collect(),
        }
    }

    /// Distinct error types for the filter drop-down, sorted.
    pub fn error_types(&self) -> Vec<&str> {
        self.errors()
            .iter()
            .map(|item| item.error_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PairFile;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new();
        set.add(BlurItem::new("b1", "/p/1.jpg", 95.0)).unwrap();
        set.add(BlurItem::new("b2", "/p/2.jpg", 40.0)).unwrap();
        set.add(SimilarPairItem::new(
            "s1",
            PairFile::new("/p/a.jpg"),
            PairFile::new("/p/b.jpg"),
            98.0,
        ))
        .unwrap();
        set.add(ErrorItem::new("e1", "/p/x.jpg", "File is corrupted"))
            .unwrap();
        set.add(ErrorItem::new("e2", "/p/y.jpg", "Unsupported format"))
            .unwrap();
        set
    }

    #[test]
    fn test_default_shows_everything() {
        let set = sample();
        let filters = FilterState::new();
        assert_eq!(set.visible(Category::Blur, &filters), vec!["b1", "b2"]);
        assert_eq!(set.visible(Category::Error, &filters).len(), 2);
        assert!(!filters.is_active(Category::Blur));
    }

    #[test]
    fn test_blur_range_hides_rows_but_keeps_selection() {
        let mut set = sample();
        set.select_all(Category::Blur);
        let mut filters = FilterState::new();
        filters.set_blur_range(50.0, 100.0);

        assert_eq!(set.visible(Category::Blur, &filters), vec!["b1"]);
        assert_eq!(set.aggregate().selected_count(Category::Blur), 2);

        filters.reset(Category::Blur);
        assert_eq!(set.visible(Category::Blur, &filters).len(), 2);
    }

    #[test]
    fn test_range_is_normalized() {
        let range = ScoreRange::new(120.0, -5.0);
        assert_eq!(range, ScoreRange::default());
        let swapped = ScoreRange::new(80.0, 20.0);
        assert_eq!(swapped.min, 20.0);
        assert_eq!(swapped.max, 80.0);
    }

    #[test]
    fn test_error_type_filter() {
        let set = sample();
        let mut filters = FilterState::new();
        filters.set_error_type(Some("Unsupported format"));
        assert_eq!(set.visible(Category::Error, &filters), vec!["e2"]);
        filters.set_error_type(Some(""));
        assert!(filters.error_type.is_none());
        assert_eq!(
            set.error_types(),
            vec!["File is corrupted", "Unsupported format"]
        );
    }

    #[test]
    fn test_similarity_range() {
        let set = sample();
        let mut filters = FilterState::new();
        filters.set_similarity_range(0.0, 90.0);
        assert!(set.visible(Category::Similar, &filters).is_empty());
        assert!(filters.is_active(Category::Similar));
    }
}
