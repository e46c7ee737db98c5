//! Selected counts and sizes, recomputed from the stores on every query.
//!
//! Nothing is cached: each figure is a pure function of the current
//! [`ResultSet`], so it can never drift from the ledger.

use crate::category::Category;
use crate::item::PairSide;
use crate::results::ResultSet;
use crate::size::{parse_size_mb, size_mb_or_zero};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One file that a destructive operation would touch.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile<'a> {
    pub path: &'a Path,
    pub size: Option<&'a str>,
}

/// Footer figures for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub category: Category,
    pub total_items: usize,
    /// Selected rows. For pairs: rows with at least one side selected.
    pub selected_count: usize,
    /// Distinct selected file paths.
    pub files_selected: usize,
    pub total_selected_size_mb: f64,
}

/// Files keyed by path. A repeated path keeps the largest reported size, so
/// the result does not depend on row order.
#[derive(Default)]
struct DistinctFiles<'a> {
    files: Vec<SelectedFile<'a>>,
    index: HashMap<&'a Path, usize>,
}

impl<'a> DistinctFiles<'a> {
    fn insert(&mut self, file: SelectedFile<'a>) {
        match self.index.get(file.path) {
            Some(&i) => {
                if size_mb_quiet(file.size) > size_mb_quiet(self.files[i].size) {
                    self.files[i].size = file.size;
                }
            }
            None => {
                self.index.insert(file.path, self.files.len());
                self.files.push(file);
            }
        }
    }

    fn into_vec(self) -> Vec<SelectedFile<'a>> {
        self.files
    }
}

fn size_mb_quiet(size: Option<&str>) -> f64 {
    size.and_then(|s| parse_size_mb(s).ok()).unwrap_or(0.0)
}

/// Sum in path order so the float total is the same however rows are sorted.
fn total_mb(files: &[SelectedFile<'_>]) -> f64 {
    let mut sizes: Vec<(&Path, f64)> = files
        .iter()
        .map(|f| (f.path, size_mb_or_zero(f.size)))
        .collect();
    sizes.sort_by(|a, b| a.0.cmp(b.0));
    sizes.iter().map(|(_, mb)| mb).sum()
}

pub struct Aggregator<'a> {
    results: &'a ResultSet,
}

impl<'a> Aggregator<'a> {
    pub fn new(results: &'a ResultSet) -> Self {
        Self { results }
    }

    pub fn selected_count(&self, category: Category) -> usize {
        match category {
            Category::Similar => self.pairs_selected(),
            _ => self.selected_files(category).len(),
        }
    }

    pub fn pairs_selected(&self) -> usize {
        self.results
            .similar()
            .iter()
            .filter(|pair| self.results.is_selected(Category::Similar, &pair.id))
            .count()
    }

    pub fn files_selected(&self, category: Category) -> usize {
        self.selected_files(category).len()
    }

    /// Selected files of a category in store order. For pairs, a path that
    /// appears in several pairs is listed once with its largest size.
    pub fn selected_files(&self, category: Category) -> Vec<SelectedFile<'a>> {
        let results = self.results;
        let ledger = results.ledger();
        match category {
            Category::Blur => results
                .blur()
                .iter()
                .filter(|item| ledger.is_selected(Category::Blur, &item.id))
                .map(|item| SelectedFile {
                    path: &item.file_path,
                    size: item.file_size.as_deref(),
                })
                .collect(),
            Category::Error => results
                .errors()
                .iter()
                .filter(|item| ledger.is_selected(Category::Error, &item.id))
                .map(|item| SelectedFile {
                    path: &item.file_path,
                    size: None,
                })
                .collect(),
            Category::Similar => {
                let mut files = DistinctFiles::default();
                for pair in results.similar() {
                    for side in [PairSide::A, PairSide::B] {
                        if ledger.is_pair_side_selected(&pair.id, side) {
                            let file = pair.side(side);
                            files.insert(SelectedFile {
                                path: &file.file_path,
                                size: file.file_size.as_deref(),
                            });
                        }
                    }
                }
                files.into_vec()
            }
        }
    }

    pub fn total_selected_size_mb(&self, category: Category) -> f64 {
        total_mb(&self.selected_files(category))
    }

    pub fn summary(&self, category: Category) -> Summary {
        let files = self.selected_files(category);
        Summary {
            category,
            total_items: self.results.len(category),
            selected_count: match category {
                Category::Similar => self.pairs_selected(),
                _ => files.len(),
            },
            files_selected: files.len(),
            total_selected_size_mb: total_mb(&files),
        }
    }

    /// Union of selected files over several categories, deduplicated by path.
    pub fn selected_across(&self, categories: &[Category]) -> Vec<SelectedFile<'a>> {
        let mut files = DistinctFiles::default();
        for &category in categories {
            for file in self.selected_files(category) {
                files.insert(file);
            }
        }
        files.into_vec()
    }

    /// Paths and total size that trash/delete/move would act on.
    pub fn file_operation_targets(&self) -> (Vec<PathBuf>, f64) {
        let categories: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| c.holds_files())
            .collect();
        let files = self.selected_across(&categories);
        let total = total_mb(&files);
        let paths = files.into_iter().map(|f| f.path.to_path_buf()).collect();
        (paths, total)
    }
}
