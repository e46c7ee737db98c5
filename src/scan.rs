//! Scan lifecycle: the guard around the external scanner and the events it
//! reports while it runs.

use crate::error::{CleanupError, Result};
use crate::item::{BlurItem, ErrorItem, PairFile, RecommendedSide, SimilarPairItem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Everything a scan reports, one list per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResults {
    #[serde(default)]
    pub blur: Vec<BlurItem>,
    #[serde(default)]
    pub similar: Vec<SimilarPairItem>,
    #[serde(default)]
    pub error: Vec<ErrorItem>,
}

impl ScanResults {
    pub fn counts(&self) -> ScanCounts {
        ScanCounts {
            blur: self.blur.len(),
            similar: self.similar.len(),
            error: self.error.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounts {
    pub blur: usize,
    pub similar: usize,
    pub error: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub include_subfolders: bool,
}

/// Notifications emitted while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Started {
        target: PathBuf,
        include_subfolders: bool,
    },

    /// Incremental progress reported by the scanner.
    Progress {
        completed_units: u64,
        total_units: Option<u64>,
        current_path: Option<PathBuf>,
    },

    Completed(ScanCounts),

    Failed { message: String },
}

/// External scan collaborator.
pub trait Scanner {
    fn scan_folder(
        &self,
        target: &Path,
        options: &ScanOptions,
        events: &Sender<ScanEvent>,
    ) -> anyhow::Result<ScanResults>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning { target: PathBuf },
    Done(ScanCounts),
    Error { message: String },
}

/// Guards scan start so only one scan is outstanding at a time.
#[derive(Debug, Default)]
pub struct ScanController {
    state: ScanState,
}

impl ScanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self.state, ScanState::Scanning { .. })
    }

    /// Move to `Scanning`. Rejected while another scan is outstanding.
    pub fn begin(&mut self, target: Option<&Path>) -> Result<PathBuf> {
        if self.is_scanning() {
            return Err(CleanupError::ScanInProgress);
        }
        let target = target.ok_or(CleanupError::NoTargetFolder)?.to_path_buf();
        self.state = ScanState::Scanning {
            target: target.clone(),
        };
        Ok(target)
    }

    pub fn complete(&mut self, counts: ScanCounts) {
        self.state = ScanState::Done(counts);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = ScanState::Error {
            message: message.into(),
        };
    }
}

/// Stand-in scanner returning a fixed demo result rooted at the target
/// folder. Used until a real detector is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderScanner;

impl Scanner for PlaceholderScanner {
    fn scan_folder(
        &self,
        target: &Path,
        _options: &ScanOptions,
        events: &Sender<ScanEvent>,
    ) -> anyhow::Result<ScanResults> {
        let results = placeholder_results(target);
        let total = (results.blur.len() + results.similar.len() * 2 + results.error.len()) as u64;

        let paths = results
            .blur
            .iter()
            .map(|item| item.file_path.clone())
            .chain(
                results
                    .similar
                    .iter()
                    .flat_map(|pair| [pair.a.file_path.clone(), pair.b.file_path.clone()]),
            )
            .chain(results.error.iter().map(|item| item.file_path.clone()));

        for (done, path) in paths.enumerate() {
            // A dropped receiver only means nobody is watching progress.
            let _ = events.send(ScanEvent::Progress {
                completed_units: done as u64 + 1,
                total_units: Some(total),
                current_path: Some(path),
            });
        }

        Ok(results)
    }
}

fn placeholder_results(target: &Path) -> ScanResults {
    let blur = vec![
        BlurItem {
            file_size: Some("2.5 MB".to_string()),
            resolution: Some("1920x1080".to_string()),
            taken_date: Some("2024/04/30 10:30:15".to_string()),
            last_modified: Some("2024/05/01 10:00".to_string()),
            ..BlurItem::new(
                "blur1",
                target.join("IMG_VeryLongFileName_001_for_preview.jpg"),
                95.0,
            )
        },
        BlurItem {
            file_size: Some("1.8 MB".to_string()),
            resolution: Some("1024x768".to_string()),
            taken_date: Some("2024/05/01 14:20:00".to_string()),
            last_modified: Some("2024/05/02 11:00".to_string()),
            ..BlurItem::new(
                "blur2",
                target.join("another_blurry_photo_example_with_long_name.png"),
                78.0,
            )
        },
    ];

    let side = |name: &str, size: &str, taken: &str| PairFile {
        resolution: Some("1920x1080".to_string()),
        taken_date: Some(taken.to_string()),
        ..PairFile::new(target.join(name)).with_size(size)
    };
    let similar = vec![SimilarPairItem::new(
        "similar1",
        side(
            "GroupA_img1_very_long_name_to_test_truncate.jpg",
            "1.2 MB",
            "2024/03/10 11:00:00",
        ),
        side(
            "GroupA_img2_also_a_long_name_for_testing.jpg",
            "1.3 MB",
            "2024/03/10 11:00:05",
        ),
        98.0,
    )
    .with_recommended(RecommendedSide::A)];

    let error = vec![ErrorItem::new(
        "error1",
        target.join("corrupted_image_file_example.jpg"),
        "File is corrupted",
    )];

    ScanResults {
        blur,
        similar,
        error,
    }
}
