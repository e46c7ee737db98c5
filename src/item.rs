//! Typed scan result records.
//!
//! The scan collaborator reports three kinds of findings. Each kind lives in
//! its own [`Category`] and is identified by an id that is unique within that
//! category only.

use crate::category::Category;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Common surface of the per-category records used by [`crate::store::ItemStore`].
pub trait Record {
    type SortField: Copy;

    fn id(&self) -> &str;

    fn sort_key(&self, field: Self::SortField) -> SortKey;
}

/// Comparable projection of one field. Ordering across kinds only happens
/// when a field is missing or unparsable on some rows; `Missing` sorts first.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Number(_) => 1,
            SortKey::Date(_) => 2,
            SortKey::Text(_) => 3,
        }
    }

    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn text(s: &str) -> Self {
        SortKey::Text(s.to_string())
    }

    fn size(s: Option<&str>) -> Self {
        match s.and_then(|s| crate::size::parse_size_mb(s).ok()) {
            Some(mb) => SortKey::Number(mb),
            None => SortKey::Missing,
        }
    }

    fn date(s: Option<&str>) -> Self {
        s.and_then(parse_timestamp)
            .map(SortKey::Date)
            .unwrap_or(SortKey::Missing)
    }

    fn resolution(s: Option<&str>) -> Self {
        s.and_then(pixel_count)
            .map(|px| SortKey::Number(px as f64))
            .unwrap_or(SortKey::Missing)
    }
}

/// Parse the timestamp strings the scanner reports (`2024/04/30 10:30:15`).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y/%m/%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `"1920x1080"` -> 2_073_600
pub fn pixel_count(resolution: &str) -> Option<u64> {
    let (w, h) = resolution.trim().split_once(['x', 'X', '×'])?;
    let w: u64 = w.trim().parse().ok()?;
    let h: u64 = h.trim().parse().ok()?;
    w.checked_mul(h)
}

// ---------------------------------------------------------------------------
// Blur
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlurItem {
    pub id: String,
    pub file_path: PathBuf,
    pub file_name: String,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub taken_date: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    /// Higher is blurrier.
    pub blur_score: f64,
    #[serde(default)]
    pub preview_src: Option<String>,
}

impl BlurItem {
    pub fn new(id: impl Into<String>, file_path: impl Into<PathBuf>, blur_score: f64) -> Self {
        let file_path = file_path.into();
        Self {
            id: id.into(),
            file_name: file_name_of(&file_path),
            file_path,
            file_size: None,
            resolution: None,
            taken_date: None,
            last_modified: None,
            blur_score,
            preview_src: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.file_size = Some(size.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurField {
    FileName,
    FileSize,
    LastModified,
    TakenDate,
    Resolution,
    BlurScore,
}

impl Record for BlurItem {
    type SortField = BlurField;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self, field: BlurField) -> SortKey {
        match field {
            BlurField::FileName => SortKey::text(&self.file_name),
            BlurField::FileSize => SortKey::size(self.file_size.as_deref()),
            BlurField::LastModified => SortKey::date(self.last_modified.as_deref()),
            BlurField::TakenDate => SortKey::date(self.taken_date.as_deref()),
            BlurField::Resolution => SortKey::resolution(self.resolution.as_deref()),
            BlurField::BlurScore => SortKey::Number(self.blur_score),
        }
    }
}

// ---------------------------------------------------------------------------
// Similar pairs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairSide {
    A,
    B,
}

impl PairSide {
    pub fn other(self) -> PairSide {
        match self {
            PairSide::A => PairSide::B,
            PairSide::B => PairSide::A,
        }
    }
}

/// Which file of a pair the scanner suggests keeping. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecommendedSide {
    #[default]
    None,
    A,
    B,
}

impl RecommendedSide {
    fn from_code(code: u8) -> Self {
        match code {
            1 => RecommendedSide::A,
            2 => RecommendedSide::B,
            _ => RecommendedSide::None,
        }
    }

    fn code(self) -> u8 {
        match self {
            RecommendedSide::None => 0,
            RecommendedSide::A => 1,
            RecommendedSide::B => 2,
        }
    }

    pub fn side(self) -> Option<PairSide> {
        match self {
            RecommendedSide::None => None,
            RecommendedSide::A => Some(PairSide::A),
            RecommendedSide::B => Some(PairSide::B),
        }
    }
}

/// One file of a similar pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFile {
    pub file_path: PathBuf,
    pub file_name: String,
    pub file_size: Option<String>,
    pub resolution: Option<String>,
    pub taken_date: Option<String>,
    pub preview_src: Option<String>,
}

impl PairFile {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        Self {
            file_name: file_name_of(&file_path),
            file_path,
            file_size: None,
            resolution: None,
            taken_date: None,
            preview_src: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.file_size = Some(size.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSimilarPair", into = "RawSimilarPair")]
pub struct SimilarPairItem {
    pub id: String,
    pub a: PairFile,
    pub b: PairFile,
    /// 0-100
    pub similarity: f64,
    pub recommended: RecommendedSide,
}

impl SimilarPairItem {
    pub fn new(id: impl Into<String>, a: PairFile, b: PairFile, similarity: f64) -> Self {
        Self {
            id: id.into(),
            a,
            b,
            similarity,
            recommended: RecommendedSide::None,
        }
    }

    pub fn with_recommended(mut self, recommended: RecommendedSide) -> Self {
        self.recommended = recommended;
        self
    }

    pub fn side(&self, side: PairSide) -> &PairFile {
        match side {
            PairSide::A => &self.a,
            PairSide::B => &self.b,
        }
    }

    pub fn has_distinct_paths(&self) -> bool {
        self.a.file_path != self.b.file_path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarField {
    FileNameA,
    FileNameB,
    ResolutionA,
    ResolutionB,
    Similarity,
}

impl Record for SimilarPairItem {
    type SortField = SimilarField;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self, field: SimilarField) -> SortKey {
        match field {
            SimilarField::FileNameA => SortKey::text(&self.a.file_name),
            SimilarField::FileNameB => SortKey::text(&self.b.file_name),
            SimilarField::ResolutionA => SortKey::resolution(self.a.resolution.as_deref()),
            SimilarField::ResolutionB => SortKey::resolution(self.b.resolution.as_deref()),
            SimilarField::Similarity => SortKey::Number(self.similarity),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum ScoreRepr {
    Number(f64),
    Text(String),
}

impl ScoreRepr {
    fn value(&self) -> Result<f64, String> {
        match self {
            ScoreRepr::Number(n) => Ok(*n),
            ScoreRepr::Text(s) => s
                .trim()
                .trim_end_matches('%')
                .trim()
                .parse()
                .map_err(|_| format!("invalid similarity score {:?}", s)),
        }
    }
}

/// Flat wire layout used by the scanner (`filePath1`, `filePath2`, ...).
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawSimilarPair {
    id: String,
    file_path1: PathBuf,
    #[serde(default)]
    file_name1: Option<String>,
    #[serde(default)]
    file_size1: Option<String>,
    #[serde(default)]
    resolution1: Option<String>,
    #[serde(default)]
    taken_date1: Option<String>,
    #[serde(default)]
    preview_src1: Option<String>,
    file_path2: PathBuf,
    #[serde(default)]
    file_name2: Option<String>,
    #[serde(default)]
    file_size2: Option<String>,
    #[serde(default)]
    resolution2: Option<String>,
    #[serde(default)]
    taken_date2: Option<String>,
    #[serde(default)]
    preview_src2: Option<String>,
    similar_score: ScoreRepr,
    #[serde(default)]
    recommended: u8,
}

impl TryFrom<RawSimilarPair> for SimilarPairItem {
    type Error = String;

    fn try_from(raw: RawSimilarPair) -> Result<Self, Self::Error> {
        let similarity = raw.similar_score.value()?;
        let side = |path: PathBuf,
                    name: Option<String>,
                    size: Option<String>,
                    resolution: Option<String>,
                    taken: Option<String>,
                    preview: Option<String>| PairFile {
            file_name: name.unwrap_or_else(|| file_name_of(&path)),
            file_path: path,
            file_size: size,
            resolution,
            taken_date: taken,
            preview_src: preview,
        };

        let item = SimilarPairItem {
            a: side(
                raw.file_path1,
                raw.file_name1,
                raw.file_size1,
                raw.resolution1,
                raw.taken_date1,
                raw.preview_src1,
            ),
            b: side(
                raw.file_path2,
                raw.file_name2,
                raw.file_size2,
                raw.resolution2,
                raw.taken_date2,
                raw.preview_src2,
            ),
            id: raw.id,
            similarity,
            recommended: RecommendedSide::from_code(raw.recommended),
        };

        if !item.has_distinct_paths() {
            return Err(format!(
                "similar pair '{}' refers to the same file twice",
                item.id
            ));
        }
        Ok(item)
    }
}

impl From<SimilarPairItem> for RawSimilarPair {
    fn from(item: SimilarPairItem) -> Self {
        RawSimilarPair {
            id: item.id,
            file_path1: item.a.file_path,
            file_name1: Some(item.a.file_name),
            file_size1: item.a.file_size,
            resolution1: item.a.resolution,
            taken_date1: item.a.taken_date,
            preview_src1: item.a.preview_src,
            file_path2: item.b.file_path,
            file_name2: Some(item.b.file_name),
            file_size2: item.b.file_size,
            resolution2: item.b.resolution,
            taken_date2: item.b.taken_date,
            preview_src2: item.b.preview_src,
            similar_score: ScoreRepr::Number(item.similarity),
            recommended: item.recommended.code(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorItem {
    pub id: String,
    pub file_path: PathBuf,
    pub file_name: String,
    pub error_type: String,
}

impl ErrorItem {
    pub fn new(
        id: impl Into<String>,
        file_path: impl Into<PathBuf>,
        error_type: impl Into<String>,
    ) -> Self {
        let file_path = file_path.into();
        Self {
            id: id.into(),
            file_name: file_name_of(&file_path),
            file_path,
            error_type: error_type.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    FileName,
    ErrorType,
    FilePath,
}

impl Record for ErrorItem {
    type SortField = ErrorField;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self, field: ErrorField) -> SortKey {
        match field {
            ErrorField::FileName => SortKey::text(&self.file_name),
            ErrorField::ErrorType => SortKey::text(&self.error_type),
            ErrorField::FilePath => SortKey::Text(self.file_path.to_string_lossy().into_owned()),
        }
    }
}

// ---------------------------------------------------------------------------

/// A scan finding of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRecord {
    Blur(BlurItem),
    Similar(SimilarPairItem),
    Error(ErrorItem),
}

impl ItemRecord {
    pub fn category(&self) -> Category {
        match self {
            ItemRecord::Blur(_) => Category::Blur,
            ItemRecord::Similar(_) => Category::Similar,
            ItemRecord::Error(_) => Category::Error,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ItemRecord::Blur(item) => &item.id,
            ItemRecord::Similar(item) => &item.id,
            ItemRecord::Error(item) => &item.id,
        }
    }
}

impl From<BlurItem> for ItemRecord {
    fn from(item: BlurItem) -> Self {
        ItemRecord::Blur(item)
    }
}

impl From<SimilarPairItem> for ItemRecord {
    fn from(item: SimilarPairItem) -> Self {
        ItemRecord::Similar(item)
    }
}

impl From<ErrorItem> for ItemRecord {
    fn from(item: ErrorItem) -> Self {
        ItemRecord::Error(item)
    }
}

/// Last path component, accepting both `/` and `\` separators.
pub fn file_name_of(path: &Path) -> String {
    let s = path.to_string_lossy();
    match s.rfind(['/', '\\']) {
        Some(idx) => s[idx + 1..].to_string(),
        None => s.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_pair_from_scanner_json() {
        let json = r#"{
            "id": "similar1",
            "filePath1": "C:\\photos\\a.jpg",
            "fileName1": "a.jpg",
            "fileSize1": "1.2 MB",
            "resolution1": "1920x1080",
            "filePath2": "C:\\photos\\b.jpg",
            "fileSize2": "1.3 MB",
            "similarScore": "98%",
            "recommended": 1
        }"#;
        let pair: SimilarPairItem = serde_json::from_str(json).unwrap();
        assert_eq!(pair.id, "similar1");
        assert_eq!(pair.similarity, 98.0);
        assert_eq!(pair.recommended, RecommendedSide::A);
        assert_eq!(pair.b.file_name, "b.jpg");
        assert_eq!(pair.a.file_size.as_deref(), Some("1.2 MB"));
    }

    #[test]
    fn test_similar_pair_rejects_same_path() {
        let json = r#"{
            "id": "s1",
            "filePath1": "/x/a.jpg",
            "filePath2": "/x/a.jpg",
            "similarScore": 90
        }"#;
        assert!(serde_json::from_str::<SimilarPairItem>(json).is_err());
    }

    #[test]
    fn test_blur_item_defaults() {
        let json = r#"{"id":"blur1","filePath":"/p/x.jpg","fileName":"x.jpg","blurScore":95}"#;
        let item: BlurItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.file_size, None);
        assert_eq!(item.blur_score, 95.0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024/04/30 10:30:15").is_some());
        assert!(parse_timestamp("2024/05/01 10:00").is_some());
        assert!(parse_timestamp("2024/05/01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_pixel_count() {
        assert_eq!(pixel_count("1920x1080"), Some(2_073_600));
        assert_eq!(pixel_count("1024 x 768"), Some(786_432));
        assert_eq!(pixel_count("unknown"), None);
    }

    #[test]
    fn test_pixel_count_overflow_is_missing() {
        assert_eq!(pixel_count("4294967296x4294967296"), None);
        let mut item = BlurItem::new("b1", "/p/huge.jpg", 10.0);
        item.resolution = Some("4294967296x4294967296".to_string());
        assert!(matches!(
            item.sort_key(BlurField::Resolution),
            SortKey::Missing
        ));
    }

    #[test]
    fn test_sort_key_missing_first() {
        let missing = SortKey::Missing;
        let n = SortKey::Number(1.0);
        assert_eq!(missing.compare(&n), Ordering::Less);
        assert_eq!(
            SortKey::text("b.jpg").compare(&SortKey::text("A.jpg")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_file_name_of_windows_path() {
        assert_eq!(file_name_of(Path::new("C:\\dir\\img.png")), "img.png");
        assert_eq!(file_name_of(Path::new("/dir/img.png")), "img.png");
        assert_eq!(file_name_of(Path::new("img.png")), "img.png");
    }
}
