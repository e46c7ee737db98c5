//! Preview pane state: which image(s) are shown and the zoom/pan applied.

use crate::item::{BlurItem, ErrorItem, PairFile, SimilarPairItem};
use std::path::PathBuf;

pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 150;
pub const DEFAULT_ZOOM: u32 = 100;
pub const ZOOM_STEP: u32 = 10;
pub const WHEEL_ZOOM_STEP: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewImage {
    pub path: PathBuf,
    pub name: String,
    /// Image source reported by the scanner, if any.
    pub src: Option<String>,
}

impl PreviewImage {
    fn from_pair_file(file: &PairFile) -> Self {
        Self {
            path: file.file_path.clone(),
            name: file.file_name.clone(),
            src: file.preview_src.clone(),
        }
    }
}

impl From<&BlurItem> for PreviewImage {
    fn from(item: &BlurItem) -> Self {
        Self {
            path: item.file_path.clone(),
            name: item.file_name.clone(),
            src: item.preview_src.clone(),
        }
    }
}

impl From<&ErrorItem> for PreviewImage {
    fn from(item: &ErrorItem) -> Self {
        Self {
            path: item.file_path.clone(),
            name: item.file_name.clone(),
            src: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PreviewTarget {
    #[default]
    Empty,
    Single(PreviewImage),
    /// Side-by-side view of a similar pair.
    Comparison {
        left: PreviewImage,
        right: PreviewImage,
    },
}

impl From<&SimilarPairItem> for PreviewTarget {
    fn from(pair: &SimilarPairItem) -> Self {
        PreviewTarget::Comparison {
            left: PreviewImage::from_pair_file(&pair.a),
            right: PreviewImage::from_pair_file(&pair.b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    target: PreviewTarget,
    zoom: u32,
    offset: (f64, f64),
    drag_origin: Option<(f64, f64)>,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            target: PreviewTarget::Empty,
            zoom: DEFAULT_ZOOM,
            offset: (0.0, 0.0),
            drag_origin: None,
        }
    }
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> &PreviewTarget {
        &self.target
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Showing a different image starts from 100% again.
    pub fn show(&mut self, target: PreviewTarget) {
        if self.target != target {
            self.target = target;
            self.reset_zoom();
        }
    }

    pub fn clear(&mut self) {
        self.show(PreviewTarget::Empty);
    }

    pub fn set_zoom(&mut self, percent: u32) {
        self.zoom = percent.clamp(MIN_ZOOM, MAX_ZOOM);
        if self.zoom <= DEFAULT_ZOOM {
            self.offset = (0.0, 0.0);
            self.drag_origin = None;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(ZOOM_STEP));
    }

    /// Positive `delta` zooms in.
    pub fn wheel(&mut self, delta: i32) {
        match delta.signum() {
            1 => self.set_zoom(self.zoom.saturating_add(WHEEL_ZOOM_STEP)),
            -1 => self.set_zoom(self.zoom.saturating_sub(WHEEL_ZOOM_STEP)),
            _ => {}
        }
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(DEFAULT_ZOOM);
    }

    pub fn can_drag(&self) -> bool {
        self.zoom > DEFAULT_ZOOM && self.target != PreviewTarget::Empty
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        if !self.can_drag() {
            return false;
        }
        self.drag_origin = Some((x - self.offset.0, y - self.offset.1));
        true
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some((ox, oy)) = self.drag_origin {
            self.offset = (x - ox, y - oy);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str) -> PreviewTarget {
        PreviewTarget::Single(PreviewImage::from(&BlurItem::new(
            name,
            format!("/p/{name}.jpg"),
            90.0,
        )))
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut preview = Preview::new();
        for _ in 0..10 {
            preview.zoom_in();
        }
        assert_eq!(preview.zoom(), MAX_ZOOM);
        preview.set_zoom(0);
        assert_eq!(preview.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_wheel_uses_smaller_step() {
        let mut preview = Preview::new();
        preview.wheel(120);
        assert_eq!(preview.zoom(), 105);
        preview.wheel(-1);
        preview.wheel(-1);
        assert_eq!(preview.zoom(), 95);
        preview.wheel(0);
        assert_eq!(preview.zoom(), 95);
    }

    #[test]
    fn test_drag_only_when_zoomed_in() {
        let mut preview = Preview::new();
        preview.show(single("a"));
        assert!(!preview.begin_drag(0.0, 0.0));

        preview.zoom_in();
        assert!(preview.begin_drag(10.0, 10.0));
        preview.drag_to(25.0, 5.0);
        preview.end_drag();
        assert_eq!(preview.offset(), (15.0, -5.0));

        preview.set_zoom(100);
        assert_eq!(preview.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_new_target_resets_zoom() {
        let mut preview = Preview::new();
        preview.show(single("a"));
        preview.set_zoom(140);
        preview.show(single("a"));
        assert_eq!(preview.zoom(), 140);
        preview.show(single("b"));
        assert_eq!(preview.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_pair_becomes_comparison() {
        let pair = SimilarPairItem::new(
            "s1",
            PairFile::new("/p/a.jpg"),
            PairFile::new("/p/b.jpg"),
            97.0,
        );
        match PreviewTarget::from(&pair) {
            PreviewTarget::Comparison { left, right } => {
                assert_eq!(left.name, "a.jpg");
                assert_eq!(right.name, "b.jpg");
            }
            other => panic!("unexpected target: {:?}", other),
        }
    }
}
