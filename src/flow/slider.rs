//! Manual photo slider with wraparound indexing

use serde::{Deserialize, Serialize};

use crate::consts::PHOTO_DIR;

/// Normalize any index into [0, len) (negative input wraps from the end)
///
/// `len` must be non-zero.
#[inline]
pub fn wrap_index(i: i64, len: usize) -> usize {
    i.rem_euclid(len as i64) as usize
}

/// Ordered photo paths, fixed after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSequence {
    paths: Vec<String>,
    ext: String,
}

impl PhotoSequence {
    /// Build `images/1.<ext>` ... `images/<count>.<ext>`
    pub fn generate(count: usize, ext: &str) -> Self {
        let paths = (1..=count)
            .map(|n| format!("{}/{}.{}", PHOTO_DIR, n, ext))
            .collect();
        Self {
            paths,
            ext: ext.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(String::as_str)
    }

    /// Shown in place of the image when there is nothing to show
    pub fn empty_hint(&self) -> String {
        format!(
            "Add photos in /{dir} named 1.{ext}, 2.{ext}, 3.{ext}...",
            dir = PHOTO_DIR,
            ext = self.ext
        )
    }
}

/// What the slider should display for the current photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    pub index: usize,
    pub src: String,
    /// "current / total"
    pub counter: String,
}

/// Slider position over a `PhotoSequence`
#[derive(Debug, Clone)]
pub struct PhotoSlider {
    photos: PhotoSequence,
    index: usize,
}

impl PhotoSlider {
    pub fn new(count: usize, ext: &str) -> Self {
        Self {
            photos: PhotoSequence::generate(count, ext),
            index: 0,
        }
    }

    pub fn photos(&self) -> &PhotoSequence {
        &self.photos
    }

    /// Controls are disabled when there are no photos
    pub fn controls_enabled(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Select photo `i` (wrapped); None when the sequence is empty
    pub fn show(&mut self, i: i64) -> Option<SlideView> {
        if self.photos.is_empty() {
            return None;
        }
        let len = self.photos.len();
        self.index = wrap_index(i, len);
        Some(SlideView {
            index: self.index,
            src: self.photos.get(self.index)?.to_string(),
            counter: crate::counter_text(self.index, len),
        })
    }

    pub fn next(&mut self) -> Option<SlideView> {
        self.show(self.index as i64 + 1)
    }

    pub fn prev(&mut self) -> Option<SlideView> {
        self.show(self.index as i64 - 1)
    }
}
