//! Locating targets in a frame: image templates ([`matcher`]) and text phrases ([`text`]).

pub mod matcher;
pub mod ocr;
pub mod text;

use zeye_cv::BoundingBox;

/// The outcome of one search. A box is present exactly when something was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    bbox: Option<BoundingBox>,
}

impl MatchResult {
    pub fn at(bbox: BoundingBox) -> Self {
        Self { bbox: Some(bbox) }
    }

    pub fn not_found() -> Self {
        Self { bbox: None }
    }

    pub fn found(&self) -> bool {
        self.bbox.is_some()
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Where a click on the target lands.
    pub fn center(&self) -> Option<(i32, i32)> {
        self.bbox.map(|bbox| bbox.center())
    }
}

impl From<Option<BoundingBox>> for MatchResult {
    fn from(bbox: Option<BoundingBox>) -> Self {
        Self { bbox }
    }
}
