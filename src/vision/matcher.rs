use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use image::{DynamicImage, Rgb32FImage};
use log::debug;
use zeye_cv::{ccoeff_normed, find_extremes, BoundingBox};

use crate::{
    error::{check_confidence, Result, ZeyeError},
    vision::MatchResult,
};

/// A template image, loaded once and matched against any number of frames.
pub struct Template {
    path: PathBuf,
    image: Rgb32FImage,
}

impl Template {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let image = image::open(&path)
            .map_err(|source| ZeyeError::TemplateLoad {
                path: path.clone(),
                source,
            })?
            .to_rgb32f();
        Ok(Self { path, image })
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        Self {
            path: PathBuf::new(),
            image: image.to_rgb32f(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Finds the best-scoring position of this template in `frame`, comparing color,
    /// not only brightness. Alpha is ignored.
    ///
    /// Found when the best score is at least `confidence`; the box is anchored at
    /// the top-left of that position and sized like the template.
    pub fn match_in(&self, frame: &DynamicImage, confidence: f32) -> Result<MatchResult> {
        let confidence = check_confidence(confidence)?;

        let start_time = Instant::now();
        let res = ccoeff_normed(&frame.to_rgb32f(), &self.image);
        let Some(extremes) = find_extremes(&res) else {
            debug!(
                "[Template::match_in]: template {}x{} does not fit into frame {}x{}",
                self.width(),
                self.height(),
                frame.width(),
                frame.height()
            );
            return Ok(MatchResult::not_found());
        };
        debug!(
            "[Template::match_in]: {:?} best {:.4} at {:?}, cost: {:?}",
            self.path,
            extremes.max_value,
            extremes.max_value_location,
            start_time.elapsed()
        );

        if extremes.max_value < confidence {
            return Ok(MatchResult::not_found());
        }
        let (x, y) = extremes.max_value_location;
        Ok(MatchResult::at(BoundingBox::from_xywh(
            x as i32,
            y as i32,
            self.width(),
            self.height(),
        )))
    }
}

/// Loads the template at `template_path` and matches it against `frame`.
pub fn match_image(
    frame: &DynamicImage,
    template_path: impl AsRef<Path>,
    confidence: f32,
) -> Result<MatchResult> {
    check_confidence(confidence)?;
    Template::load(template_path)?.match_in(frame, confidence)
}
