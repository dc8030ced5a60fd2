//! zeye finds a picture or a phrase on the desktop and clicks it, keeping
//! annotated screenshots of everything it did.
//!
//! ```no_run
//! # fn main() -> zeye::Result<()> {
//! # #[cfg(feature = "desktop")] {
//! use std::time::Duration;
//!
//! let zeye = zeye::Zeye::desktop("./models")?;
//! zeye.click_image("button.png", 0.9, Duration::from_secs(2))?;
//! zeye.click_by_string("CLICK ME", false, false, Duration::from_secs(2))?;
//! zeye.dump_history("./history")?;
//! # }
//! # Ok(())
//! # }
//! ```

use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use image::DynamicImage;
use log::info;

pub mod config;
pub mod error;
pub mod history;
pub mod poll;
pub mod vision;

pub use config::{CaptureStrategy, HistoryFormat, ZeyeConfig};
pub use error::{Result, ZeyeError};
pub use history::{ActionHistory, ActionKind, DumpReport, HistoryEntry};
pub use vision::{
    matcher::{match_image, Template},
    ocr::{OcrsRecognizer, Word, WordRecognizer},
    text::{match_text, match_words},
    MatchResult,
};
pub use zeye_controller::Controller;
pub use zeye_cv::BoundingBox;

use crate::{error::check_confidence, poll::poll_until};

/// The result of a wait: what was found, and the frame it was found in.
#[derive(Debug, Clone)]
pub struct WaitOutcome {
    pub result: MatchResult,
    pub frame: DynamicImage,
}

struct Attempt {
    result: MatchResult,
    frame: DynamicImage,
}

pub struct Zeye {
    controller: Box<dyn Controller + Send + Sync>,
    recognizer: Box<dyn WordRecognizer + Send + Sync>,
    config: ZeyeConfig,
    history: Mutex<ActionHistory>,
}

impl Zeye {
    pub fn new(
        controller: impl Controller + Send + Sync + 'static,
        recognizer: impl WordRecognizer + Send + Sync + 'static,
    ) -> Self {
        let config = ZeyeConfig::default();
        Self {
            controller: Box::new(controller),
            recognizer: Box::new(recognizer),
            history: Mutex::new(ActionHistory::with_annotation(
                config.annotation_color,
                config.annotation_thickness,
            )),
            config,
        }
    }

    /// Replaces the defaults. Entries already recorded keep their annotation.
    pub fn with_config(mut self, config: ZeyeConfig) -> Self {
        self.history
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .set_annotation(config.annotation_color, config.annotation_thickness);
        self.config = config;
        self
    }

    /// The real desktop, with OCR models loaded from `models_dir`.
    #[cfg(feature = "desktop")]
    pub fn desktop(models_dir: impl AsRef<Path>) -> Result<Self> {
        let controller = zeye_controller::DesktopController::new()?;
        let recognizer = OcrsRecognizer::from_dir(models_dir)?;
        Ok(Self::new(controller, recognizer))
    }

    pub fn config(&self) -> &ZeyeConfig {
        &self.config
    }

    fn history(&self) -> MutexGuard<'_, ActionHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: ActionKind, frame: &DynamicImage, result: &MatchResult) {
        if let Some(bbox) = result.bbox() {
            self.history().append(action, frame, bbox);
        }
    }

    fn click_center(&self, result: &MatchResult) -> Result<()> {
        if let Some((x, y)) = result.center() {
            info!("[Zeye]: clicking ({x}, {y})");
            self.controller.click_at(x, y)?;
        }
        Ok(())
    }

    /// Captures a new frame on every attempt and matches the template against it.
    fn locate_image(
        &self,
        template_path: impl AsRef<Path>,
        confidence: f32,
        timeout: Duration,
    ) -> Result<Attempt> {
        let confidence = check_confidence(confidence)?;
        let template = Template::load(template_path)?;
        poll_until(
            || {
                let frame = self.controller.screencap()?;
                let result = template.match_in(&frame, confidence)?;
                Ok(Attempt { result, frame })
            },
            |attempt| attempt.result.found(),
            timeout,
        )
    }

    /// Searches for `phrase`, the capture strategy coming from [`ZeyeConfig::text_capture`].
    ///
    /// The returned frame is the unprocessed capture.
    fn locate_text(
        &self,
        phrase: &str,
        timeout: Duration,
        high_contrast: bool,
        invert: bool,
    ) -> Result<Attempt> {
        match self.config.text_capture {
            CaptureStrategy::SingleFrame => {
                let frame = self.controller.screencap()?;
                let processed = zeye_cv::preprocess(&frame, high_contrast, invert);
                let result = poll::poll(
                    || match_text(&processed, phrase, &self.recognizer),
                    timeout,
                )?;
                Ok(Attempt { result, frame })
            }
            CaptureStrategy::PerAttempt => poll_until(
                || {
                    let frame = self.controller.screencap()?;
                    let processed = zeye_cv::preprocess(&frame, high_contrast, invert);
                    let result = match_text(&processed, phrase, &self.recognizer)?;
                    Ok(Attempt { result, frame })
                },
                |attempt| attempt.result.found(),
                timeout,
            ),
        }
    }

    /// Waits until the template at `template_path` shows up with at least `confidence`.
    ///
    /// Nothing is clicked. With `record`, a found target is added to the history as `wait`.
    pub fn wait_for_image(
        &self,
        template_path: impl AsRef<Path>,
        confidence: f32,
        timeout: Duration,
        record: bool,
    ) -> Result<WaitOutcome> {
        let Attempt { result, frame } = self.locate_image(template_path, confidence, timeout)?;
        if record {
            self.record(ActionKind::Wait, &frame, &result);
        }
        Ok(WaitOutcome { result, frame })
    }

    /// Waits for the template, then clicks the centre of the match and records it.
    ///
    /// Returns `false` if the template never showed up within `timeout`.
    pub fn click_image(
        &self,
        template_path: impl AsRef<Path>,
        confidence: f32,
        timeout: Duration,
    ) -> Result<bool> {
        let Attempt { result, frame } = self.locate_image(template_path, confidence, timeout)?;
        if !result.found() {
            return Ok(false);
        }
        self.click_center(&result)?;
        self.record(ActionKind::Click, &frame, &result);
        Ok(true)
    }

    /// [`Zeye::click_image`] with the confidence and timeout from [`ZeyeConfig`].
    pub fn click_image_default(&self, template_path: impl AsRef<Path>) -> Result<bool> {
        self.click_image(template_path, self.config.confidence, self.config.timeout())
    }

    /// Waits until `phrase` can be read on screen, optionally after making the
    /// frame high-contrast and/or inverting it.
    pub fn wait_for_string(
        &self,
        phrase: &str,
        timeout: Duration,
        high_contrast: bool,
        invert: bool,
    ) -> Result<WaitOutcome> {
        let Attempt { result, frame } = self.locate_text(phrase, timeout, high_contrast, invert)?;
        Ok(WaitOutcome { result, frame })
    }

    /// Waits for `phrase`, then clicks its centre and records the unprocessed frame.
    pub fn click_by_string(
        &self,
        phrase: &str,
        high_contrast: bool,
        invert: bool,
        timeout: Duration,
    ) -> Result<bool> {
        let Attempt { result, frame } = self.locate_text(phrase, timeout, high_contrast, invert)?;
        if !result.found() {
            return Ok(false);
        }
        self.click_center(&result)?;
        self.record(ActionKind::Click, &frame, &result);
        Ok(true)
    }

    /// [`Zeye::click_by_string`] without preprocessing and with the timeout from [`ZeyeConfig`].
    pub fn click_by_string_default(&self, phrase: &str) -> Result<bool> {
        self.click_by_string(phrase, false, false, self.config.timeout())
    }

    /// Writes the history into `dir` in [`ZeyeConfig::history_format`].
    pub fn dump_history(&self, dir: impl AsRef<Path>) -> Result<DumpReport> {
        self.history().dump(dir, self.config.history_format)
    }

    pub fn clear_history(&self) {
        self.history().clear();
    }

    pub fn history_len(&self) -> usize {
        self.history().len()
    }

    pub fn with_history<R>(&self, f: impl FnOnce(&ActionHistory) -> R) -> R {
        f(&self.history())
    }
}
