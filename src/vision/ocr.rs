use std::path::Path;

use anyhow::{anyhow, Context};
use image::DynamicImage;
use log::debug;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;

/// One recognized word and its box, `(x, y)` being the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Word {
    pub fn new(text: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn bottom_right(&self) -> (i32, i32) {
        (self.x + self.width as i32, self.y + self.height as i32)
    }
}

/// Turns a frame into words, in reading order.
pub trait WordRecognizer {
    fn recognize_words(&self, frame: &DynamicImage) -> anyhow::Result<Vec<Word>>;
}

impl<R: WordRecognizer + ?Sized> WordRecognizer for Box<R> {
    fn recognize_words(&self, frame: &DynamicImage) -> anyhow::Result<Vec<Word>> {
        (**self).recognize_words(frame)
    }
}

/// [`WordRecognizer`] backed by the `ocrs` engine.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    pub fn new(
        detection_model: impl AsRef<Path>,
        recognition_model: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        let detection_model = detection_model.as_ref();
        let recognition_model = recognition_model.as_ref();
        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(
                Model::load_file(detection_model)
                    .with_context(|| format!("cannot load {detection_model:?}"))?,
            ),
            recognition_model: Some(
                Model::load_file(recognition_model)
                    .with_context(|| format!("cannot load {recognition_model:?}"))?,
            ),
            ..Default::default()
        })?;
        Ok(Self { engine })
    }

    /// Loads `text-detection.rten` and `text-recognition.rten` from `models_dir`.
    pub fn from_dir(models_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let models_dir = models_dir.as_ref();
        Self::new(
            models_dir.join("text-detection.rten"),
            models_dir.join("text-recognition.rten"),
        )
    }
}

impl WordRecognizer for OcrsRecognizer {
    fn recognize_words(&self, frame: &DynamicImage) -> anyhow::Result<Vec<Word>> {
        let image = frame.to_rgb8();
        let img_source = ImageSource::from_bytes(image.as_raw(), image.dimensions())
            .map_err(|err| anyhow!("prepare image source error: {err}"))?;
        let ocr_input = self.engine.prepare_input(img_source)?;

        // Get oriented bounding boxes of text words, group them into lines,
        // then recognize the characters in each line.
        let word_rects = self.engine.detect_words(&ocr_input)?;
        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);
        let line_texts = self.engine.recognize_text(&ocr_input, &line_rects)?;

        let words: Vec<Word> = line_texts
            .iter()
            .flatten()
            .flat_map(|line| line.words())
            .map(|word| {
                let rect = word.bounding_rect();
                let text: String = word.chars().iter().map(|c| c.char).collect();
                Word::new(
                    text,
                    rect.left(),
                    rect.top(),
                    rect.width().max(0) as u32,
                    rect.height().max(0) as u32,
                )
            })
            .collect();
        debug!("[OcrsRecognizer]: {} words", words.len());
        Ok(words)
    }
}
