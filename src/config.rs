//! Instance-wide defaults for a [`crate::Zeye`].
//!
//! Nothing here is required, every operation also takes its parameters per call.
//!
//! ```toml
//! confidence = 0.9
//! timeout_secs = 2.0
//! text_capture = "per_attempt"
//! history_format = "png"
//! ```

use std::{fs, path::Path, time::Duration};

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::{check_confidence, Result, ZeyeError};

/// How the text path captures frames while polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStrategy {
    /// Capture once before polling, then re-run recognition on that frame.
    #[default]
    SingleFrame,
    /// Capture a new frame for every attempt, like the image path does.
    PerAttempt,
}

/// Image format of dumped history frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryFormat {
    #[default]
    Jpg,
    Png,
}

impl HistoryFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            HistoryFormat::Jpg => "jpg",
            HistoryFormat::Png => "png",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            HistoryFormat::Jpg => ImageFormat::Jpeg,
            HistoryFormat::Png => ImageFormat::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeyeConfig {
    /// Default image match threshold
    pub confidence: f32,
    /// Default polling timeout in seconds
    pub timeout_secs: f64,
    pub text_capture: CaptureStrategy,
    pub history_format: HistoryFormat,
    pub annotation_color: [u8; 3],
    pub annotation_thickness: u32,
}

impl Default for ZeyeConfig {
    fn default() -> Self {
        Self {
            confidence: 0.8,
            timeout_secs: 0.0,
            text_capture: CaptureStrategy::default(),
            history_format: HistoryFormat::default(),
            annotation_color: [0, 255, 0],
            annotation_thickness: 2,
        }
    }
}

impl ZeyeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = fs::read_to_string(path).map_err(ZeyeError::ConfigIo)?;
        Self::from_toml_str(&s)
    }

    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    fn validate(self) -> Result<Self> {
        check_confidence(self.confidence)?;
        Ok(self)
    }
}
