use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in zeye.
///
/// A target that is not on screen is not an error, it is a
/// [`crate::MatchResult`] with `found == false`.
#[derive(Error, Debug)]
pub enum ZeyeError {
    #[error("failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("confidence must be within [0, 1], got {0}")]
    InvalidConfidence(f32),

    #[error("failed to dump history to {path:?}: {source}")]
    DumpIo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read config: {0}")]
    ConfigIo(#[source] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ZeyeError>;

/// Rejects thresholds outside `[0, 1]` (NaN included).
pub fn check_confidence(confidence: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(confidence)
    } else {
        Err(ZeyeError::InvalidConfidence(confidence))
    }
}
