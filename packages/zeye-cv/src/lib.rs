//! Image algorithms behind zeye: template scoring, frame preprocessing and annotation.
//!
//! Everything in here is pure, no screen or input device is touched.

#![deny(clippy::all)]

pub mod ccoeff_normed;
pub mod preprocess;
pub mod types;
pub mod utils;

pub use ccoeff_normed::{ccoeff_normed, find_extremes, Luma32fImage};
pub use imageproc::template_matching::Extremes;
pub use preprocess::{invert, preprocess, to_high_contrast};
pub use types::BoundingBox;
pub use utils::draw_box;
