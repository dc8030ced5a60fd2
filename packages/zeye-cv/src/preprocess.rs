//! Pure frame transforms applied before text recognition.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Converts to luminance and binarizes it with Otsu's global threshold.
///
/// The result only holds `0` and `255`, so applying it again is a no-op.
pub fn to_high_contrast(frame: &DynamicImage) -> DynamicImage {
    let gray = frame.to_luma8();
    let level = otsu_level(&gray);
    DynamicImage::ImageLuma8(binarize(&gray, level))
}

/// Pixels brighter than `level` become white, the rest black.
pub fn binarize(image: &GrayImage, level: u8) -> GrayImage {
    let mut image = image.clone();
    for pixel in image.pixels_mut() {
        let Luma([gray]) = *pixel;
        *pixel = Luma([if gray > level { 255 } else { 0 }]);
    }
    image
}

/// Complements every color sample (`255 - v`), alpha untouched.
pub fn invert(frame: &DynamicImage) -> DynamicImage {
    let mut frame = frame.clone();
    frame.invert();
    frame
}

/// Applies the requested transforms, high-contrast first, then inversion.
pub fn preprocess(frame: &DynamicImage, high_contrast: bool, inverted: bool) -> DynamicImage {
    let frame = if high_contrast {
        to_high_contrast(frame)
    } else {
        frame.clone()
    };
    if inverted {
        invert(&frame)
    } else {
        frame
    }
}

#[cfg(test)]
mod test {
    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    fn gradient() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(32, 16, |x, y| {
            Rgb([(x * 8) as u8, (y * 16) as u8, ((x + y) * 5) as u8])
        }))
    }

    #[test]
    fn test_high_contrast_is_two_valued() {
        let res = to_high_contrast(&gradient()).to_luma8();
        assert!(res.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(res.pixels().any(|p| p.0[0] == 0));
        assert!(res.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn test_high_contrast_idempotent() {
        let once = to_high_contrast(&gradient());
        let twice = to_high_contrast(&once);
        assert_eq!(once.to_luma8(), twice.to_luma8());
    }

    #[test]
    fn test_invert_round_trip() {
        let frame = gradient();
        assert_eq!(invert(&invert(&frame)), frame);
        assert_eq!(invert(&frame).to_rgb8().get_pixel(1, 1), &Rgb([247, 239, 245]));
    }

    #[test]
    fn test_preprocess_order() {
        let frame = gradient();
        let contrast_then_invert = preprocess(&frame, true, true);
        assert_eq!(contrast_then_invert, invert(&to_high_contrast(&frame)));
        assert_eq!(preprocess(&frame, false, false), frame);
    }
}
