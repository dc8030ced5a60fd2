use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

use crate::types::BoundingBox;

/// Draws the outline of `bbox` onto `image`, `thickness` pixels wide, growing inwards.
///
/// Both corners are inclusive. Parts outside the image are clipped.
pub fn draw_box(image: &mut RgbImage, bbox: BoundingBox, rgb_u8: [u8; 3], thickness: u32) {
    let (width, height) = (bbox.width() + 1, bbox.height() + 1);
    for k in 0..thickness {
        if width <= 2 * k || height <= 2 * k {
            break;
        }
        let rect = Rect::at(bbox.x1 + k as i32, bbox.y1 + k as i32)
            .of_size(width - 2 * k, height - 2 * k);
        draw_hollow_rect_mut(image, rect, Rgb(rgb_u8));
    }
}

#[cfg(test)]
mod test {
    use image::{Rgb, RgbImage};

    use super::draw_box;
    use crate::types::BoundingBox;

    #[test]
    fn test_draw_box_outline() {
        let mut image = RgbImage::new(20, 20);
        draw_box(&mut image, BoundingBox::from_corners((2, 3), (10, 12)), [0, 255, 0], 2);

        let green = Rgb([0, 255, 0]);
        assert_eq!(image.get_pixel(2, 3), &green);
        assert_eq!(image.get_pixel(10, 12), &green);
        assert_eq!(image.get_pixel(3, 4), &green);
        // inside and outside stay untouched
        assert_eq!(image.get_pixel(6, 7), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(11, 12), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_box_clipped() {
        let mut image = RgbImage::new(8, 8);
        draw_box(&mut image, BoundingBox::from_corners((-4, -4), (20, 5)), [255, 0, 0], 1);
        assert_eq!(image.get_pixel(3, 5), &Rgb([255, 0, 0]));
    }
}
