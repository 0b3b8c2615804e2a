//! Normalization of split images and captures before scoring
//!
//! Every image-based comparison works on a [`SourceImage`]: the split image
//! resized to a canonical comparison size with a guaranteed alpha channel,
//! plus a mask of the comparable pixels when the split image is partially
//! transparent. Captures are resized to the source's size on every call.

use std::borrow::Cow;

use image::{DynamicImage, GrayImage, Luma, RgbaImage};

/// Canonical comparison width. Smaller images compare faster.
pub const COMPARISON_RESIZE_WIDTH: u32 = 320;
/// Canonical comparison height
pub const COMPARISON_RESIZE_HEIGHT: u32 = 240;
/// Number of pixels sampled from a transparent split image
pub const COMPARISON_RESIZE_AREA: u32 = COMPARISON_RESIZE_WIDTH * COMPARISON_RESIZE_HEIGHT;

pub(crate) const MAXBYTE: u8 = u8::MAX;
const ALPHA: usize = 3;

/// A split image prepared for comparison
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
    mask: Option<GrayImage>,
}

impl SourceImage {
    /// Normalize a decoded split image.
    ///
    /// Opaque images are resized to 320x240. Partially transparent images are
    /// scaled so roughly [`COMPARISON_RESIZE_AREA`] opaque pixels remain, which
    /// can leave them larger than 320x240; masked comparisons ignore the extra
    /// area anyway.
    pub fn new(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();

        if !has_transparency(image, &rgba) {
            let pixels = resize_nearest(&rgba, COMPARISON_RESIZE_WIDTH, COMPARISON_RESIZE_HEIGHT);
            return Self { pixels, mask: None };
        }

        let opaque = rgba.pixels().filter(|p| p[ALPHA] != 0).count();
        let scale = (COMPARISON_RESIZE_AREA as f64 / opaque as f64).sqrt().min(1.0);
        let width = ((rgba.width() as f64 * scale).round() as u32).max(1);
        let height = ((rgba.height() as f64 * scale).round() as u32).max(1);
        let pixels = resize_nearest_scaled(&rgba, width, height, 1.0 / scale, 1.0 / scale);

        let mask = GrayImage::from_fn(width, height, |x, y| {
            if pixels.get_pixel(x, y)[ALPHA] >= 1 {
                Luma([MAXBYTE])
            } else {
                Luma([0])
            }
        });

        Self {
            pixels,
            mask: Some(mask),
        }
    }

    /// The normalized RGBA pixels
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mask of comparable pixels (255 = opaque), present only for transparent split images
    pub fn mask(&self) -> Option<&GrayImage> {
        self.mask.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Number of pixels the mask marks as comparable
    pub fn opaque_count(&self) -> Option<usize> {
        self.mask
            .as_ref()
            .map(|mask| mask.pixels().filter(|p| p[0] != 0).count())
    }

    /// Resize a capture to the source's dimensions with nearest neighbour sampling.
    /// Captures of the right size in RGBA are borrowed as-is.
    pub fn resize_capture<'a>(&self, capture: &'a DynamicImage) -> Cow<'a, RgbaImage> {
        if capture.width() == self.width() && capture.height() == self.height() {
            return match capture.as_rgba8() {
                Some(rgba) => Cow::Borrowed(rgba),
                None => Cow::Owned(capture.to_rgba8()),
            };
        }
        Cow::Owned(resize_nearest(&capture.to_rgba8(), self.width(), self.height()))
    }
}

/// An image counts as transparent only when it has an alpha channel whose mean
/// is strictly between fully transparent and fully opaque. Fully transparent
/// images take the opaque path.
fn has_transparency(image: &DynamicImage, rgba: &RgbaImage) -> bool {
    if !image.color().has_alpha() {
        return false;
    }
    let pixel_count = rgba.width() as u64 * rgba.height() as u64;
    if pixel_count == 0 {
        return false;
    }
    let alpha_sum: u64 = rgba.pixels().map(|p| p[ALPHA] as u64).sum();
    alpha_sum != 0 && alpha_sum != pixel_count * MAXBYTE as u64
}

/// Nearest neighbour resize to an exact size
pub(crate) fn resize_nearest(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let inv_x = image.width() as f64 / width as f64;
    let inv_y = image.height() as f64 / height as f64;
    resize_nearest_scaled(image, width, height, inv_x, inv_y)
}

/// Nearest neighbour resize sampling source pixel `floor(dst * inv)`
fn resize_nearest_scaled(
    image: &RgbaImage,
    width: u32,
    height: u32,
    inv_x: f64,
    inv_y: f64,
) -> RgbaImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }

    let source_x: Vec<u32> = (0..width)
        .map(|x| ((x as f64 * inv_x).floor() as u32).min(image.width() - 1))
        .collect();
    let source_y: Vec<u32> = (0..height)
        .map(|y| ((y as f64 * inv_y).floor() as u32).min(image.height() - 1))
        .collect();

    RgbaImage::from_fn(width, height, |x, y| {
        *image.get_pixel(source_x[x as usize], source_y[y as usize])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    fn half_transparent(width: u32, height: u32, opaque_rows: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            let alpha = if y < opaque_rows { 255 } else { 0 };
            Rgba([x as u8, 100, 200, alpha])
        }))
    }

    #[test]
    fn test_opaque_rgb_resized_to_canonical_size() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([10, 20, 30])));
        let source = SourceImage::new(&image);

        assert_eq!((source.width(), source.height()), (320, 240));
        assert!(source.mask().is_none());
        assert_eq!(*source.pixels().get_pixel(5, 5), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_fully_opaque_alpha_is_not_transparent() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 50, Rgba([1, 2, 3, 255])));
        let source = SourceImage::new(&image);
        assert_eq!((source.width(), source.height()), (320, 240));
        assert!(source.mask().is_none());
    }

    #[test]
    fn test_fully_transparent_takes_opaque_path() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 50, Rgba([1, 2, 3, 0])));
        let source = SourceImage::new(&image);
        assert_eq!((source.width(), source.height()), (320, 240));
        assert!(source.mask().is_none());
        assert_eq!(source.pixels().get_pixel(0, 0)[ALPHA], 0);
    }

    #[test]
    fn test_small_transparent_image_keeps_its_size() {
        // 400x300 with 100 opaque rows: 40000 opaque pixels, below the target area
        let source = SourceImage::new(&half_transparent(400, 300, 100));

        assert_eq!((source.width(), source.height()), (400, 300));
        assert_eq!(source.opaque_count(), Some(40_000));
        let mask = source.mask().unwrap();
        assert_eq!(mask.get_pixel(0, 99)[0], 255);
        assert_eq!(mask.get_pixel(0, 100)[0], 0);
    }

    #[test]
    fn test_large_transparent_image_is_scaled_by_opaque_area() {
        // 800x600 with half the rows opaque: 240000 opaque pixels
        let source = SourceImage::new(&half_transparent(800, 600, 300));

        assert_eq!((source.width(), source.height()), (453, 339));
        let opaque = source.opaque_count().unwrap() as f64;
        let target = COMPARISON_RESIZE_AREA as f64;
        assert!((opaque - target).abs() / target < 0.02);
    }

    #[test]
    fn test_resize_capture_borrows_matching_rgba() {
        let source = SourceImage::new(&DynamicImage::new_rgb8(320, 240));
        let capture = DynamicImage::ImageRgba8(RgbaImage::new(320, 240));
        assert!(matches!(source.resize_capture(&capture), Cow::Borrowed(_)));

        let rgb_capture = DynamicImage::new_rgb8(320, 240);
        let resized = source.resize_capture(&rgb_capture);
        assert_eq!(resized.get_pixel(0, 0)[ALPHA], 255);

        let large = DynamicImage::new_rgb8(1920, 1080);
        assert_eq!(source.resize_capture(&large).dimensions(), (320, 240));
    }

    #[test]
    fn test_resize_nearest_samples_floor() {
        let image = RgbaImage::from_fn(4, 1, |x, _| Rgba([x as u8, 0, 0, 255]));
        let resized = resize_nearest(&image, 2, 1);
        assert_eq!(resized.get_pixel(0, 0)[0], 0);
        assert_eq!(resized.get_pixel(1, 0)[0], 2);
    }
}
