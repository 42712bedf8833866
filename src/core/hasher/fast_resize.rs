//! Fast SIMD-accelerated image resizing.
//!
//! Uses fast_image_resize, which picks AVX2/NEON code paths when available.
//! The hash grid is tiny, so most of the cost is the convolution pass over
//! the source image.

use super::traits::Resample;
use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, Rgb, RgbImage, Rgba};
use serde::{Deserialize, Serialize};

/// Interpolation kernel used to reduce the source to the hash grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    /// Box / area averaging, closest to a classic area-resample
    #[default]
    Area,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ResampleFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Area => FilterType::Box,
            ResampleFilter::Bilinear => FilterType::Bilinear,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleFilter::Area => write!(f, "area"),
            ResampleFilter::Bilinear => write!(f, "bilinear"),
            ResampleFilter::CatmullRom => write!(f, "catmull-rom"),
            ResampleFilter::Lanczos3 => write!(f, "lanczos3"),
        }
    }
}

/// Fast image resizer using SIMD acceleration
pub struct FastResizer {
    resizer: Resizer,
    filter: ResampleFilter,
}

impl FastResizer {
    /// Create a new fast resizer with the default filter
    pub fn new() -> Self {
        Self::with_filter(ResampleFilter::default())
    }

    pub fn with_filter(filter: ResampleFilter) -> Self {
        Self {
            resizer: Resizer::new(),
            filter,
        }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// Resize an image to the specified dimensions as 8-bit RGB.
    ///
    /// Sources with alpha are composited over black first.
    pub fn resize_to_rgb(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, HashError> {
        let rgb = flatten_to_rgb(image);

        let src_width = rgb.width();
        let src_height = rgb.height();

        if src_width == 0 || src_height == 0 {
            return Err(HashError::InvalidImage {
                reason: format!("source dimensions are {}x{}", src_width, src_height),
            });
        }

        if width == 0 || height == 0 {
            return Err(HashError::ResampleFailed(format!(
                "invalid destination dimensions {}x{}",
                width, height
            )));
        }

        let src_image = Image::from_vec_u8(src_width, src_height, rgb.into_raw(), PixelType::U8x3)
            .map_err(|e| {
                HashError::ResampleFailed(format!("failed to create source image: {}", e))
            })?;

        let mut dst_image = Image::new(width, height, PixelType::U8x3);

        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(self.filter.filter_type()));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| HashError::ResampleFailed(format!("resize failed: {}", e)))?;

        RgbImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            HashError::ResampleFailed("failed to create result buffer".to_string())
        })
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Resample for FastResizer {
    fn resample(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, HashError> {
        self.resize_to_rgb(image, width, height)
    }
}

/// Composite an image over an opaque black canvas as 8-bit RGB.
///
/// A fully transparent pixel becomes black whatever colour it stores.
/// Images without alpha are converted unchanged.
pub fn flatten_to_rgb(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([over_black(r, a), over_black(g, a), over_black(b, a)])
    })
}

#[inline]
fn over_black(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 128 / (width + height).max(1)) as u8;
            Rgb([r, g, b])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resize_produces_hash_grid_dimensions() {
        let image = create_test_image(200, 100);
        let resized = FastResizer::new().resize_to_rgb(&image, 9, 8).unwrap();

        assert_eq!(resized.width(), 9);
        assert_eq!(resized.height(), 8);
    }

    #[test]
    fn solid_colour_survives_every_filter() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 48, Rgb([10, 200, 90])));

        for filter in [
            ResampleFilter::Area,
            ResampleFilter::Bilinear,
            ResampleFilter::CatmullRom,
            ResampleFilter::Lanczos3,
        ] {
            let resized = FastResizer::with_filter(filter)
                .resize_to_rgb(&image, 9, 8)
                .unwrap();
            let close = |a: u8, b: u8| a.abs_diff(b) <= 1;
            assert!(
                resized
                    .pixels()
                    .all(|p| close(p[0], 10) && close(p[1], 200) && close(p[2], 90)),
                "filter {} altered a solid image",
                filter
            );
        }
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        let image = DynamicImage::new_rgb8(0, 10);
        let result = FastResizer::new().resize_to_rgb(&image, 9, 8);

        assert!(matches!(result, Err(HashError::InvalidImage { .. })));
    }

    #[test]
    fn resizer_reuse() {
        let mut resizer = FastResizer::new();
        let image = create_test_image(100, 100);

        let resized1 = resizer.resize_to_rgb(&image, 9, 8).unwrap();
        let resized2 = resizer.resize_to_rgb(&image, 9, 8).unwrap();

        assert_eq!(resized1, resized2);
    }

    #[test]
    fn transparent_pixels_flatten_to_black() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_fn(4, 2, |x, _| {
            Rgba([250, 120, 60, if x < 2 { 0 } else { 255 }])
        }));

        let flat = flatten_to_rgb(&image);

        assert_eq!(*flat.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*flat.get_pixel(3, 1), Rgb([250, 120, 60]));
    }

    #[test]
    fn partial_alpha_scales_channels() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(1, 1, Rgba([200, 100, 255, 128])));

        assert_eq!(*flatten_to_rgb(&image).get_pixel(0, 0), Rgb([100, 50, 128]));
    }

    #[test]
    fn transparent_source_resizes_to_black() {
        let image = DynamicImage::ImageRgba8(ImageBuffer::from_fn(40, 40, |x, y| {
            Rgba([(x * 6) as u8, (y * 6) as u8, 200, 0])
        }));

        let resized = FastResizer::new().resize_to_rgb(&image, 9, 8).unwrap();

        assert!(resized.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn opaque_images_flatten_unchanged() {
        let image = create_test_image(12, 7);
        assert_eq!(flatten_to_rgb(&image), image.to_rgb8());
    }
}
