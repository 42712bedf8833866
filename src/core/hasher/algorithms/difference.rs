//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Resampling the image to a 9x8 grid
//! 2. Walking each row left to right, using column 0 as the baseline
//! 3. Emitting a 1 whenever a pixel is strictly darker than its left neighbour
//!
//! The 8 comparisons per row over 8 rows fill a `u64`. The first comparison
//! lands in the most significant bit.

use super::super::fast_decode::FastDecoder;
use super::super::fast_resize::{flatten_to_rgb, FastResizer, ResampleFilter};
use super::super::traits::{Channel, ChannelHashSet, ImageHash, Resample};
use super::super::{DHASH_HEIGHT, DHASH_WIDTH, RGB_MAX};
use crate::error::HashError;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::path::Path;

/// BT.709 relative luminance of an 8-bit RGB pixel, in [0, 1]
pub fn relative_luminance(pixel: &Rgb<u8>) -> f64 {
    let [r, g, b] = pixel.0;
    let r = f64::from(r) / RGB_MAX;
    let g = f64::from(g) / RGB_MAX;
    let b = f64::from(b) / RGB_MAX;
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Reject images that cannot be hashed. Runs before any resampling.
pub fn validate_image(image: &DynamicImage) -> Result<(), HashError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(HashError::InvalidImage {
            reason: format!("dimensions are {}x{}", width, height),
        });
    }
    Ok(())
}

/// Pack one bit per horizontal neighbour pair, row-major.
fn pack_rows<T, F>(grid: &RgbImage, sample: F) -> u64
where
    T: PartialOrd,
    F: Fn(&Rgb<u8>) -> T,
{
    let mut hash = 0u64;
    for row in grid.rows() {
        let mut previous: Option<T> = None;
        for pixel in row {
            let current = sample(pixel);
            if let Some(previous) = previous {
                hash = (hash << 1) | u64::from(current < previous);
            }
            previous = Some(current);
        }
    }
    hash
}

/// Difference Hash (dHash) implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferenceHasher {
    filter: ResampleFilter,
}

impl DifferenceHasher {
    /// Create a new dHash hasher
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// Grayscale dHash using the SIMD resizer
    pub fn hash_image(&self, image: &DynamicImage) -> Result<ImageHash, HashError> {
        let mut resizer = FastResizer::with_filter(self.filter);
        self.hash_image_with(&mut resizer, image)
    }

    /// Per-channel dHashes using the SIMD resizer
    pub fn hash_channels(&self, image: &DynamicImage) -> Result<ChannelHashSet, HashError> {
        let mut resizer = FastResizer::with_filter(self.filter);
        self.hash_channels_with(&mut resizer, image)
    }

    pub fn hash_image_with<R>(
        &self,
        resampler: &mut R,
        image: &DynamicImage,
    ) -> Result<ImageHash, HashError>
    where
        R: Resample + ?Sized,
    {
        let grid = hash_grid(resampler, image)?;
        let hash = ImageHash::new(pack_rows(&grid, relative_luminance));
        tracing::debug!(hash = %hash.to_hex(), "computed dHash");
        Ok(hash)
    }

    pub fn hash_channels_with<R>(
        &self,
        resampler: &mut R,
        image: &DynamicImage,
    ) -> Result<ChannelHashSet, HashError>
    where
        R: Resample + ?Sized,
    {
        let grid = hash_grid(resampler, image)?;
        let channel = |c: Channel| ImageHash::new(pack_rows(&grid, |p| p.0[c.index()]));
        let hashes = ChannelHashSet {
            r: channel(Channel::R),
            g: channel(Channel::G),
            b: channel(Channel::B),
        };
        tracing::debug!(
            r = %hashes.r.to_hex(),
            g = %hashes.g.to_hex(),
            b = %hashes.b.to_hex(),
            "computed RGB dHash"
        );
        Ok(hashes)
    }

    /// Decode a file, then hash it
    pub fn hash_file(&self, path: &Path) -> Result<ImageHash, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
    }

    pub fn hash_file_channels(&self, path: &Path) -> Result<ChannelHashSet, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_channels(&image)
    }
}

/// Validate, then reduce to the 9x8 grid. A source that is already 9x8 is
/// only flattened over black.
fn hash_grid<R>(resampler: &mut R, image: &DynamicImage) -> Result<RgbImage, HashError>
where
    R: Resample + ?Sized,
{
    validate_image(image)?;

    if image.dimensions() == (DHASH_WIDTH, DHASH_HEIGHT) {
        tracing::trace!("source already matches hash grid, skipping resample");
        return Ok(flatten_to_rgb(image));
    }

    let grid = resampler.resample(image, DHASH_WIDTH, DHASH_HEIGHT)?;
    if grid.dimensions() != (DHASH_WIDTH, DHASH_HEIGHT) {
        return Err(HashError::ResampleFailed(format!(
            "resampler produced {}x{}, expected {}x{}",
            grid.width(),
            grid.height(),
            DHASH_WIDTH,
            DHASH_HEIGHT
        )));
    }
    Ok(grid)
}
