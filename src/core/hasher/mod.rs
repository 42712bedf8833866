//! # Hasher Module
//!
//! Computes 64-bit difference hashes (dHash) for images.
//!
//! ## How It Works
//! 1. Reject images with a zero dimension
//! 2. Resample to a 9x8 RGB grid (one extra column for the comparisons)
//! 3. Compare each pixel to its left neighbour, per row
//! 4. Pack the 64 "is darker" bits, first comparison most significant
//!
//! The grayscale variant compares BT.709 luminance. The RGB variant runs the
//! same scan independently on the raw red, green and blue values.
//!
//! ## Example
//! ```rust,ignore
//! use img_hasher::core::hasher::{HasherConfig, ResampleFilter};
//!
//! let hasher = HasherConfig::new()
//!     .filter(ResampleFilter::Area)
//!     .build();
//!
//! let hash = hasher.hash_file(&path)?;
//! ```

mod algorithms;
pub mod fast_decode;
pub mod fast_resize;
mod hashed_image;
mod traits;

pub use algorithms::{relative_luminance, validate_image, DifferenceHasher};
pub use fast_decode::FastDecoder;
pub use fast_resize::{FastResizer, ResampleFilter};
pub use hashed_image::HashedImage;
pub use traits::{
    Channel, ChannelDistances, ChannelHashSet, ImageHash, ParseHashError, PerceptualHash,
    Resample,
};

use crate::error::HashError;
use image::DynamicImage;

/// Width of the resampled grid; one more than the bits per row
pub const DHASH_WIDTH: u32 = 9;
/// Height of the resampled grid; one row of bits each
pub const DHASH_HEIGHT: u32 = 8;
/// Maximum value of an 8-bit channel, used to normalise luminance input
pub const RGB_MAX: f64 = 255.0;
/// Bits in every hash produced here
pub const HASH_BITS: u32 = (DHASH_WIDTH - 1) * DHASH_HEIGHT;

/// Configuration builder for hashers
#[derive(Debug, Clone, Default)]
pub struct HasherConfig {
    /// Kernel used to reduce the source to the hash grid
    filter: ResampleFilter,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resampling filter.
    ///
    /// Hashes are only comparable when both sides used the same filter.
    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Build the hasher
    pub fn build(self) -> DifferenceHasher {
        DifferenceHasher::new(self.filter)
    }
}

/// Grayscale dHash with the default configuration
pub fn dhash(image: &DynamicImage) -> Result<ImageHash, HashError> {
    DifferenceHasher::default().hash_image(image)
}

/// Per-channel dHashes with the default configuration
pub fn dhash_rgb(image: &DynamicImage) -> Result<ChannelHashSet, HashError> {
    DifferenceHasher::default().hash_channels(image)
}
