//! An image paired with its lazily computed dHash.

use super::algorithms::{validate_image, DifferenceHasher};
use super::traits::ImageHash;
use crate::core::comparator::{hamming_distance, CompareTarget};
use crate::error::HashError;
use image::DynamicImage;
use std::sync::OnceLock;

/// Borrows a validated image and memoizes its grayscale hash.
///
/// The hash is computed on the first call to [`HashedImage::dhash`] and never
/// again for this instance. Two threads racing on the first call both compute
/// the same value and only one is stored.
#[derive(Debug)]
pub struct HashedImage<'a> {
    image: &'a DynamicImage,
    hasher: DifferenceHasher,
    dhash: OnceLock<ImageHash>,
}

impl<'a> HashedImage<'a> {
    /// Wrap an image, rejecting it up front if it cannot be hashed
    pub fn new(image: &'a DynamicImage) -> Result<Self, HashError> {
        Self::with_hasher(image, DifferenceHasher::default())
    }

    pub fn with_hasher(image: &'a DynamicImage, hasher: DifferenceHasher) -> Result<Self, HashError> {
        validate_image(image)?;
        Ok(Self {
            image,
            hasher,
            dhash: OnceLock::new(),
        })
    }

    pub fn image(&self) -> &'a DynamicImage {
        self.image
    }

    /// The cached hash, if it has been computed
    pub fn cached(&self) -> Option<ImageHash> {
        self.dhash.get().copied()
    }

    /// The grayscale dHash, computed on first use
    pub fn dhash(&self) -> Result<ImageHash, HashError> {
        if let Some(hash) = self.dhash.get() {
            return Ok(*hash);
        }
        let hash = self.hasher.hash_image(self.image)?;
        Ok(*self.dhash.get_or_init(|| hash))
    }

    /// Hamming distance between this image and another image or hash.
    ///
    /// A raw image target is hashed with this instance's hasher, so both
    /// sides use the same resampling filter.
    pub fn compare_to(&self, other: CompareTarget<'_>) -> Result<u32, HashError> {
        let other_hash = match other {
            CompareTarget::Hashed(hashed) => hashed.dhash()?,
            CompareTarget::Hash(hash) => hash,
            CompareTarget::Image(image) => {
                HashedImage::with_hasher(image, self.hasher)?.dhash()?
            }
        };
        Ok(hamming_distance(self.dhash()?.value(), other_hash.value()))
    }
}
