//! # Comparator Module
//!
//! Scores similarity between dHashes.
//!
//! ## How It Works
//! 1. XOR the two 64-bit hashes
//! 2. Count the set bits (Hamming distance, 0-64)
//! 3. Classify the distance and group near-duplicates
//!
//! ## Comparison Thresholds
//! | Distance | Classification |
//! |----------|---------------|
//! | 0        | Exact match   |
//! | 1-4      | Near-exact    |
//! | 5-10     | Similar       |
//! | 11+      | Different     |

mod grouper;
mod traits;

pub use grouper::TransitiveGrouper;
pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::hasher::{
    ChannelHashSet, DifferenceHasher, FastDecoder, HashedImage, ImageHash, PerceptualHash,
};
use crate::error::{CompareError, ImgHashError};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of bit positions in which two 64-bit hashes differ
#[inline]
pub fn hamming_distance(hash_a: u64, hash_b: u64) -> u32 {
    (hash_a ^ hash_b).count_ones()
}

/// Compare every pair of hashes and keep those the strategy accepts.
///
/// Pairs are reported in input order, `photo_a` before `photo_b`.
pub fn find_duplicate_pairs(
    hashes: &[(PathBuf, ImageHash)],
    strategy: &dyn ComparisonStrategy,
) -> Vec<MatchResult> {
    let mut matches = Vec::new();
    for (i, (path_a, hash_a)) in hashes.iter().enumerate() {
        for (path_b, hash_b) in &hashes[i + 1..] {
            let distance = hash_a.distance(hash_b);
            if strategy.is_duplicate(distance) {
                matches.push(MatchResult {
                    photo_a: path_a.clone(),
                    photo_b: path_b.clone(),
                    distance,
                    similarity_percent: hash_a.similarity(hash_b),
                    match_type: strategy.classify(distance),
                });
            }
        }
    }
    matches
}

/// Something a [`HashedImage`] can be compared against
#[derive(Debug, Clone, Copy)]
pub enum CompareTarget<'a> {
    /// Another wrapped image; its cached hash is reused or filled in
    Hashed(&'a HashedImage<'a>),
    /// A previously computed hash, used as-is
    Hash(ImageHash),
    /// A raw image, hashed transiently
    Image(&'a DynamicImage),
}

impl From<ImageHash> for CompareTarget<'_> {
    fn from(hash: ImageHash) -> Self {
        CompareTarget::Hash(hash)
    }
}

impl<'a> From<&'a HashedImage<'a>> for CompareTarget<'a> {
    fn from(hashed: &'a HashedImage<'a>) -> Self {
        CompareTarget::Hashed(hashed)
    }
}

impl<'a> From<&'a DynamicImage> for CompareTarget<'a> {
    fn from(image: &'a DynamicImage) -> Self {
        CompareTarget::Image(image)
    }
}

/// An owned comparison operand, as supplied from outside the process
#[derive(Debug, Clone)]
pub enum CompareOperand {
    Hash(ImageHash),
    Image(DynamicImage),
}

impl CompareOperand {
    /// Interpret an argument as a hash literal, falling back to an image path.
    ///
    /// Anything that is neither fails with `InvalidImageOrHash`.
    pub fn parse(input: &str) -> Result<Self, CompareError> {
        if let Ok(hash) = input.parse::<ImageHash>() {
            return Ok(CompareOperand::Hash(hash));
        }

        let path = Path::new(input);
        match FastDecoder::decode(path) {
            Ok(image) => Ok(CompareOperand::Image(image)),
            Err(e) => {
                tracing::debug!(input, error = %e, "operand is neither hash nor image");
                Err(CompareError::InvalidImageOrHash {
                    input: input.to_string(),
                })
            }
        }
    }

    /// Per-channel hashes of an image operand
    pub fn channel_hashes(&self, hasher: &DifferenceHasher) -> Result<ChannelHashSet, ImgHashError> {
        match self {
            CompareOperand::Image(image) => Ok(hasher.hash_channels(image)?),
            CompareOperand::Hash(hash) => Err(CompareError::ChannelsNeedImage {
                input: hash.to_string(),
            }
            .into()),
        }
    }

    pub fn as_target(&self) -> CompareTarget<'_> {
        match self {
            CompareOperand::Hash(hash) => CompareTarget::Hash(*hash),
            CompareOperand::Image(image) => CompareTarget::Image(image),
        }
    }
}

/// Result of comparing two photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Path to the first photo
    pub photo_a: PathBuf,
    /// Path to the second photo
    pub photo_b: PathBuf,
    /// Hamming distance between hashes
    pub distance: u32,
    /// Similarity as a percentage (0-100)
    pub similarity_percent: f64,
    /// Classification of the match
    pub match_type: MatchType,
}

/// Classification of match types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Distance = 0, identical perceptual content
    Exact,
    /// Distance 1-4, virtually identical
    NearExact,
    /// Distance 5-10, likely duplicates
    Similar,
    /// Distance 11+, possibly related
    MaybeSimilar,
}

impl MatchType {
    /// Classify based on Hamming distance
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => MatchType::Exact,
            1..=4 => MatchType::NearExact,
            5..=10 => MatchType::Similar,
            _ => MatchType::MaybeSimilar,
        }
    }

    /// Check if this match type is considered a duplicate
    pub fn is_duplicate(&self) -> bool {
        matches!(self, MatchType::Exact | MatchType::NearExact | MatchType::Similar)
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "Exact Match"),
            MatchType::NearExact => write!(f, "Near-Exact Match"),
            MatchType::Similar => write!(f, "Similar"),
            MatchType::MaybeSimilar => write!(f, "Possibly Similar"),
        }
    }
}

/// A group of near-duplicate photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// All photos in the group, sorted by path
    pub photos: Vec<PathBuf>,
    /// The photo listed first when reporting
    pub representative: PathBuf,
    /// The closest match type seen in the group
    pub match_type: MatchType,
    /// Average distance within the group
    pub average_distance: f64,
}

impl DuplicateGroup {
    /// Create a new duplicate group
    pub fn new(photos: Vec<PathBuf>, representative: PathBuf, match_type: MatchType) -> Self {
        Self {
            photos,
            representative,
            match_type,
            average_distance: 0.0,
        }
    }

    /// Get the number of duplicates (excluding the representative)
    pub fn duplicate_count(&self) -> usize {
        self.photos.len().saturating_sub(1)
    }
}
