//! Hash value types and the resampling seam.

use super::HASH_BITS;
use crate::core::comparator::hamming_distance;
use crate::error::HashError;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32 {
        HASH_BITS
    }

    /// Calculate similarity as a percentage (0-100)
    fn similarity(&self, other: &Self) -> f64 {
        let distance = self.distance(other);
        let max_distance = self.bit_count();
        if max_distance == 0 {
            return 100.0;
        }
        (1.0 - (distance as f64 / max_distance as f64)) * 100.0
    }
}

/// A 64-bit difference hash.
///
/// Bits are packed row-major, top to bottom and left to right, with the
/// first comparison in the most significant bit. Stored hashes depend on
/// this layout, so it must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHash(u64);

impl ImageHash {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw 64-bit value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Big-endian bytes, first row first
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Fixed-width lowercase hex (16 digits)
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl PerceptualHash for ImageHash {
    fn distance(&self, other: &Self) -> u32 {
        hamming_distance(self.0, other.0)
    }
}

impl From<u64> for ImageHash {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ImageHash> for u64 {
    fn from(hash: ImageHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ImageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Error returned when a string is not a hash literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHashError(String);

impl fmt::Display for ParseHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a 64-bit hash literal: {}", self.0)
    }
}

impl std::error::Error for ParseHashError {}

impl FromStr for ImageHash {
    type Err = ParseHashError;

    /// Accepts a decimal integer or a `0x`-prefixed hex value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ImageHash)
            .map_err(|_| ParseHashError(s.to_string()))
    }
}

/// One of the three colour channels hashed by `hash_channels`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    R,
    G,
    B,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::R, Channel::G, Channel::B];

    /// Channel name as used in serialized hash sets
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::R => "r",
            Channel::G => "g",
            Channel::B => "b",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent dHashes of the red, green and blue channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelHashSet {
    pub r: ImageHash,
    pub g: ImageHash,
    pub b: ImageHash,
}

impl ChannelHashSet {
    pub fn get(&self, channel: Channel) -> ImageHash {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
        }
    }

    /// Per-channel Hamming distances
    pub fn distance(&self, other: &Self) -> ChannelDistances {
        ChannelDistances {
            r: self.r.distance(&other.r),
            g: self.g.distance(&other.g),
            b: self.b.distance(&other.b),
        }
    }

    /// Iterate `(channel, hash)` pairs in r, g, b order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, ImageHash)> + '_ {
        Channel::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Result of comparing two channel hash sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDistances {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl ChannelDistances {
    pub fn get(&self, channel: Channel) -> u32 {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
        }
    }

    /// The largest of the three channel distances
    pub fn max(&self) -> u32 {
        self.r.max(self.g).max(self.b)
    }
}

/// Reduces an image to a small fixed RGB grid.
///
/// Implementations decide the interpolation kernel. Callers validate the
/// image before calling, so implementations may assume non-zero dimensions.
pub trait Resample {
    fn resample(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, HashError>;
}
