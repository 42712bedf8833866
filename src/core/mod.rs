//! # Core Module
//!
//! The dHash engine and the batch tooling built on it.
//!
//! ## Modules
//! - `hasher` - Computes 64-bit difference hashes (grayscale and per channel)
//! - `comparator` - Hamming distance, compare targets, near-duplicate grouping
//! - `scanner` - Discovers image files in directories
//! - `pipeline` - Scans, hashes and groups a set of directories

pub mod comparator;
pub mod hasher;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{hamming_distance, CompareTarget, DuplicateGroup, MatchResult, MatchType};
pub use hasher::{ChannelHashSet, DifferenceHasher, HashedImage, ImageHash, PerceptualHash};
pub use scanner::ImageFile;
