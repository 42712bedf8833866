//! # img-hasher
//!
//! Perceptual difference hashes (dHash) for near-duplicate image detection.
//!
//! An image is reduced to a 9x8 grid and every pixel is compared with its
//! left neighbour, giving a 64-bit fingerprint. Two fingerprints are compared
//! by Hamming distance: 0 means perceptually identical, 64 means opposite.
//!
//! ## Architecture
//! - `core` - Hashing, comparison, scanning and the batch pipeline
//! - `error` - Error types
//!
//! ## Example
//! ```rust,ignore
//! use img_hasher::core::{CompareTarget, HashedImage};
//!
//! let a = image::open("a.png")?;
//! let b = image::open("b.png")?;
//! let hashed = HashedImage::new(&a)?;
//! let distance = hashed.compare_to(CompareTarget::Image(&b))?;
//! ```

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use crate::core::hasher::{dhash, dhash_rgb};
pub use crate::core::{hamming_distance, ChannelHashSet, HashedImage, ImageHash};
pub use error::{ImgHashError, Result};

/// Initialize tracing for the binary
///
/// This should be called by the application entry point. The library
/// itself never installs a subscriber.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
