//! Hash algorithm implementations.

mod difference;

pub use difference::{relative_luminance, validate_image, DifferenceHasher};
