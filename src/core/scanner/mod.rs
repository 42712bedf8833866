//! # Scanner Module
//!
//! Discovers image files in directories for batch hashing.
//!
//! ## Supported Formats
//! Anything the `image` crate decodes by default and we recognise by
//! extension: JPEG, PNG, WebP, GIF, BMP, TIFF.
//!
//! ## Example
//! ```rust,ignore
//! use img_hasher::core::scanner::{ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(&["/Users/photos".into()]);
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A discovered image file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    pub path: PathBuf,
    pub format: ImageFormat,
}

/// Image formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
    Tiff,
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "webp" => ImageFormat::WebP,
            "gif" => ImageFormat::Gif,
            "bmp" => ImageFormat::Bmp,
            "tiff" | "tif" => ImageFormat::Tiff,
            _ => ImageFormat::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }
}

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Successfully discovered images
    pub images: Vec<ImageFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_format_from_extension_lowercase() {
        assert_eq!(ImageFormat::from_extension("jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("tif"), ImageFormat::Tiff);
    }

    #[test]
    fn image_format_from_extension_uppercase() {
        assert_eq!(ImageFormat::from_extension("JPG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("PNG"), ImageFormat::Png);
    }

    #[test]
    fn image_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.JPEG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("no_extension")), ImageFormat::Unknown);
    }
}
