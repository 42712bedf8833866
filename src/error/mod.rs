//! # Error Module
//!
//! Error types for hashing, comparison and directory scanning.
//!
//! ## Design Principles
//! - **Never panic** on caller data - return errors instead
//! - **Fail before work** - invalid images are rejected before resampling
//! - **Include context** - paths, inputs, what went wrong

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ImgHashError {
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors that occur during image hashing
#[derive(Error, Debug)]
pub enum HashError {
    /// The image cannot be hashed (zero width or height)
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("Resampling to the hash grid failed: {0}")]
    ResampleFailed(String),

    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while comparing hashes
#[derive(Error, Debug)]
pub enum CompareError {
    /// The operand is neither a hash literal nor a decodable image
    #[error("Invalid image or hash: {input}")]
    InvalidImageOrHash { input: String },

    #[error("Invalid threshold: {value} (must be 0-64)")]
    InvalidThreshold { value: u32 },

    /// A bare hash literal carries no per-channel hashes
    #[error("Per-channel comparison needs an image, got hash {input}")]
    ChannelsNeedImage { input: String },
}

/// Errors that occur during directory scanning
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ImgHashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_image_message_leads_with_kind() {
        let error = HashError::InvalidImage {
            reason: "width is 0".to_string(),
        };
        let message = error.to_string();
        assert!(message.starts_with("Invalid image"));
        assert!(message.contains("width is 0"));
    }

    #[test]
    fn invalid_operand_includes_input() {
        let error = CompareError::InvalidImageOrHash {
            input: "not-a-hash".to_string(),
        };
        assert!(error.to_string().contains("not-a-hash"));
    }

    #[test]
    fn hash_error_converts_to_top_level() {
        let error: ImgHashError = HashError::ResampleFailed("boom".to_string()).into();
        assert!(matches!(error, ImgHashError::Hash(HashError::ResampleFailed(_))));
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn json_failure_converts_to_output_error() {
        let json_error = serde_json::from_str::<u64>("not json").unwrap_err();
        let error: ImgHashError = json_error.into();
        assert!(matches!(error, ImgHashError::Output(_)));
        assert!(error.to_string().starts_with("Failed to render output"));
    }
}
