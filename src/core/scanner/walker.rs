//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{ImageFile, ImageFormat, ScanResult};
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    /// Scan every root. A missing root is recorded as an error, not fatal.
    pub fn scan(&self, paths: &[PathBuf]) -> ScanResult {
        let mut result = ScanResult::default();

        for root in paths {
            match self.scan_directory(root, &mut result) {
                Ok(()) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "skipping scan root");
                    result.errors.push(e);
                }
            }
        }

        tracing::debug!(
            images = result.images.len(),
            errors = result.errors.len(),
            "scan complete"
        );
        result
    }

    fn scan_directory(&self, root: &Path, result: &mut ScanResult) -> Result<(), ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        // The root itself is always walked, even if its name starts with '.'
        let entries = walker
            .into_iter()
            .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    result.errors.push(ScanError::ReadDirectory {
                        path,
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.filter.should_include(path) {
                continue;
            }

            result.images.push(ImageFile {
                path: path.to_path_buf(),
                format: ImageFormat::from_path(path),
            });
        }

        Ok(())
    }
}

impl Default for WalkDirScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::default();

        let result = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert!(result.images.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_detects_multiple_formats() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "photo.jpg");
        create_test_file(temp_dir.path(), "photo.png");
        create_test_file(temp_dir.path(), "photo.webp");

        let result = WalkDirScanner::default().scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(result.images.len(), 3);
        let formats: Vec<_> = result.images.iter().map(|p| p.format).collect();
        assert!(formats.contains(&ImageFormat::Jpeg));
        assert!(formats.contains(&ImageFormat::Png));
        assert!(formats.contains(&ImageFormat::WebP));
    }

    #[test]
    fn scan_excludes_non_image_files() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "photo.jpg");
        create_test_file(temp_dir.path(), "document.txt");

        let result = WalkDirScanner::default().scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(result.images.len(), 1);
        assert!(result.images[0].path.ends_with("photo.jpg"));
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        create_test_file(temp_dir.path(), "root.jpg");
        create_test_file(&subdir, "nested.jpg");

        let result = WalkDirScanner::default().scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(result.images.len(), 2);
    }

    #[test]
    fn scan_respects_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        create_test_file(temp_dir.path(), "root.jpg");
        create_test_file(&subdir, "nested.jpg");

        let scanner = WalkDirScanner::new(ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        });
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(result.images.len(), 1);
    }

    #[test]
    fn scan_skips_hidden_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".thumbnails");
        fs::create_dir(&hidden_dir).unwrap();
        create_test_file(temp_dir.path(), "visible.jpg");
        create_test_file(temp_dir.path(), ".hidden.jpg");
        create_test_file(&hidden_dir, "thumb.jpg");

        let result = WalkDirScanner::default().scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(result.images.len(), 1);
        assert!(result.images[0].path.ends_with("visible.jpg"));
    }

    #[test]
    fn scan_can_include_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".thumbnails");
        fs::create_dir(&hidden_dir).unwrap();
        create_test_file(temp_dir.path(), "visible.jpg");
        create_test_file(temp_dir.path(), ".hidden.jpg");
        create_test_file(&hidden_dir, "thumb.jpg");

        let scanner = WalkDirScanner::new(ScanConfig {
            include_hidden: true,
            ..Default::default()
        });
        let result = scanner.scan(&[temp_dir.path().to_path_buf()]);

        assert_eq!(result.images.len(), 3);
    }

    #[test]
    fn scan_nonexistent_directory_records_error() {
        let result = WalkDirScanner::default().scan(&[PathBuf::from("/nonexistent/path/12345")]);

        assert!(result.images.is_empty());
        assert!(matches!(
            result.errors.as_slice(),
            [ScanError::DirectoryNotFound { .. }]
        ));
    }
}
