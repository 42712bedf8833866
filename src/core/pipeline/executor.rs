//! Pipeline execution implementation.

use crate::core::comparator::{
    find_duplicate_pairs, ComparisonStrategy, DuplicateGroup, ThresholdStrategy,
    TransitiveGrouper,
};
use crate::core::hasher::{DifferenceHasher, HasherConfig, ImageHash, ResampleFilter};
use crate::core::scanner::{ScanConfig, WalkDirScanner};
use crate::error::{HashError, ImgHashError};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A file that was discovered but could not be hashed
#[derive(Debug, Clone, Serialize)]
pub struct HashFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of hashing a batch of files
#[derive(Debug)]
pub struct HashBatch<T> {
    /// Successfully hashed files, in input order
    pub hashed: Vec<(PathBuf, T)>,
    /// Files that failed to decode or hash, in input order
    pub failures: Vec<HashFailure>,
}

/// Hash every path on the rayon pool.
///
/// A file that fails is recorded in `failures` and logged; it never stops the
/// batch. `on_hashed` runs once per path, from worker threads.
pub fn hash_files<T, F, H>(paths: &[PathBuf], hash: F, on_hashed: H) -> HashBatch<T>
where
    T: Send,
    F: Fn(&Path) -> Result<T, HashError> + Sync,
    H: Fn(&Path) + Sync,
{
    let outcomes: Vec<Result<(PathBuf, T), HashFailure>> = paths
        .par_iter()
        .map(|path| {
            let outcome = hash(path)
                .map(|value| (path.clone(), value))
                .map_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "failed to hash");
                    HashFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                });
            on_hashed(path);
            outcome
        })
        .collect();

    let mut batch = HashBatch {
        hashed: Vec::with_capacity(outcomes.len()),
        failures: Vec::new(),
    };
    for outcome in outcomes {
        match outcome {
            Ok(hashed) => batch.hashed.push(hashed),
            Err(failure) => batch.failures.push(failure),
        }
    }
    batch
}

/// Result of pipeline execution
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    /// All near-duplicate groups found
    pub groups: Vec<DuplicateGroup>,
    /// Image files discovered by the scan
    pub total_photos: usize,
    /// Successfully hashed files, sorted by path
    pub hashes: Vec<(PathBuf, ImageHash)>,
    /// Files that failed to decode or hash (non-fatal)
    pub failures: Vec<HashFailure>,
    /// Scan errors, as messages (non-fatal)
    pub scan_errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directories to scan
    pub paths: Vec<PathBuf>,
    /// Maximum Hamming distance for a near-duplicate (0-64)
    pub threshold: u32,
    /// Resampling filter for every hash in the run
    pub filter: ResampleFilter,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            threshold: ThresholdStrategy::balanced().threshold(),
            filter: ResampleFilter::default(),
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    /// Set the comparison threshold
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.config.filter = filter;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

/// The near-duplicate detection pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without progress reporting
    pub fn run(&self) -> Result<PipelineResult, ImgHashError> {
        self.run_with_progress(|_, _| {}, |_| {})
    }

    /// Run the pipeline.
    ///
    /// `on_scanned` receives the number of files found before hashing starts.
    /// `on_hashed` is called once per file from rayon worker threads, whether
    /// hashing succeeded or not.
    pub fn run_with_progress<S, H>(
        &self,
        on_scanned: S,
        on_hashed: H,
    ) -> Result<PipelineResult, ImgHashError>
    where
        S: FnOnce(usize, &[String]),
        H: Fn(&Path) + Sync,
    {
        let start_time = Instant::now();
        let strategy = ThresholdStrategy::checked(self.config.threshold)?;

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan(&self.config.paths);
        let scan_errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();
        let total_photos = scan_result.images.len();
        on_scanned(total_photos, &scan_errors);

        let hasher: DifferenceHasher = HasherConfig::new().filter(self.config.filter).build();

        let paths: Vec<PathBuf> = scan_result.images.into_iter().map(|image| image.path).collect();
        let HashBatch {
            hashed: mut hashes,
            failures,
        } = hash_files(&paths, |path| hasher.hash_file(path), on_hashed);
        hashes.sort_by(|a, b| a.0.cmp(&b.0));

        let matches = find_duplicate_pairs(&hashes, &strategy);
        let groups = TransitiveGrouper::new().group(&matches);

        tracing::info!(
            photos = total_photos,
            hashed = hashes.len(),
            failed = failures.len(),
            groups = groups.len(),
            "pipeline complete"
        );

        Ok(PipelineResult {
            groups,
            total_photos,
            hashes,
            failures,
            scan_errors,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
