//! # Pipeline Module
//!
//! Batch near-duplicate detection over directories.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover image files in the given directories
//! 2. **Hash** - Decode and dHash every file
//! 3. **Compare** - Keep pairs within the Hamming threshold
//! 4. **Group** - Merge pairs into transitive clusters
//!
//! ## Parallelism
//! Uses rayon for parallel hashing across multiple CPU cores.

mod executor;

pub use executor::{
    hash_files, HashBatch, HashFailure, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult,
};
