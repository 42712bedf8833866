//! Integration tests for the pipeline module.
//!
//! These tests verify end-to-end pipeline behavior including:
//! - Empty directories
//! - Nonexistent paths
//! - Corrupt files
//! - Grouping of resized copies

use assert_fs::prelude::*;
use image::{Rgb, RgbImage};
use img_hasher::core::hasher::ResampleFilter;
use img_hasher::core::pipeline::Pipeline;
use img_hasher::core::MatchType;
use predicates::prelude::*;
use std::path::PathBuf;

fn checkerboard(size: u32, cell: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgb([240, 240, 240])
        } else {
            Rgb([15, 15, 15])
        }
    })
}

fn horizontal_ramp(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1)) as u8;
        Rgb([v, v / 2, 255 - v])
    })
}

#[test]
fn pipeline_handles_empty_directory() {
    let temp = assert_fs::TempDir::new().unwrap();

    let result = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .build()
        .run()
        .unwrap();

    assert_eq!(result.total_photos, 0);
    assert!(result.groups.is_empty());
    assert!(result.scan_errors.is_empty());
}

#[test]
fn pipeline_handles_corrupt_file_gracefully() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("corrupt.jpg")
        .write_binary(b"this is not a valid image file")
        .unwrap();

    let result = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .build()
        .run()
        .unwrap();

    assert_eq!(result.total_photos, 1);
    assert_eq!(result.failures.len(), 1);
    assert!(predicate::str::ends_with("corrupt.jpg")
        .eval(&result.failures[0].path.to_string_lossy()));
}

#[test]
fn pipeline_records_nonexistent_path() {
    let result = Pipeline::builder()
        .paths(vec![PathBuf::from("/nonexistent/path/that/does/not/exist")])
        .build()
        .run()
        .unwrap();

    assert_eq!(result.total_photos, 0);
    assert_eq!(result.scan_errors.len(), 1);
    assert!(predicate::str::contains("Directory not found").eval(&result.scan_errors[0]));
}

#[test]
fn pipeline_groups_resized_copies_across_subdirectories() {
    let temp = assert_fs::TempDir::new().unwrap();
    let nested = temp.child("nested");
    nested.create_dir_all().unwrap();

    checkerboard(256, 32).save(temp.child("board.png").path()).unwrap();
    checkerboard(128, 16).save(nested.child("board_small.png").path()).unwrap();
    horizontal_ramp(200, 100).save(temp.child("ramp.png").path()).unwrap();

    let result = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .threshold(2)
        .filter(ResampleFilter::Area)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.total_photos, 3);
    assert_eq!(result.hashes.len(), 3);
    assert_eq!(result.groups.len(), 1);

    let group = &result.groups[0];
    assert_eq!(group.photos.len(), 2);
    assert!(group.match_type.is_duplicate());
    assert!(group
        .photos
        .iter()
        .all(|p| predicate::str::contains("board").eval(&p.to_string_lossy())));
}

#[test]
fn identical_files_form_an_exact_group() {
    let temp = assert_fs::TempDir::new().unwrap();
    let ramp = horizontal_ramp(90, 80);
    ramp.save(temp.child("one.png").path()).unwrap();
    ramp.save(temp.child("two.png").path()).unwrap();

    let result = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .threshold(0)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].match_type, MatchType::Exact);
    assert_eq!(result.groups[0].average_distance, 0.0);
}

#[test]
fn pipeline_result_serializes_to_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    horizontal_ramp(40, 30).save(temp.child("ramp.png").path()).unwrap();

    let result = Pipeline::builder()
        .paths(vec![temp.path().to_path_buf()])
        .build()
        .run()
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["total_photos"], 1);
    assert!(json["hashes"][0][1].is_u64());
    assert!(json["scan_errors"].as_array().unwrap().is_empty());
    assert!(json["failures"].as_array().unwrap().is_empty());
}
