//! Hostile archive scenarios: zip-slip, decompression bombs, entry floods.

#![allow(clippy::unwrap_used)]

use mockup_core::ExtractionError;
use mockup_core::ExtractionLimits;
use mockup_core::QuotaResource;
use mockup_core::VersionedStorage;
use mockup_core::test_utils::ZipTestBuilder;
use std::fs;
use tempfile::TempDir;

fn storage(temp: &TempDir) -> VersionedStorage {
    VersionedStorage::new(temp.path().join("uploads"))
}

#[test]
fn test_zip_slip_entries_skipped_and_valid_entries_kept() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp);

    let bytes = ZipTestBuilder::new()
        .add_file("index.html", b"ok")
        .add_file("../outside.html", b"evil")
        .add_file("../../outside2.html", b"evil")
        .add_file("assets/../../sibling.txt", b"evil")
        .add_file("/tmp/absolute-mockup-escape.txt", b"evil")
        .add_file("assets/app.js", b"ok")
        .build();

    let report = storage.extract("v1", &bytes).unwrap();

    assert_eq!(report.files_extracted, 2);
    assert_eq!(report.entries_skipped, 4);
    assert!(storage.resolve_path("v1", "index.html").exists());
    assert!(storage.resolve_path("v1", "assets/app.js").exists());
    assert!(!temp.path().join("uploads/outside.html").exists());
    assert!(!temp.path().join("outside2.html").exists());
    assert!(!temp.path().join("uploads/sibling.txt").exists());
}

#[test]
fn test_sibling_version_not_writable() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp);

    let bytes = ZipTestBuilder::new()
        .add_file("index.html", b"ok")
        .add_file("../v10/index.html", b"evil")
        .build();
    storage.extract("v1", &bytes).unwrap();

    assert!(!temp.path().join("uploads/v10").exists());
}

#[test]
fn test_too_many_entries_rejected_before_any_write() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp);

    let mut builder = ZipTestBuilder::new().add_file("index.html", b"x");
    for i in 0..1000 {
        builder = builder.add_file(&format!("f{i}.txt"), b"x");
    }
    let result = storage.extract("v1", &builder.build());

    assert!(matches!(
        result,
        Err(ExtractionError::TooManyEntries {
            count: 1001,
            max: 1000
        })
    ));
    assert!(!temp.path().join("uploads").exists());
}

#[test]
fn test_exactly_max_entries_allowed() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp);

    let mut builder = ZipTestBuilder::new().add_file("index.html", b"x");
    for i in 0..999 {
        builder = builder.add_file(&format!("f{i}.txt"), b"x");
    }
    let report = storage.extract("v1", &builder.build()).unwrap();
    assert_eq!(report.files_extracted, 1000);
}

#[test]
fn test_decompression_bomb_halts_extraction() {
    let temp = TempDir::new().unwrap();
    let limits = ExtractionLimits {
        max_total_size: 1024 * 1024,
        ..Default::default()
    };
    let storage = VersionedStorage::with_limits(temp.path(), limits);

    let zeros = vec![0u8; 8 * 1024 * 1024];
    let bytes = ZipTestBuilder::new()
        .add_file("index.html", b"ok")
        .add_deflated_file("bomb.bin", &zeros)
        .add_file("after.html", b"never written")
        .build();
    assert!(bytes.len() < 64 * 1024, "payload should be highly compressed");

    let err = storage.extract("v1", &bytes).unwrap_err();
    assert!(matches!(
        err.quota_resource(),
        Some(QuotaResource::TotalSize { max, .. }) if *max == 1024 * 1024
    ));

    // the bomb was cut one byte past the remaining budget
    let written = fs::metadata(temp.path().join("v1/bomb.bin")).unwrap().len();
    assert_eq!(written, 1024 * 1024 - 2 + 1);
    assert!(!temp.path().join("v1/after.html").exists());
}

#[test]
fn test_budget_is_cumulative_across_entries() {
    let temp = TempDir::new().unwrap();
    let limits = ExtractionLimits {
        max_total_size: 1000,
        ..Default::default()
    };
    let storage = VersionedStorage::with_limits(temp.path(), limits);

    let chunk = vec![b'x'; 300];
    let bytes = ZipTestBuilder::new()
        .add_file("a.html", &chunk)
        .add_file("b.html", &chunk)
        .add_file("c.html", &chunk)
        .add_file("d.html", &chunk)
        .build();

    let result = storage.extract("v1", &bytes);
    assert!(matches!(result, Err(ExtractionError::QuotaExceeded { .. })));
    assert!(temp.path().join("v1/c.html").exists());
}

#[test]
fn test_directory_entries_only_create_directories() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp);

    let bytes = ZipTestBuilder::new()
        .add_directory("a/b/c")
        .add_directory("../escape-dir")
        .add_file("index.html", b"x")
        .build();
    let report = storage.extract("v1", &bytes).unwrap();

    assert_eq!(report.directories_created, 1);
    assert_eq!(report.entries_skipped, 1);
    assert!(storage.resolve_path("v1", "a/b/c").is_dir());
    assert!(!temp.path().join("uploads/escape-dir").exists());
}

#[test]
fn test_truncated_archive_is_format_error() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp);

    let bytes = ZipTestBuilder::new().add_file("index.html", b"x").build();
    let truncated = &bytes[..bytes.len() / 2];
    let result = storage.extract("v1", truncated);

    assert!(matches!(result, Err(ExtractionError::Format(_))));
    assert!(!temp.path().join("uploads").exists());
}
