//! Directory-level tests: enumeration, skips, totals, cancellation.

mod common;

use common::*;
use image::ImageFormat;
use palettize::error::{BatchError, CompressError, EncodeError};
use palettize::services::{BatchEvent, BatchRunner, CancelFlag};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn force_fallback(_: &Path) -> Result<u64, EncodeError> {
    Ok(u64::MAX)
}

/// Sources a, b and c, with `dest/b.bmp` blocked by a directory.
fn blocked_batch() -> TestDirs {
    let dirs = TestDirs::new();
    for name in ["a.bmp", "b.bmp", "c.bmp"] {
        dirs.add_image(name, &gradient(32, 32), ImageFormat::Bmp);
    }
    fs::create_dir_all(dirs.dest.join("b.bmp")).unwrap();
    dirs
}

#[test]
fn test_empty_source_dir() {
    let dirs = TestDirs::new();

    let report = BatchRunner::new(test_compressor(16))
        .run(&dirs.source, &dirs.dest)
        .unwrap();

    assert_eq!(report.totals.count, 0);
    assert_eq!(report.to_string(), "No input files");
    assert!(dirs.dest.is_dir());
}

#[test]
fn test_every_image_lands_in_destination() {
    let dirs = TestDirs::new();
    dirs.add_image("b.bmp", &gradient(32, 32), ImageFormat::Bmp);
    dirs.add_image("a.png", &gradient(24, 24), ImageFormat::Png);
    dirs.add_image("c.bmp", &few_colors(16, 16, &[[1, 2, 3], [200, 100, 0]]), ImageFormat::Bmp);

    let report = BatchRunner::new(test_compressor(16))
        .run(&dirs.source, &dirs.dest)
        .unwrap();

    let names: Vec<String> = report.results.iter().map(|r| r.file_name()).collect();
    assert_eq!(names, vec!["a.png", "b.bmp", "c.bmp"]);
    assert_eq!(report.totals.count, 3);

    let mut source_bytes = 0;
    let mut destination_bytes = 0;
    for result in &report.results {
        assert!(result.destination_size <= result.source_size);
        assert_eq!(
            fs::metadata(&result.destination).unwrap().len(),
            result.destination_size
        );
        source_bytes += result.source_size;
        destination_bytes += result.destination_size;
    }
    assert_eq!(report.totals.source_bytes, source_bytes);
    assert_eq!(report.totals.destination_bytes, destination_bytes);
}

#[test]
fn test_non_image_is_skipped_and_excluded_from_totals() {
    let dirs = TestDirs::new();
    let image = dirs.add_image("a.bmp", &gradient(32, 32), ImageFormat::Bmp);
    dirs.add_file("readme.txt", b"hello");

    let mut events = Vec::new();
    let report = BatchRunner::new(test_compressor(16))
        .run_with(&dirs.source, &dirs.dest, |event| {
            events.push(match event {
                BatchEvent::Compressed(r) => format!("ok {}", r.file_name()),
                BatchEvent::Skipped(s) => format!("skip {}", s.file_name()),
            });
        })
        .unwrap();

    assert_eq!(events, vec!["ok a.bmp", "skip readme.txt"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.totals.count, 1);
    assert_eq!(
        report.totals.source_bytes,
        fs::metadata(&image).unwrap().len()
    );
    assert!(!dirs.dest.join("readme.txt").exists());
}

#[test]
fn test_subdirectories_are_ignored() {
    let dirs = TestDirs::new();
    dirs.add_image("a.bmp", &gradient(16, 16), ImageFormat::Bmp);
    fs::create_dir(dirs.source.join("nested")).unwrap();

    let report = BatchRunner::new(test_compressor(8))
        .run(&dirs.source, &dirs.dest)
        .unwrap();

    assert_eq!(report.totals.count, 1);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_cancelled_before_start() {
    let dirs = TestDirs::new();
    dirs.add_image("a.bmp", &gradient(16, 16), ImageFormat::Bmp);
    let cancel = CancelFlag::new();
    cancel.cancel();

    let report = BatchRunner::new(test_compressor(8))
        .with_cancel_flag(cancel)
        .run(&dirs.source, &dirs.dest)
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.totals.count, 0);
    assert!(!dirs.dest.join("a.bmp").exists());
}

#[test]
fn test_cancel_from_event_stops_after_current_file() {
    let dirs = TestDirs::new();
    dirs.add_image("a.bmp", &gradient(16, 16), ImageFormat::Bmp);
    dirs.add_image("b.bmp", &gradient(16, 16), ImageFormat::Bmp);
    let runner = BatchRunner::new(test_compressor(8));
    let cancel = runner.cancel_flag();

    let report = runner
        .run_with(&dirs.source, &dirs.dest, |_| cancel.cancel())
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.totals.count, 1);
    assert!(dirs.dest.join("a.bmp").exists());
    assert!(!dirs.dest.join("b.bmp").exists());
}

#[test]
fn test_missing_source_dir() {
    let dirs = TestDirs::new();

    let err = BatchRunner::new(test_compressor(8))
        .run(&dirs.source.join("missing"), &dirs.dest)
        .unwrap_err();

    assert!(matches!(err, BatchError::SourceDir { .. }));
}

#[test]
fn test_destination_is_a_file() {
    let dirs = TestDirs::new();
    dirs.add_image("a.bmp", &gradient(16, 16), ImageFormat::Bmp);
    let blocker = dirs.source.join("a.bmp");

    let err = BatchRunner::new(test_compressor(8))
        .run(&dirs.source, &blocker)
        .unwrap_err();

    assert!(matches!(err, BatchError::DestinationDir { .. }));
}

#[test]
fn test_persist_failure_aborts_with_partial_report() {
    let dirs = blocked_batch();

    let err = BatchRunner::new(test_compressor(16))
        .run(&dirs.source, &dirs.dest)
        .unwrap_err();

    let (source, report) = match err {
        BatchError::Aborted { source, report } => (source, report),
        other => panic!("expected aborted batch, got {other:?}"),
    };
    assert!(matches!(source, CompressError::Persist { .. }));
    assert_eq!(report.totals.count, 1);
    assert_eq!(report.results[0].file_name(), "a.bmp");
    assert!(dirs.dest.join("a.bmp").is_file());
    assert!(!dirs.dest.join("c.bmp").exists());
}

#[test]
fn test_copy_failure_aborts_with_partial_report() {
    let dirs = blocked_batch();
    let compressor = test_compressor(16).with_post_processor(force_fallback);

    let err = BatchRunner::new(compressor)
        .run(&dirs.source, &dirs.dest)
        .unwrap_err();

    let (source, report) = match err {
        BatchError::Aborted { source, report } => (source, report),
        other => panic!("expected aborted batch, got {other:?}"),
    };
    assert!(matches!(source, CompressError::Copy { .. }));
    assert_eq!(report.totals.count, 1);
    assert_eq!(
        fs::read(dirs.dest.join("a.bmp")).unwrap(),
        fs::read(dirs.source.join("a.bmp")).unwrap()
    );
    assert!(!dirs.dest.join("c.bmp").exists());
}
