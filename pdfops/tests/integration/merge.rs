//! Integration tests for merging.

use pdfops::config::CompressionLevel;
use pdfops::emit::MemoryEmitter;
use pdfops::error::PdfOpsError;
use pdfops::mode::Mode;
use pdfops::pipeline::Dispatcher;
use pdfops::progress::{ProgressUpdate, RecordingProgress};
use rstest::rstest;

use crate::common::{
    collection, labeled_pdf, link_targets, linked_pdf, page_labels, pdf_entry, png_entry,
};

#[tokio::test]
async fn test_merge_concatenates_in_list_order() {
    let files = collection(vec![
        pdf_entry("b.pdf", labeled_pdf(&["B1"])),
        pdf_entry("a.pdf", labeled_pdf(&["A1", "A2"])),
    ]);
    let mut progress = RecordingProgress::default();
    let mut downloads = MemoryEmitter::new();

    let output = Dispatcher::new()
        .run(Mode::Merge, &files, &mut progress, &mut downloads)
        .await
        .unwrap();

    let artifact = output.artifact().expect("merge offers a document");
    assert_eq!(artifact.name(), "merged.pdf");
    assert_eq!(artifact.pages(), 3);
    assert_eq!(page_labels(artifact.bytes()), vec!["B1", "A1", "A2"]);

    let offered = downloads.offered().expect("offered to downloads");
    assert_eq!(offered.bytes(), artifact.bytes());
    assert!(downloads.delivered().is_empty());
}

#[tokio::test]
async fn test_merge_reports_one_update_per_file() {
    let files = collection(vec![
        pdf_entry("1.pdf", labeled_pdf(&["1"])),
        pdf_entry("2.pdf", labeled_pdf(&["2"])),
        pdf_entry("3.pdf", labeled_pdf(&["3"])),
    ]);
    let mut progress = RecordingProgress::default();

    Dispatcher::new()
        .run(Mode::Merge, &files, &mut progress, &mut MemoryEmitter::new())
        .await
        .unwrap();

    assert_eq!(progress.starts, vec![3]);
    assert_eq!(
        progress.updates,
        vec![
            ProgressUpdate { completed: 1, total: 3 },
            ProgressUpdate { completed: 2, total: 3 },
            ProgressUpdate { completed: 3, total: 3 },
        ]
    );
    assert_eq!(progress.finishes, 1);
}

#[tokio::test]
async fn test_merge_same_file_twice() {
    let bytes = labeled_pdf(&["X"]);
    let files = collection(vec![
        pdf_entry("x.pdf", bytes.clone()),
        pdf_entry("x.pdf", bytes),
    ]);

    let output = Dispatcher::new()
        .run(
            Mode::Merge,
            &files,
            &mut RecordingProgress::default(),
            &mut MemoryEmitter::new(),
        )
        .await
        .unwrap();

    assert_eq!(output.pages(), 2);
    assert_eq!(page_labels(output.artifact().unwrap().bytes()), vec!["X", "X"]);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_merge_output_loads_at_every_compression(#[case] level: CompressionLevel) {
    let files = collection(vec![
        pdf_entry("a.pdf", labeled_pdf(&["A"])),
        pdf_entry("b.pdf", labeled_pdf(&["B"])),
    ]);

    let output = Dispatcher::new()
        .with_compression(level)
        .run(
            Mode::Merge,
            &files,
            &mut RecordingProgress::default(),
            &mut MemoryEmitter::new(),
        )
        .await
        .unwrap();

    assert_eq!(page_labels(output.artifact().unwrap().bytes()), vec!["A", "B"]);
}

#[tokio::test]
async fn test_merge_failure_offers_nothing() {
    let files = collection(vec![
        pdf_entry("good.pdf", labeled_pdf(&["G"])),
        pdf_entry("broken.pdf", b"%PDF-1.5 truncated".to_vec()),
    ]);
    let mut progress = RecordingProgress::default();
    let mut downloads = MemoryEmitter::new();

    let err = Dispatcher::new()
        .run(Mode::Merge, &files, &mut progress, &mut downloads)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ProcessingFailed { .. }));
    assert!(downloads.offered().is_none());
    // The first file was processed before the failure.
    assert_eq!(progress.updates.len(), 1);
    assert_eq!(progress.finishes, 1);
}

#[tokio::test]
async fn test_merge_fails_on_image_when_loading() {
    let files = collection(vec![
        pdf_entry("a.pdf", labeled_pdf(&["A"])),
        png_entry("photo.png", 4, 4),
    ]);

    // Merge does not check declared types up front; the image fails to parse.
    let err = Dispatcher::new()
        .run(
            Mode::Merge,
            &files,
            &mut RecordingProgress::default(),
            &mut MemoryEmitter::new(),
        )
        .await
        .unwrap_err();

    match err {
        PdfOpsError::ProcessingFailed { reason } => assert!(reason.contains("photo.png")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_merge_keeps_links_between_pages_of_one_file() {
    let files = collection(vec![
        pdf_entry("intro.pdf", labeled_pdf(&["I"])),
        pdf_entry("linked.pdf", linked_pdf(&["L1", "L2", "L3"])),
    ]);

    let output = Dispatcher::new()
        .run(
            Mode::Merge,
            &files,
            &mut RecordingProgress::default(),
            &mut MemoryEmitter::new(),
        )
        .await
        .unwrap();

    let bytes = output.artifact().unwrap().bytes();
    assert_eq!(page_labels(bytes), vec!["I", "L1", "L2", "L3"]);
    assert_eq!(link_targets(bytes), vec![None, Some(3), Some(4), None]);
}
