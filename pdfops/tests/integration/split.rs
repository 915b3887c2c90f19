//! Integration tests for splitting.

use pdfops::config::OverwriteMode;
use pdfops::emit::{Artifact, DirectoryEmitter, DownloadSink, MemoryEmitter};
use pdfops::error::{PdfOpsError, Result};
use pdfops::mode::Mode;
use pdfops::pipeline::{Dispatcher, Output};
use pdfops::progress::RecordingProgress;
use tempfile::TempDir;

/// Records delivered pages and refuses every delivery after `limit`.
struct LimitedSink {
    names: Vec<String>,
    limit: usize,
}

impl DownloadSink for LimitedSink {
    fn offer(&mut self, _artifact: Artifact) {}

    async fn deliver(&mut self, artifact: Artifact) -> Result<()> {
        assert_eq!(artifact.pages(), 1);
        if self.names.len() == self.limit {
            return Err(PdfOpsError::processing_failed("disk full"));
        }
        self.names.push(artifact.name().to_string());
        Ok(())
    }
}

use crate::common::{collection, inherited_rotation_pdf, labeled_pdf, page_labels, page_rotations, pdf_entry};

#[tokio::test]
async fn test_split_delivers_one_document_per_page() {
    let files = collection(vec![pdf_entry("doc.pdf", labeled_pdf(&["P1", "P2", "P3"]))]);
    let mut progress = RecordingProgress::default();
    let mut downloads = MemoryEmitter::new();

    let output = Dispatcher::new()
        .run(Mode::Split, &files, &mut progress, &mut downloads)
        .await
        .unwrap();

    assert!(matches!(
        output,
        Output::Delivered {
            documents: 1,
            pages: 3
        }
    ));
    assert!(downloads.offered().is_none());

    let delivered = downloads.delivered();
    let names: Vec<&str> = delivered.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["page_1.pdf", "page_2.pdf", "page_3.pdf"]);

    for (artifact, label) in delivered.iter().zip(["P1", "P2", "P3"]) {
        assert_eq!(artifact.pages(), 1);
        assert_eq!(page_labels(artifact.bytes()), vec![label]);
    }

    // Split does not report progress.
    assert!(progress.starts.is_empty());
    assert!(progress.updates.is_empty());
}

#[tokio::test]
async fn test_split_numbering_restarts_per_file() {
    let files = collection(vec![
        pdf_entry("a.pdf", labeled_pdf(&["A1", "A2"])),
        pdf_entry("b.pdf", labeled_pdf(&["B1"])),
    ]);
    let mut downloads = MemoryEmitter::new();

    Dispatcher::new()
        .run(
            Mode::Split,
            &files,
            &mut RecordingProgress::default(),
            &mut downloads,
        )
        .await
        .unwrap();

    let names: Vec<&str> = downloads.delivered().iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["page_1.pdf", "page_2.pdf", "page_1.pdf"]);
}

#[tokio::test]
async fn test_split_keeps_inherited_rotation() {
    let files = collection(vec![pdf_entry("r.pdf", inherited_rotation_pdf(180, &["R1"]))]);
    let mut downloads = MemoryEmitter::new();

    Dispatcher::new()
        .run(
            Mode::Split,
            &files,
            &mut RecordingProgress::default(),
            &mut downloads,
        )
        .await
        .unwrap();

    assert_eq!(page_rotations(downloads.delivered()[0].bytes()), vec![180]);
}

#[tokio::test]
async fn test_split_to_directory_dedupes_names() {
    let dir = TempDir::new().unwrap();
    let files = collection(vec![
        pdf_entry("a.pdf", labeled_pdf(&["A1"])),
        pdf_entry("b.pdf", labeled_pdf(&["B1"])),
    ]);
    let mut downloads = DirectoryEmitter::new(dir.path(), OverwriteMode::Force);

    Dispatcher::new()
        .run(
            Mode::Split,
            &files,
            &mut RecordingProgress::default(),
            &mut downloads,
        )
        .await
        .unwrap();

    let first = std::fs::read(dir.path().join("page_1.pdf")).unwrap();
    let second = std::fs::read(dir.path().join("page_1 (1).pdf")).unwrap();
    assert_eq!(page_labels(&first), vec!["A1"]);
    assert_eq!(page_labels(&second), vec!["B1"]);
    assert_eq!(downloads.written().len(), 2);
}

#[tokio::test]
async fn test_split_failure_keeps_earlier_pages() {
    let files = collection(vec![
        pdf_entry("good.pdf", labeled_pdf(&["G1", "G2"])),
        pdf_entry("bad.pdf", b"not a pdf".to_vec()),
    ]);
    let mut downloads = MemoryEmitter::new();

    let err = Dispatcher::new()
        .run(
            Mode::Split,
            &files,
            &mut RecordingProgress::default(),
            &mut downloads,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ProcessingFailed { .. }));
    assert_eq!(downloads.delivered().len(), 2);
}

#[tokio::test]
async fn test_split_delivers_pages_one_at_a_time() {
    let files = collection(vec![pdf_entry("doc.pdf", labeled_pdf(&["P1", "P2", "P3"]))]);
    let mut downloads = LimitedSink {
        names: Vec::new(),
        limit: 1,
    };

    let err = Dispatcher::new()
        .run(
            Mode::Split,
            &files,
            &mut RecordingProgress::default(),
            &mut downloads,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ProcessingFailed { .. }));
    assert_eq!(downloads.names, vec!["page_1.pdf"]);
}
