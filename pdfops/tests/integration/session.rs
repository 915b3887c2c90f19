//! Integration tests for the session controller driving real files.

use std::fs;

use pdfops::config::OverwriteMode;
use pdfops::emit::{DirectoryEmitter, MemoryEmitter};
use pdfops::error::PdfOpsError;
use pdfops::files::FileEntry;
use pdfops::mode::Mode;
use pdfops::pipeline::Dispatcher;
use pdfops::progress::{ProgressSink, ProgressUpdate};
use pdfops::session::{Session, SessionEvent, Status, View};
use pdfops::utils::entries_from_paths;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{jpeg_bytes, jpeg_entry, labeled_pdf, page_labels, pdf_entry};

#[derive(Default)]
struct TestView {
    file_lists: Vec<usize>,
    statuses: Vec<Status>,
    updates: Vec<ProgressUpdate>,
}

impl ProgressSink for TestView {
    fn on_update(&mut self, update: ProgressUpdate) {
        self.updates.push(update);
    }
}

impl View for TestView {
    fn render_files(&mut self, files: &[FileEntry]) {
        self.file_lists.push(files.len());
    }

    fn show_status(&mut self, status: Status) {
        self.statuses.push(status);
    }
}

fn memory_session(mode: Mode) -> Session<TestView, MemoryEmitter> {
    Session::new(mode, Dispatcher::new(), TestView::default(), MemoryEmitter::new())
}

#[tokio::test]
async fn test_merge_from_disk_writes_merged_pdf() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let a = input.path().join("a.pdf");
    let b = input.path().join("b.pdf");
    fs::write(&a, labeled_pdf(&["A"])).unwrap();
    fs::write(&b, labeled_pdf(&["B1", "B2"])).unwrap();

    let mut session = Session::new(
        Mode::Merge,
        Dispatcher::new(),
        TestView::default(),
        DirectoryEmitter::new(output.path(), OverwriteMode::Prompt),
    );
    session
        .handle(SessionEvent::FilesAdded(entries_from_paths(&[a, b]).unwrap()))
        .await
        .unwrap();
    session.handle(SessionEvent::RunRequested).await.unwrap();

    assert_eq!(session.status(), Status::Completed(Mode::Merge));
    assert_eq!(session.status().message(), "Merge completed!");

    // Nothing is written until the offer is accepted.
    let target = output.path().join("merged.pdf");
    assert!(!target.exists());
    assert_eq!(session.downloads().pending_path(), Some(target.clone()));

    let stats = session.downloads_mut().accept().await.unwrap().unwrap();
    assert_eq!(stats.output_path, target);
    assert_eq!(stats.pages, 3);
    assert_eq!(page_labels(&fs::read(&target).unwrap()), vec!["A", "B1", "B2"]);

    let (view, _) = session.into_parts();
    assert_eq!(view.file_lists, vec![2]);
    assert_eq!(view.updates.len(), 2);
}

#[tokio::test]
async fn test_accept_refuses_existing_output_until_forced() {
    let output = TempDir::new().unwrap();
    let target = output.path().join("merged.pdf");
    fs::write(&target, b"old").unwrap();

    let mut session = Session::new(
        Mode::Merge,
        Dispatcher::new(),
        TestView::default(),
        DirectoryEmitter::new(output.path(), OverwriteMode::Prompt),
    );
    session
        .handle(SessionEvent::FilesAdded(vec![pdf_entry(
            "a.pdf",
            labeled_pdf(&["A"]),
        )]))
        .await
        .unwrap();
    session.run().await.unwrap();

    let err = session.downloads_mut().accept().await.unwrap_err();
    assert!(matches!(err, PdfOpsError::OutputExists { .. }));
    assert!(session.downloads().pending().is_some());
    assert_eq!(fs::read(&target).unwrap(), b"old");

    session
        .downloads_mut()
        .set_overwrite_mode(OverwriteMode::Force);
    session.downloads_mut().accept().await.unwrap();
    assert_eq!(page_labels(&fs::read(&target).unwrap()), vec!["A"]);
}

#[rstest]
#[case(Mode::Merge)]
#[case(Mode::Split)]
#[case(Mode::Rotate)]
#[case(Mode::PdfToImage)]
#[case(Mode::ImageToPdf)]
#[tokio::test]
async fn test_empty_run_asks_for_files(#[case] mode: Mode) {
    let mut session = memory_session(mode);

    let err = session.handle(SessionEvent::RunRequested).await.unwrap_err();

    assert!(matches!(err, PdfOpsError::EmptyInput));
    assert_eq!(session.status().message(), "Please add files first.");
    assert!(session.downloads().offered().is_none());
    assert!(!session.view().statuses.contains(&Status::Processing));
}

#[tokio::test]
async fn test_pdf_to_image_validates_then_reports_not_implemented() {
    let mut session = memory_session(Mode::PdfToImage);
    session
        .handle(SessionEvent::FilesAdded(vec![jpeg_entry("photo.jpg", 4, 4)]))
        .await
        .unwrap();

    session.run().await.unwrap_err();
    assert_eq!(session.status().message(), "Please upload only PDF files.");

    session
        .handle(SessionEvent::FileRemoved(0))
        .await
        .unwrap();
    session
        .handle(SessionEvent::FilesAdded(vec![pdf_entry(
            "doc.pdf",
            labeled_pdf(&["D"]),
        )]))
        .await
        .unwrap();

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, PdfOpsError::NotImplemented { .. }));
    assert_eq!(session.status(), Status::NotImplemented);
}

#[tokio::test]
async fn test_image_run_rejects_pdf_input() {
    let mut session = memory_session(Mode::ImageToPdf);
    session
        .handle(SessionEvent::FilesAdded(vec![
            jpeg_entry("a.jpg", 4, 4),
            pdf_entry("b.pdf", labeled_pdf(&["B"])),
        ]))
        .await
        .unwrap();

    session.run().await.unwrap_err();

    assert_eq!(session.status().message(), "Please upload only image files.");
    let report = session.last_report().unwrap();
    assert!(!report.success);
    assert_eq!(report.files.len(), 2);
}

#[tokio::test]
async fn test_failed_run_shows_generic_message_and_allows_retry() {
    let mut session = memory_session(Mode::Merge);
    session
        .handle(SessionEvent::FilesAdded(vec![pdf_entry(
            "bad.pdf",
            b"junk".to_vec(),
        )]))
        .await
        .unwrap();

    session.run().await.unwrap_err();
    assert_eq!(session.status().message(), "Something went wrong. Try again.");

    session.handle(SessionEvent::FileRemoved(0)).await.unwrap();
    session
        .handle(SessionEvent::FilesAdded(vec![pdf_entry(
            "good.pdf",
            labeled_pdf(&["G"]),
        )]))
        .await
        .unwrap();

    session.run().await.unwrap();
    assert_eq!(session.status(), Status::Completed(Mode::Merge));
    assert!(session.last_report().unwrap().success);
}

#[tokio::test]
async fn test_image_files_from_disk_use_extension_types() {
    let input = TempDir::new().unwrap();
    let photo = input.path().join("photo.jpeg");
    fs::write(&photo, jpeg_bytes(10, 6)).unwrap();

    let mut session = memory_session(Mode::ImageToPdf);
    session
        .handle(SessionEvent::FilesAdded(entries_from_paths(&[photo]).unwrap()))
        .await
        .unwrap();

    let output = session.run().await.unwrap();
    assert_eq!(output.pages(), 1);
    assert_eq!(session.status().message(), "Images converted to PDF!");
}

#[tokio::test]
async fn test_remove_out_of_range_is_an_error() {
    let mut session = memory_session(Mode::Merge);

    let err = session
        .handle(SessionEvent::FileRemoved(3))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::InvalidIndex { .. }));
    assert!(session.view().file_lists.is_empty());
}
