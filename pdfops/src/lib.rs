//! pdfops - batch PDF tools: merge, split, rotate and image-to-PDF.
//!
//! Every tool runs the same pipeline over an ordered batch of files:
//! validate, iterate in order, transform each file through the PDF library,
//! report progress, emit output.
//!
//! - [`files`]: the ordered file collection
//! - [`mode`]: tool selection
//! - [`pipeline`]: the transformation dispatcher
//! - [`progress`]: per-file progress reporting
//! - [`emit`]: offering and delivering produced documents
//! - [`session`]: the controller wiring events to the dispatcher
//! - [`pdf`]: the layer over `lopdf`
//!
//! # Examples
//!
//! ## Merge in memory
//!
//! ```no_run
//! use pdfops::emit::MemoryEmitter;
//! use pdfops::files::{FileCollection, FileEntry};
//! use pdfops::mode::Mode;
//! use pdfops::pipeline::Dispatcher;
//! use pdfops::progress::NoopProgress;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfops::Result<()> {
//! let mut files = FileCollection::new();
//! files.add(vec![
//!     FileEntry::from_bytes("a.pdf", "application/pdf", a),
//!     FileEntry::from_bytes("b.pdf", "application/pdf", b),
//! ]);
//!
//! let mut downloads = MemoryEmitter::new();
//! let output = Dispatcher::new()
//!     .run(Mode::Merge, &files, &mut NoopProgress, &mut downloads)
//!     .await?;
//! println!("merged.pdf has {} pages", output.pages());
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving a session
//!
//! ```no_run
//! use pdfops::config::{Config, OverwriteMode};
//! use pdfops::emit::DirectoryEmitter;
//! use pdfops::output::ConsoleView;
//! use pdfops::pipeline::Dispatcher;
//! use pdfops::session::{Session, SessionEvent};
//! use pdfops::utils::entries_from_paths;
//!
//! # async fn example(config: Config) -> pdfops::Result<()> {
//! let mut session = Session::new(
//!     config.tool,
//!     Dispatcher::from_config(&config),
//!     ConsoleView::from_config(&config),
//!     DirectoryEmitter::new(&config.output_dir, OverwriteMode::Force),
//! );
//! session
//!     .handle(SessionEvent::FilesAdded(entries_from_paths(config.inputs())?))
//!     .await?;
//! session.handle(SessionEvent::RunRequested).await?;
//! session.downloads_mut().accept().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod emit;
pub mod error;
pub mod files;
pub mod mode;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfOpsError, Result};
pub use mode::Mode;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
