//! Tool mode selection.
//!
//! The tool is chosen once per session from a single launch parameter.
//! Unknown or missing values fall back to [`Mode::Merge`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The transformation a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Combine PDFs into one document.
    #[default]
    Merge,
    /// One document per page.
    Split,
    /// Add a rotation to every page.
    Rotate,
    /// Declared and validated, never transformed.
    #[serde(rename = "pdf2jpg")]
    PdfToImage,
    /// One page per image.
    #[serde(rename = "jpg2pdf")]
    ImageToPdf,
}

impl Mode {
    /// Every mode, in the order tools are listed.
    pub const ALL: [Mode; 5] = [
        Mode::Merge,
        Mode::Split,
        Mode::Rotate,
        Mode::PdfToImage,
        Mode::ImageToPdf,
    ];

    /// Resolve the launch parameter into a mode.
    ///
    /// Lookup is exact. A missing or unrecognized value selects
    /// [`Mode::Merge`]; this is a non-fatal default, not an error.
    ///
    /// ```
    /// use pdfops::mode::Mode;
    ///
    /// assert_eq!(Mode::select(Some("split")), Mode::Split);
    /// assert_eq!(Mode::select(Some("SPLIT")), Mode::Merge);
    /// assert_eq!(Mode::select(None), Mode::Merge);
    /// ```
    pub fn select(param: Option<&str>) -> Self {
        match param.and_then(Self::from_param) {
            Some(mode) => mode,
            None => {
                if let Some(value) = param {
                    tracing::debug!(tool = value, "unknown tool, falling back to merge");
                }
                Self::default()
            }
        }
    }

    /// Exact lookup of a launch parameter value.
    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.param() == value)
    }

    /// The launch parameter value naming this mode.
    pub fn param(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Split => "split",
            Self::Rotate => "rotate",
            Self::PdfToImage => "pdf2jpg",
            Self::ImageToPdf => "jpg2pdf",
        }
    }

    /// Title shown in the tool header.
    pub fn title(&self) -> String {
        self.param().to_uppercase()
    }

    /// One-line description shown under the title.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Merge => "Combine multiple PDF files into one",
            Self::Split => "Split PDF pages into separate files",
            Self::Rotate => "Rotate PDF pages",
            Self::PdfToImage => "Convert PDF pages into JPG images",
            Self::ImageToPdf => "Convert images into a PDF",
        }
    }

    /// File name of the single document this mode offers, if it offers one.
    pub fn output_name(&self) -> Option<&'static str> {
        match self {
            Self::Merge => Some("merged.pdf"),
            Self::Rotate => Some("rotated.pdf"),
            Self::ImageToPdf => Some("images.pdf"),
            Self::Split | Self::PdfToImage => None,
        }
    }

    /// Whether runs in this mode report per-file progress.
    pub fn reports_progress(&self) -> bool {
        matches!(self, Self::Merge | Self::Rotate)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}
