//! # eqshot rendering
//!
//! Turns one isolated equation into a cropped image.
//!
//! ## Overview
//!
//! Rendering is delegated to an external TeX toolchain. This crate only
//! assembles the inputs and sequences the tools:
//!
//! ```text
//! equation + preamble ──► standalone .tex ──pdflatex──► .pdf
//!                                                        │
//!                                   image ◄──magick── pdfcrop
//! ```
//!
//! - [`document`] builds the minimal standalone document.
//! - [`toolchain`] runs `pdflatex`, `pdfcrop` and `magick` through a mockable
//!   [`CommandExecutor`](toolchain::CommandExecutor).
//! - [`config`] holds density, image format and tool locations.
//!
//! A failing tool never aborts a run. Each failed step is logged and reported
//! through [`RenderStatus::Degraded`] so the caller can count it.
//!
//! ## Examples
//!
//! ```
//! use eqshot_render::{DryRunRenderer, RenderJob, RenderStatus, Renderer};
//! use std::path::Path;
//!
//! let job = RenderJob {
//!     equation: "$E=mc^2$",
//!     preamble: "",
//!     output: Path::new("images/equation_1.png"),
//!     stem: "equation_1",
//! };
//! let status = DryRunRenderer::default().render(&job)?;
//! assert!(matches!(status, RenderStatus::Rendered(_)));
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod config;
pub mod document;
pub mod toolchain;

pub use config::{ImageFormat, RenderConfig};
pub use document::standalone_document;
pub use toolchain::LatexToolchain;

/// Everything a [`Renderer`] needs for one equation.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    /// Equation text, delimiters included.
    pub equation: &'a str,
    /// Preamble statements, one per line.
    pub preamble: &'a str,
    /// Final image path. Its parent directory must exist.
    pub output: &'a Path,
    /// Base name for intermediate files, e.g. `equation_3`.
    pub stem: &'a str,
}

/// A toolchain step that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: &'static str,
    pub detail: String,
}

/// The outcome of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    /// Every step succeeded; the image is at the given path.
    Rendered(PathBuf),
    /// At least one step failed. The image may still exist.
    Degraded { failed_steps: Vec<StepFailure> },
}

/// Renders one equation to an image.
pub trait Renderer {
    /// Returns `Err` only for local problems such as an unwritable scratch
    /// directory. Tool failures are reported as [`RenderStatus::Degraded`].
    fn render(&self, job: &RenderJob<'_>) -> Result<RenderStatus>;

    /// Format of the images this renderer writes. Callers name
    /// [`RenderJob::output`] with its extension.
    fn format(&self) -> ImageFormat {
        ImageFormat::default()
    }
}

/// Plans renders without running anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRenderer {
    pub format: ImageFormat,
}

impl Renderer for DryRunRenderer {
    fn format(&self) -> ImageFormat {
        self.format
    }

    fn render(&self, job: &RenderJob<'_>) -> Result<RenderStatus> {
        log::info!("[dry-run] {} -> {}", job.stem, job.output.display());
        log::debug!("[dry-run] equation: {}", job.equation);
        Ok(RenderStatus::Rendered(job.output.to_path_buf()))
    }
}
