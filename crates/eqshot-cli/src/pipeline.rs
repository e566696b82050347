use crate::layout::{file_output_dir, image_name, is_tex_source, scratch_stem};
use anyhow::{bail, Context, Result};
use eqshot_extract::{
    equation_label, extract_equations, extract_preamble, preamble_text, unnumber,
    EquationSelection, PreambleAccumulator,
};
use eqshot_render::{RenderJob, RenderStatus, Renderer};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-run settings shared by every file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub selection: EquationSelection,
    pub output_dir: PathBuf,
    /// Render each file with the preamble of every earlier file plus its own,
    /// instead of its own alone.
    pub carry_preamble: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            selection: EquationSelection::all(),
            output_dir: PathBuf::from("images"),
            carry_preamble: false,
        }
    }
}

/// One equation handed to the renderer.
#[derive(Debug, Clone)]
pub struct RenderedEquation {
    pub equation: String,
    pub output: PathBuf,
    pub status: RenderStatus,
}

/// What [`process_file`] did with one source file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    /// This file's own preamble statements.
    pub preamble: Vec<String>,
    pub equations: Vec<RenderedEquation>,
}

impl FileReport {
    pub fn preamble_text(&self) -> String {
        preamble_text(&self.preamble)
    }

    pub fn degraded(&self) -> usize {
        self.equations
            .iter()
            .filter(|eq| matches!(eq.status, RenderStatus::Degraded { .. }))
            .count()
    }
}

/// Totals for a whole directory walk.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: usize,
    pub equations: usize,
    pub degraded: usize,
    pub preamble: PreambleAccumulator,
}

/// Extracts and renders the equations of one `.tex` file.
///
/// `carried_preamble` is what earlier files contributed. It only reaches the
/// renderer when [`RunOptions::carry_preamble`] is set; otherwise each file is
/// rendered with its own preamble.
pub fn process_file(
    path: &Path,
    file_output_dir: &Path,
    carried_preamble: &str,
    options: &RunOptions,
    renderer: &dyn Renderer,
) -> Result<FileReport> {
    let document = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let equations = extract_equations(&document, options.selection);
    let preamble = extract_preamble(&document);
    let own = preamble_text(&preamble);
    let render_preamble = if options.carry_preamble {
        let parts: Vec<&str> = [carried_preamble.trim(), own.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        parts.join("\n")
    } else {
        own
    };
    info!(
        "{}: {} equation(s), {} preamble statement(s)",
        path.display(),
        equations.len(),
        preamble.len()
    );

    let extension = renderer.format().extension();
    let mut names = HashSet::new();
    let mut rendered = Vec::with_capacity(equations.len());
    for (index, equation) in equations.iter().enumerate() {
        let position = index + 1;
        let equation = unnumber(equation);
        let label = equation_label(&equation);
        let name = image_name(label.as_deref(), position, extension);
        if !names.insert(name.clone()) {
            warn!(
                "{}: label {:?} used more than once; {} will be overwritten",
                path.display(),
                label.as_deref().unwrap_or_default(),
                name
            );
        }

        let output = file_output_dir.join(&name);
        let stem = scratch_stem(position);
        debug!("{} -> {}", stem, output.display());
        let status = renderer.render(&RenderJob {
            equation: &equation,
            preamble: &render_preamble,
            output: &output,
            stem: &stem,
        })?;
        rendered.push(RenderedEquation {
            equation,
            output,
            status,
        });
    }

    Ok(FileReport {
        source: path.to_path_buf(),
        preamble,
        equations: rendered,
    })
}

/// Renders every `.tex` file under `input`, in file-name order.
pub fn process_directory(
    input: &Path,
    options: &RunOptions,
    renderer: &dyn Renderer,
) -> Result<RunSummary> {
    if !input.is_dir() {
        bail!("Input directory {} does not exist", input.display());
    }
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("Failed to create {}", options.output_dir.display()))?;

    let mut summary = RunSummary::default();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
        if !entry.file_type().is_file() || !is_tex_source(entry.path()) {
            continue;
        }

        let out_dir = file_output_dir(&options.output_dir, entry.path());
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;

        let carried = summary.preamble.text();
        let report = process_file(entry.path(), &out_dir, &carried, options, renderer)?;
        summary.files += 1;
        summary.equations += report.equations.len();
        summary.degraded += report.degraded();
        summary.preamble.absorb(&report.preamble);
    }

    info!(
        "Processed {} file(s): {} equation(s), {} with toolchain failures",
        summary.files, summary.equations, summary.degraded
    );
    Ok(summary)
}
