//! The `pdflatex` → `pdfcrop` → `magick` pipeline.
//!
//! Scratch layout, relative to the scratch directory:
//!
//! ```text
//! texs/<stem>.tex
//! pdfs/<stem>.pdf        (+ .log / .aux written by pdflatex)
//! crops/<stem>-crop.pdf
//! ```
//!
//! Steps always run in order, even after a failure: `pdflatex` in
//! nonstop mode often exits non-zero yet still writes a usable PDF.

use crate::config::{ImageFormat, RenderConfig};
use crate::document::standalone_document;
use crate::{RenderJob, RenderStatus, Renderer, StepFailure};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Lines of tool output kept in a [`StepFailure`].
const DETAIL_LINES: usize = 8;

/// Trait for executing system commands.
/// This allows us to mock `std::process::Command` in tests.
pub trait CommandExecutor: Send + Sync + std::fmt::Debug {
    fn execute(&self, program: &Path, args: &[&str]) -> Result<Output>;
}

/// Default implementation of [`CommandExecutor`] using `std::process::Command`.
#[derive(Debug)]
pub struct RealCommandExecutor;

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, program: &Path, args: &[&str]) -> Result<Output> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| anyhow!("Failed to execute {}: {}", program.display(), e))
    }
}

#[derive(Debug)]
enum Scratch {
    Private(TempDir),
    Shared(PathBuf),
}

impl Scratch {
    fn path(&self) -> &Path {
        match self {
            Scratch::Private(dir) => dir.path(),
            Scratch::Shared(path) => path,
        }
    }
}

/// Renders equations with a local TeX installation and ImageMagick.
#[derive(Debug)]
pub struct LatexToolchain {
    config: RenderConfig,
    pdflatex: PathBuf,
    pdfcrop: PathBuf,
    magick: PathBuf,
    scratch: Scratch,
    executor: Box<dyn CommandExecutor>,
}

impl LatexToolchain {
    /// Resolves the configured tools on `PATH` and prepares the scratch
    /// directory.
    pub fn new(config: RenderConfig) -> Result<Self> {
        Self::with_executor(config, Box::new(RealCommandExecutor))
    }

    /// Same as [`new`](Self::new) with a custom executor (for testing).
    pub fn with_executor(config: RenderConfig, executor: Box<dyn CommandExecutor>) -> Result<Self> {
        let scratch = match &config.scratch_dir {
            Some(path) => Scratch::Shared(path.clone()),
            None => Scratch::Private(
                tempfile::Builder::new()
                    .prefix("eqshot-")
                    .tempdir()
                    .context("Failed to create scratch directory")?,
            ),
        };
        for sub in ["texs", "pdfs", "crops"] {
            let dir = scratch.path().join(sub);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        debug!("Scratch directory: {}", scratch.path().display());

        Ok(Self {
            pdflatex: resolve_tool(&config.pdflatex),
            pdfcrop: resolve_tool(&config.pdfcrop),
            magick: resolve_tool(&config.magick),
            config,
            scratch,
            executor,
        })
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    fn run_step(
        &self,
        step: &'static str,
        program: &Path,
        args: &[&str],
        failures: &mut Vec<StepFailure>,
    ) {
        debug!("{} {}", program.display(), args.join(" "));
        let detail = match self.executor.execute(program, args) {
            Ok(output) if output.status.success() => return,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let text = if stderr.trim().is_empty() {
                    String::from_utf8_lossy(&output.stdout).into_owned()
                } else {
                    stderr.into_owned()
                };
                format!("{}: {}", output.status, tail(&text, DETAIL_LINES))
            }
            Err(e) => e.to_string(),
        };
        warn!("{} failed: {}", step, detail);
        failures.push(StepFailure { step, detail });
    }
}

impl Renderer for LatexToolchain {
    fn format(&self) -> ImageFormat {
        self.config.format
    }

    fn render(&self, job: &RenderJob<'_>) -> Result<RenderStatus> {
        let root = self.scratch.path();
        let pdf_dir = root.join("pdfs");
        let tex = root.join("texs").join(format!("{}.tex", job.stem));
        let pdf = pdf_dir.join(format!("{}.pdf", job.stem));
        let crop = root.join("crops").join(format!("{}-crop.pdf", job.stem));

        let source = standalone_document(job.equation, job.preamble, &self.config.base_packages);
        fs::write(&tex, source).with_context(|| format!("Failed to write {}", tex.display()))?;

        let pdf_dir_arg = pdf_dir.to_string_lossy().into_owned();
        let tex_arg = tex.to_string_lossy().into_owned();
        let pdf_arg = pdf.to_string_lossy().into_owned();
        let crop_arg = crop.to_string_lossy().into_owned();
        // The explicit coder prefix wins over whatever extension the caller chose.
        let output_arg = format!(
            "{}:{}",
            self.config.format.extension(),
            job.output.to_string_lossy()
        );
        let margin = self.config.crop_margin.to_string();
        let density = self.config.density.to_string();
        let quality = self.config.quality.to_string();

        let mut failures = Vec::new();
        self.run_step(
            "pdflatex",
            &self.pdflatex,
            &[
                "-interaction=nonstopmode",
                "-output-directory",
                pdf_dir_arg.as_str(),
                tex_arg.as_str(),
            ],
            &mut failures,
        );
        self.run_step(
            "pdfcrop",
            &self.pdfcrop,
            &["--margins", margin.as_str(), pdf_arg.as_str(), crop_arg.as_str()],
            &mut failures,
        );
        self.run_step(
            "magick",
            &self.magick,
            &[
                "-density",
                density.as_str(),
                crop_arg.as_str(),
                "-quality",
                quality.as_str(),
                output_arg.as_str(),
            ],
            &mut failures,
        );

        // A private scratch dir disappears on drop; a shared one is tidied.
        if let Scratch::Shared(_) = self.scratch {
            for ext in ["log", "aux"] {
                let leftover = pdf_dir.join(format!("{}.{}", job.stem, ext));
                if let Err(e) = fs::remove_file(&leftover) {
                    if e.kind() != io::ErrorKind::NotFound {
                        debug!("Could not remove {}: {}", leftover.display(), e);
                    }
                }
            }
        }

        if failures.is_empty() {
            info!("Rendered {}", job.output.display());
            Ok(RenderStatus::Rendered(job.output.to_path_buf()))
        } else {
            Ok(RenderStatus::Degraded {
                failed_steps: failures,
            })
        }
    }
}

fn resolve_tool(name: &str) -> PathBuf {
    match which::which(name) {
        Ok(path) => {
            debug!("Resolved {} to {:?}", name, path);
            path
        }
        Err(_) => {
            warn!("{} not found on PATH; invoking it by name", name);
            PathBuf::from(name)
        }
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(String, Vec<String>)>>>;

    /// Records every invocation and fails the programs named in `failing`.
    #[derive(Debug)]
    struct MockCommandExecutor {
        calls: Calls,
        failing: Vec<&'static str>,
    }

    impl CommandExecutor for MockCommandExecutor {
        fn execute(&self, program: &Path, args: &[&str]) -> Result<Output> {
            let name = program
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.calls
                .lock()
                .unwrap()
                .push((name.clone(), args.iter().map(|a| a.to_string()).collect()));

            let code = if self.failing.iter().any(|f| *f == name) { 1 } else { 0 };
            #[cfg(unix)]
            let status = {
                use std::os::unix::process::ExitStatusExt;
                std::process::ExitStatus::from_raw(code << 8)
            };
            #[cfg(windows)]
            let status = {
                use std::os::windows::process::ExitStatusExt;
                std::process::ExitStatus::from_raw(code as u32)
            };

            Ok(Output {
                status,
                stdout: b"! Undefined control sequence.\nl.5 \\foo".to_vec(),
                stderr: Vec::new(),
            })
        }
    }

    fn toolchain(scratch: Option<PathBuf>, failing: Vec<&'static str>) -> (LatexToolchain, Calls) {
        toolchain_with(scratch, failing, ImageFormat::Png)
    }

    fn toolchain_with(
        scratch: Option<PathBuf>,
        failing: Vec<&'static str>,
        format: ImageFormat,
    ) -> (LatexToolchain, Calls) {
        let calls = Calls::default();
        let config = RenderConfig {
            format,
            pdflatex: "eqshot-test-pdflatex".into(),
            pdfcrop: "eqshot-test-pdfcrop".into(),
            magick: "eqshot-test-magick".into(),
            density: 600,
            scratch_dir: scratch,
            ..RenderConfig::default()
        };
        let executor = MockCommandExecutor {
            calls: calls.clone(),
            failing,
        };
        let chain = LatexToolchain::with_executor(config, Box::new(executor)).unwrap();
        (chain, calls)
    }

    #[test]
    fn test_steps_run_in_order_with_expected_arguments() {
        let (chain, calls) = toolchain(None, vec![]);
        let out = chain.scratch_dir().join("equation_eq_a.png");
        let job = RenderJob {
            equation: "$x$",
            preamble: "",
            output: &out,
            stem: "equation_1",
        };

        let status = chain.render(&job).unwrap();
        assert_eq!(status, RenderStatus::Rendered(out.clone()));

        let calls = calls.lock().unwrap();
        let names: Vec<&str> = calls.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["eqshot-test-pdflatex", "eqshot-test-pdfcrop", "eqshot-test-magick"]
        );
        assert_eq!(calls[0].1[0], "-interaction=nonstopmode");
        assert!(calls[0].1[3].ends_with("equation_1.tex"));
        assert_eq!(&calls[1].1[..2], &["--margins".to_string(), "3".to_string()]);
        assert!(calls[1].1[3].ends_with("equation_1-crop.pdf"));
        assert_eq!(&calls[2].1[..2], &["-density".to_string(), "600".to_string()]);
        assert_eq!(calls[2].1[4], "90");
        assert_eq!(calls[2].1[5], format!("png:{}", out.display()));

        let tex = fs::read_to_string(chain.scratch_dir().join("texs/equation_1.tex")).unwrap();
        assert!(tex.contains("\\begin{document}\n$x$\n\\end{document}"));
    }

    #[test]
    fn test_failed_step_degrades_but_later_steps_still_run() {
        let (chain, calls) = toolchain(None, vec!["eqshot-test-pdflatex"]);
        let out = chain.scratch_dir().join("out.png");
        let job = RenderJob {
            equation: "$\\foo$",
            preamble: "",
            output: &out,
            stem: "equation_2",
        };

        match chain.render(&job).unwrap() {
            RenderStatus::Degraded { failed_steps } => {
                assert_eq!(failed_steps.len(), 1);
                assert_eq!(failed_steps[0].step, "pdflatex");
                assert!(failed_steps[0].detail.contains("Undefined control sequence"));
            }
            other => panic!("expected degraded render, got {:?}", other),
        }
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_configured_format_selects_magick_coder() {
        let (chain, calls) = toolchain_with(None, vec![], ImageFormat::Jpg);
        assert_eq!(chain.format(), ImageFormat::Jpg);
        let out = chain.scratch_dir().join("equation_1.jpg");
        let job = RenderJob {
            equation: "$z$",
            preamble: "",
            output: &out,
            stem: "equation_1",
        };
        chain.render(&job).unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[2].1[5], format!("jpg:{}", out.display()));
    }

    #[test]
    fn test_shared_scratch_is_tidied() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("tmp");
        let (chain, _calls) = toolchain(Some(scratch.clone()), vec![]);
        fs::write(scratch.join("pdfs/equation_1.log"), "log").unwrap();
        fs::write(scratch.join("pdfs/equation_1.aux"), "aux").unwrap();

        let out = dir.path().join("equation_1.png");
        let job = RenderJob {
            equation: "$y$",
            preamble: "\\usepackage{bm}",
            output: &out,
            stem: "equation_1",
        };
        chain.render(&job).unwrap();

        assert!(!scratch.join("pdfs/equation_1.log").exists());
        assert!(!scratch.join("pdfs/equation_1.aux").exists());
        assert!(scratch.join("texs/equation_1.tex").exists());
    }

    #[test]
    fn test_stubborn_leftover_does_not_fail_render() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("tmp");
        let (chain, _calls) = toolchain(Some(scratch.clone()), vec![]);
        // A directory where the log file would be cannot be removed as a file.
        fs::create_dir_all(scratch.join("pdfs/equation_3.log")).unwrap();

        let out = dir.path().join("equation_3.png");
        let job = RenderJob {
            equation: "$w$",
            preamble: "",
            output: &out,
            stem: "equation_3",
        };
        assert_eq!(chain.render(&job).unwrap(), RenderStatus::Rendered(out.clone()));
        assert!(scratch.join("pdfs/equation_3.log").is_dir());
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc\n", 2), "b\nc");
        assert_eq!(tail("only", 5), "only");
        assert_eq!(tail("", 3), "");
    }
}
