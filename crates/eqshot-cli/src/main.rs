use anyhow::Context;
use clap::{Parser, Subcommand};
use eqshot_cli::{process_directory, RunOptions};
use eqshot_extract::{
    equation_label, extract_candidates, extract_preamble, is_trivial, unnumber, Category,
    EquationKind, EquationSelection,
};
use eqshot_render::{DryRunRenderer, ImageFormat, LatexToolchain, RenderConfig, Renderer};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eqshot")]
#[command(version)]
#[command(about = "Extract equations from LaTeX projects as images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every equation under a directory to an image
    Render {
        /// Directory containing the .tex files
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Output directory for equation images
        #[arg(short, long, default_value = "images")]
        output_dir: PathBuf,

        /// Equation types to extract: all, block, display, inline
        #[arg(short = 't', long = "equation-types", num_args = 1.., default_value = "all")]
        equation_types: Vec<Category>,

        /// DPI density for image conversion
        #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
        density: u32,

        /// Image format (png, jpg, webp, gif, tiff)
        #[arg(long, default_value = "png")]
        format: ImageFormat,

        /// Image quality passed to magick
        #[arg(long, default_value_t = 90)]
        quality: u8,

        /// Crop margin in points passed to pdfcrop
        #[arg(long, default_value_t = 3)]
        margin: u32,

        /// Keep intermediate files here instead of a temporary directory
        #[arg(long, value_name = "DIR")]
        scratch_dir: Option<PathBuf>,

        /// Render each file with the preamble of every earlier file as well
        #[arg(long)]
        carry_preamble: bool,

        /// List what would be rendered without running the toolchain
        #[arg(long)]
        dry_run: bool,

        #[arg(long, env = "EQSHOT_PDFLATEX", default_value = "pdflatex")]
        pdflatex: String,

        #[arg(long, env = "EQSHOT_PDFCROP", default_value = "pdfcrop")]
        pdfcrop: String,

        #[arg(long, env = "EQSHOT_MAGICK", default_value = "magick")]
        magick: String,
    },
    /// Print the preamble and equations of one .tex file as JSON
    Extract {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Equation types to extract: all, block, display, inline
        #[arg(short = 't', long = "equation-types", num_args = 1.., default_value = "all")]
        equation_types: Vec<Category>,
    },
}

#[derive(Serialize)]
struct ExtractedEquation<'a> {
    kind: EquationKind,
    text: &'a str,
    content: &'a str,
    label: Option<String>,
    unnumbered: String,
}

#[derive(Serialize)]
struct Extraction<'a> {
    preamble: Vec<String>,
    equations: Vec<ExtractedEquation<'a>>,
}

fn extract(document: &str, selection: EquationSelection) -> Extraction<'_> {
    let mut seen = HashSet::new();
    let equations = extract_candidates(document, selection)
        .into_iter()
        .filter(|c| !is_trivial(c.content))
        .filter(|c| seen.insert(c.text.trim()))
        .map(|c| {
            let unnumbered = unnumber(c.text.trim());
            ExtractedEquation {
                kind: c.kind,
                text: c.text,
                content: c.content,
                label: equation_label(&unnumbered),
                unnumbered,
            }
        })
        .collect();
    Extraction {
        preamble: extract_preamble(document),
        equations,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input_dir,
            output_dir,
            equation_types,
            density,
            format,
            quality,
            margin,
            scratch_dir,
            carry_preamble,
            dry_run,
            pdflatex,
            pdfcrop,
            magick,
        } => {
            let options = RunOptions {
                selection: EquationSelection::from_categories(&equation_types)?,
                output_dir,
                carry_preamble,
            };
            let renderer: Box<dyn Renderer> = if dry_run {
                Box::new(DryRunRenderer { format })
            } else {
                Box::new(LatexToolchain::new(RenderConfig {
                    density,
                    format,
                    quality,
                    crop_margin: margin,
                    pdflatex,
                    pdfcrop,
                    magick,
                    scratch_dir,
                    ..RenderConfig::default()
                })?)
            };
            let summary = process_directory(&input_dir, &options, renderer.as_ref())?;
            if summary.degraded > 0 {
                log::warn!(
                    "{} of {} equation(s) hit toolchain errors; see warnings above",
                    summary.degraded,
                    summary.equations
                );
            }
        }
        Commands::Extract {
            path,
            equation_types,
        } => {
            let selection = EquationSelection::from_categories(&equation_types)?;
            let document = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let extraction = extract(&document, selection);
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
    }
    Ok(())
}
