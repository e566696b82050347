//! # eqshot CLI
//!
//! Walks a LaTeX project and renders every interesting equation to an image.
//!
//! - [`layout`] decides where each image goes and what it is called.
//! - [`pipeline`] sequences extraction and rendering per file and carries the
//!   preamble accumulator across the walk.
//!
//! The binary in `main.rs` only parses arguments and wires these together.

pub mod layout;
pub mod pipeline;

pub use pipeline::{process_directory, process_file, FileReport, RunOptions, RunSummary};
