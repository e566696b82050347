//! # eqshot extraction
//!
//! Text-level recognizers that pull equations and preamble declarations out of
//! raw LaTeX sources.
//!
//! ## Overview
//!
//! Nothing in this crate parses TeX. Every recognizer is a pattern scan over
//! the document text, so it is fast, never fails, and shares TeX's blind spots
//! only where documented:
//!
//! - [`preamble`] collects `\usepackage`, `\newcommand` and `\renewcommand`
//!   statements needed to typeset an equation in isolation.
//! - [`equations`] finds block environments (`\begin{align}...`), display math
//!   (`$$...$$`) and inline math (`$...$`).
//! - [`filters`] drops candidates that are only a number or only comments.
//! - [`postprocess`] strips numbering and reads `\label{...}` identifiers.
//!
//! ## Known limitation
//!
//! Braces and brackets are matched non-greedily and are **not** balanced. A
//! statement such as `\newcommand{\pair}{\{a,b\}}` is cut at the first closing
//! brace. Downstream rendering tolerates this; callers that need exact spans
//! should run a real TeX parser.
//!
//! ## Examples
//!
//! ```
//! use eqshot_extract::{extract_equations, EquationSelection};
//!
//! let doc = "Energy $E=mc^2$ costs $42$ units.";
//! let found = extract_equations(doc, EquationSelection::all());
//! assert_eq!(found, vec!["$E=mc^2$".to_string()]);
//! ```

pub mod equations;
pub mod filters;
pub mod postprocess;
pub mod preamble;
pub mod selection;

pub use equations::{extract_candidates, extract_equations, EquationCandidate, EquationKind};
pub use filters::{is_commented_out, is_purely_numeric, is_trivial};
pub use postprocess::{equation_label, unnumber};
pub use preamble::{extract_preamble, preamble_text, PreambleAccumulator};
pub use selection::{Category, EquationSelection, SelectionError};
