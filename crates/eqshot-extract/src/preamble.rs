//! Preamble statement extraction.
//!
//! Recognized shapes, each matched as one span that may cross lines:
//!
//! - `\usepackage[options]{name}` (options optional)
//! - `\renewcommand{name}{body}`
//! - `\newcommand[n]{name}{body}` (argument count optional)
//!
//! Arguments are matched up to the first closing token, without brace
//! balancing. A body containing `}` is truncated there.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static PREAMBLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)",
        r"\\usepackage(?:\[.*?\])?\{.*?\}",
        r"|\\renewcommand\{.*?\}\{.*?\}",
        r"|\\newcommand(?:\[.*?\])?\{.*?\}\{.*?\}",
    ))
    .expect("static preamble pattern")
});

/// Returns the distinct preamble statements of `doc`, trimmed, in order of
/// first appearance.
pub fn extract_preamble(doc: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PREAMBLE_RE
        .find_iter(doc)
        .map(|m| m.as_str().trim())
        .filter(|stmt| seen.insert(*stmt))
        .map(str::to_string)
        .collect()
}

/// Joins statements into the text block placed before `\begin{document}`.
pub fn preamble_text<S: AsRef<str>>(statements: &[S]) -> String {
    statements
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Preamble statements gathered across the files of one run.
///
/// Grows only. Statements keep traversal order, so when two files define the
/// same macro the later definition appears later in [`text`](Self::text).
#[derive(Debug, Default, Clone)]
pub struct PreambleAccumulator {
    statements: Vec<String>,
    seen: HashSet<String>,
}

impl PreambleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the statements not already held. Returns how many were new.
    pub fn absorb<I, S>(&mut self, statements: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.statements.len();
        for stmt in statements {
            let stmt = stmt.into();
            if self.seen.insert(stmt.clone()) {
                self.statements.push(stmt);
            }
        }
        self.statements.len() - before
    }

    pub fn text(&self) -> String {
        preamble_text(&self.statements)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
