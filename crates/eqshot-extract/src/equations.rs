//! Equation recognizers.
//!
//! Three shapes are matched independently over the whole document:
//!
//! - **Block**: `\begin{env}` ... `\end{env}` for the environments in
//!   [`BLOCK_ENVIRONMENTS`], each optionally starred. The end marker must name
//!   the same base environment; its star is optional and independent.
//! - **Display**: `$$` ... `$$`, shortest span, may cross lines.
//! - **Inline**: `$` ... `$` where neither delimiter touches another `$` and
//!   the content holds at least one character and no `$`.
//!
//! Matches never overlap within one shape. After a match, scanning resumes at
//! its end; after a failed attempt, one byte further on.

use crate::filters::is_trivial;
use crate::selection::EquationSelection;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Environments recognized as block equations.
pub const BLOCK_ENVIRONMENTS: &[&str] = &[
    "equation", "align", "gather", "multline", "flalign", "alignat", "split", "cases",
];

static BEGIN_RE: Lazy<Regex> = Lazy::new(|| {
    let names = BLOCK_ENVIRONMENTS.join("|");
    Regex::new(&format!(r"\\begin\{{({names})\*?\}}")).expect("static begin pattern")
});

/// The shape an [`EquationCandidate`] was matched as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EquationKind {
    Block,
    Display,
    Inline,
}

/// One raw equation match, borrowed from the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationCandidate<'a> {
    pub kind: EquationKind,
    /// Full span, delimiters or environment markers included.
    pub text: &'a str,
    /// Span between the delimiters; always a sub-slice of `text`.
    pub content: &'a str,
    /// Byte offset of `text` in the document.
    pub offset: usize,
    /// Byte range of `content` in `text`.
    #[serde(skip)]
    content_span: (usize, usize),
}

impl EquationCandidate<'_> {
    /// Opening delimiter, e.g. `\begin{align*}` or `$$`.
    pub fn opening(&self) -> &str {
        self.text.get(..self.content_span.0).unwrap_or_default()
    }

    /// Closing delimiter, e.g. `\end{align*}` or `$`.
    pub fn closing(&self) -> &str {
        self.text.get(self.content_span.1..).unwrap_or_default()
    }
}

/// Returns every match of the selected shapes, before filtering.
///
/// Order: all block matches, then display, then inline; document order
/// within each shape.
pub fn extract_candidates(doc: &str, selection: EquationSelection) -> Vec<EquationCandidate<'_>> {
    let mut candidates = Vec::new();
    if selection.includes(EquationKind::Block) {
        scan_blocks(doc, &mut candidates);
    }
    if selection.includes(EquationKind::Display) {
        scan_display(doc, &mut candidates);
    }
    if selection.includes(EquationKind::Inline) {
        scan_inline(doc, &mut candidates);
    }
    candidates
}

/// Extracts the distinct, non-trivial equations of the selected shapes.
///
/// Each entry is the full equation text with its delimiters. Duplicates are
/// dropped keeping the first occurrence, so the result order is stable for a
/// given document.
pub fn extract_equations(doc: &str, selection: EquationSelection) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_candidates(doc, selection)
        .into_iter()
        .filter(|c| !is_trivial(c.content))
        .map(|c| c.text.trim())
        .filter(|text| seen.insert(*text))
        .map(str::to_string)
        .collect()
}

fn candidate(
    doc: &str,
    kind: EquationKind,
    start: usize,
    end: usize,
    content_start: usize,
    content_end: usize,
) -> EquationCandidate<'_> {
    EquationCandidate {
        kind,
        text: &doc[start..end],
        content: &doc[content_start..content_end],
        offset: start,
        content_span: (content_start - start, content_end - start),
    }
}

fn scan_blocks<'a>(doc: &'a str, out: &mut Vec<EquationCandidate<'a>>) {
    let mut pos = 0;
    while let Some(caps) = BEGIN_RE.captures_at(doc, pos) {
        let begin = caps.get(0).expect("group 0 always participates");
        let name = &caps[1];
        match find_block_end(doc, begin.end(), name) {
            Some((end_start, end_end)) => {
                out.push(candidate(
                    doc,
                    EquationKind::Block,
                    begin.start(),
                    end_end,
                    begin.end(),
                    end_start,
                ));
                pos = end_end;
            }
            // `\` is ASCII, so one byte on is still a char boundary.
            None => pos = begin.start() + 1,
        }
    }
}

/// Finds the first `\end{name}` or `\end{name*}` at or after `from`.
fn find_block_end(doc: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let marker = format!("\\end{{{name}");
    let mut search = from;
    while let Some(rel) = doc[search..].find(&marker) {
        let start = search + rel;
        let rest = &doc[start + marker.len()..];
        if rest.starts_with('}') {
            return Some((start, start + marker.len() + 1));
        }
        if rest.starts_with("*}") {
            return Some((start, start + marker.len() + 2));
        }
        search = start + 1;
    }
    None
}

fn scan_display<'a>(doc: &'a str, out: &mut Vec<EquationCandidate<'a>>) {
    let mut pos = 0;
    while let Some(rel) = doc[pos..].find("$$") {
        let open = pos + rel;
        let Some(close_rel) = doc[open + 2..].find("$$") else {
            break;
        };
        let close = open + 2 + close_rel;
        out.push(candidate(
            doc,
            EquationKind::Display,
            open,
            close + 2,
            open + 2,
            close,
        ));
        pos = close + 2;
    }
}

fn scan_inline<'a>(doc: &'a str, out: &mut Vec<EquationCandidate<'a>>) {
    let bytes = doc.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let Some(rel) = doc[pos..].find('$') else {
            break;
        };
        let open = pos + rel;
        if open > 0 && bytes[open - 1] == b'$' {
            pos = open + 1;
            continue;
        }
        // The content cannot hold a `$`, so the closing delimiter is the next one.
        let Some(close_rel) = doc[open + 1..].find('$') else {
            break;
        };
        let close = open + 1 + close_rel;
        let doubled = bytes.get(close + 1) == Some(&b'$');
        if close == open + 1 || doubled {
            pos = open + 1;
            continue;
        }
        out.push(candidate(
            doc,
            EquationKind::Inline,
            open,
            close + 1,
            open + 1,
            close,
        ));
        pos = close + 1;
    }
}
