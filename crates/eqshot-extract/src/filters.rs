//! Predicates that mark an equation's inner content as not worth rendering.

use once_cell::sync::Lazy;
use regex::Regex;

static NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s&\]]").expect("static noise pattern"));
static MATH_SIGNAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z+\-*/=<>\\]").expect("static signal pattern"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.]+$").expect("static number pattern"));
static BOLD_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\(?:mathbf|boldsymbol|bm)\{[\d.]+\}$").expect("static bold number pattern")
});

/// True when the content is nothing but a number, e.g. `3.14` or `1 & 2`.
///
/// Whitespace, `&` and `]` are ignored. Empty content is not numeric. Any
/// letter, operator or backslash keeps the equation, so bold literals such
/// as `\mathbf{2}` are kept too.
pub fn is_purely_numeric(content: &str) -> bool {
    let cleaned = NOISE_RE.replace_all(content, "");
    if cleaned.is_empty() {
        return false;
    }
    if MATH_SIGNAL_RE.is_match(&cleaned) {
        return false;
    }
    // Never matches here: the bold shape contains letters and a backslash.
    if BOLD_NUMBER_RE.is_match(&cleaned) {
        return true;
    }
    // Leftovers such as stray punctuation are kept.
    NUMBER_RE.is_match(&cleaned)
}

/// True when every line is blank or starts with `%` after leading whitespace.
pub fn is_commented_out(content: &str) -> bool {
    content.split('\n').all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('%')
    })
}

/// Either filter fires.
pub fn is_trivial(content: &str) -> bool {
    is_purely_numeric(content) || is_commented_out(content)
}
