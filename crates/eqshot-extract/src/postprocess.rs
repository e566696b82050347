use once_cell::sync::Lazy;
use regex::Regex;

/// Environments that carry their own equation number. `split` and `cases`
/// only ever appear inside one of these.
pub const NUMBERED_ENVIRONMENTS: &[&str] =
    &["equation", "align", "gather", "multline", "flalign", "alignat"];

static NUMBERED_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    let names = NUMBERED_ENVIRONMENTS.join("|");
    Regex::new(&format!(r"\\(begin|end)\{{({names})\}}")).expect("static marker pattern")
});

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\label\{(.*?)\}").expect("static label pattern"));

/// Rewrites numbered environment markers to their starred form.
///
/// Already starred markers are left alone, so this is idempotent.
pub fn unnumber(equation: &str) -> String {
    NUMBERED_MARKER_RE
        .replace_all(equation, r"\${1}{${2}*}")
        .into_owned()
}

/// Returns the first `\label{...}` identifier with `:` replaced by `_`.
///
/// `None` means there is no label at all; `\label{}` yields `Some("")`.
pub fn equation_label(equation: &str) -> Option<String> {
    LABEL_RE
        .captures(equation)
        .map(|caps| caps[1].replace(':', "_"))
}
