use once_cell::sync::Lazy;
use regex::Regex;

static USEPACKAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\usepackage(?:\[.*?\])?\{(.*?)\}").expect("static usepackage pattern")
});

/// True when `preamble` already loads `package`, including inside a
/// comma-separated list such as `\usepackage{amsmath,amssymb}`.
pub fn declares_package(preamble: &str, package: &str) -> bool {
    USEPACKAGE_RE.captures_iter(preamble).any(|caps| {
        caps[1]
            .split(',')
            .any(|name| name.trim() == package)
    })
}

/// Builds a minimal document that typesets `equation` alone on a page with
/// no header or page number.
pub fn standalone_document<S: AsRef<str>>(
    equation: &str,
    preamble: &str,
    base_packages: &[S],
) -> String {
    let mut doc = String::from("\\documentclass{article}\n");
    for package in base_packages {
        let package = package.as_ref();
        if !declares_package(preamble, package) {
            doc.push_str(&format!("\\usepackage{{{}}}\n", package));
        }
    }
    if !preamble.trim().is_empty() {
        doc.push_str(preamble.trim_end());
        doc.push('\n');
    }
    doc.push_str("\\pagestyle{empty}\n");
    doc.push_str("\\begin{document}\n");
    doc.push_str(equation);
    doc.push_str("\n\\end{document}\n");
    doc
}
