use eqshot_extract::{
    equation_label, extract_candidates, extract_equations, extract_preamble, is_commented_out,
    is_purely_numeric, is_trivial, unnumber, Category, EquationKind, EquationSelection,
};

const PAPER: &str = r"\documentclass{article}
\usepackage{amsmath}
\usepackage[margin=1in]{geometry}
\newcommand{\R}{\mathbb{R}}
\renewcommand{\epsilon}{\varepsilon}
\begin{document}
Let $x \in \R$ and $y$ be given; see page $3$.

\begin{equation}
\label{eq:energy}
E = mc^2
\end{equation}

\begin{align*}
a &= b \\
  &= c
\end{align*}

$$
% draft: \int_0^1 f
$$

$$ \sum_{i=1}^n i $$

\begin{equation}
1.5
\end{equation}
\end{document}
";

#[test]
fn test_distinct_preamble_statements_are_verbatim_substrings() {
    let stmts = extract_preamble(PAPER);
    assert_eq!(stmts.len(), 4);
    for stmt in &stmts {
        assert!(PAPER.contains(stmt.as_str()), "{stmt} not in source");
    }
}

#[test]
fn test_full_document_extraction() {
    let eqs = extract_equations(PAPER, EquationSelection::all());
    assert_eq!(
        eqs,
        vec![
            "\\begin{equation}\n\\label{eq:energy}\nE = mc^2\n\\end{equation}".to_string(),
            "\\begin{align*}\na &= b \\\\\n  &= c\n\\end{align*}".to_string(),
            "$$ \\sum_{i=1}^n i $$".to_string(),
            "$x \\in \\R$".to_string(),
            "$y$".to_string(),
        ]
    );
}

#[test]
fn test_block_only_selection() {
    let sel = EquationSelection::from_categories(&[Category::Block]).unwrap();
    let eqs = extract_equations(PAPER, sel);
    assert_eq!(eqs.len(), 2);
    assert!(eqs.iter().all(|e| e.starts_with("\\begin{")));
}

#[test]
fn test_numeric_and_comment_filters() {
    assert!(is_purely_numeric("3.14"));
    assert!(!is_purely_numeric("x = 3.14"));
    assert!(is_commented_out("% one\n% two"));
    assert!(!is_commented_out("% one\nx\n% two"));
}

#[test]
fn test_bold_numeric_equations_survive_extraction() {
    let eqs = extract_equations("$\\mathbf{12}$ and $\\bm{3}$ and $7$", EquationSelection::all());
    assert_eq!(
        eqs,
        vec!["$\\mathbf{12}$".to_string(), "$\\bm{3}$".to_string()]
    );
}

#[test]
fn test_block_unnumbering() {
    let doc = "\\begin{equation}\nE=mc^2\n\\end{equation}";
    let eqs = extract_equations(doc, EquationSelection::only(EquationKind::Block));
    assert_eq!(eqs.len(), 1);
    assert_eq!(unnumber(&eqs[0]), "\\begin{equation*}\nE=mc^2\n\\end{equation*}");
}

#[test]
fn test_inline_yields_separate_candidates() {
    let eqs = extract_equations("$a$ and $b$", EquationSelection::only(EquationKind::Inline));
    assert_eq!(eqs, vec!["$a$".to_string(), "$b$".to_string()]);
}

#[test]
fn test_label_presence_and_absence() {
    assert_eq!(equation_label("x \\label{eq:foo}"), Some("eq_foo".to_string()));
    assert_eq!(equation_label("x"), None);
}

#[test]
fn test_candidates_round_trip_through_delimiters() {
    for candidate in extract_candidates(PAPER, EquationSelection::all()) {
        let rebuilt = format!(
            "{}{}{}",
            candidate.opening(),
            candidate.content,
            candidate.closing()
        );
        assert_eq!(rebuilt, candidate.text);
        assert_eq!(
            &PAPER[candidate.offset..candidate.offset + candidate.text.len()],
            candidate.text
        );
        let stripped = candidate
            .text
            .strip_prefix(candidate.opening())
            .and_then(|rest| rest.strip_suffix(candidate.closing()))
            .unwrap();
        assert_eq!(stripped, candidate.content);
    }
}

#[test]
fn test_surviving_equations_are_untouched_by_filtering() {
    let survivors = extract_equations(PAPER, EquationSelection::all());
    let raw: Vec<_> = extract_candidates(PAPER, EquationSelection::all())
        .into_iter()
        .filter(|c| !is_trivial(c.content))
        .map(|c| c.text.to_string())
        .collect();
    for eq in survivors {
        assert!(raw.contains(&eq));
    }
}

#[test]
fn test_candidate_serializes_kind_in_lowercase() {
    let candidates = extract_candidates("$$a$$", EquationSelection::all());
    let json = serde_json::to_value(&candidates[0]).unwrap();
    assert_eq!(json["kind"], "display");
    assert_eq!(json["content"], "a");
    assert_eq!(json["offset"], 0);
}
