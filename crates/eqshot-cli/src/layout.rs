use std::path::{Component, Path, PathBuf};

/// Directory receiving the images of `source`.
///
/// Mirrors the source's directory under `output_root`, keeping only plain
/// path components, then adds the file stem: `sec/intro.tex` with output
/// `images` becomes `images/sec/intro`. Absolute and `./` or `../` prefixes
/// are dropped so the result always stays inside `output_root`.
pub fn file_output_dir(output_root: &Path, source: &Path) -> PathBuf {
    let mut dir = output_root.to_path_buf();
    if let Some(parent) = source.parent() {
        for component in parent.components() {
            if let Component::Normal(part) = component {
                dir.push(part);
            }
        }
    }
    if let Some(stem) = source.file_stem() {
        dir.push(stem);
    }
    dir
}

/// Image file name for one equation: `equation_<label>.<ext>`, or
/// `equation_<position>.<ext>` when there is no usable label.
pub fn image_name(label: Option<&str>, position: usize, extension: &str) -> String {
    match label {
        Some(label) if !label.is_empty() => format!("equation_{}.{}", label, extension),
        _ => format!("equation_{}.{}", position, extension),
    }
}

/// Base name for the equation's intermediate files.
pub fn scratch_stem(position: usize) -> String {
    format!("equation_{}", position)
}

pub fn is_tex_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrors_relative_directories() {
        let dir = file_output_dir(Path::new("images"), Path::new("paper/sec/intro.tex"));
        assert_eq!(dir, PathBuf::from("images/paper/sec/intro"));
    }

    #[test]
    fn test_strips_dot_and_root_prefixes() {
        assert_eq!(
            file_output_dir(Path::new("out"), Path::new("./main.tex")),
            PathBuf::from("out/main")
        );
        assert_eq!(
            file_output_dir(Path::new("out"), Path::new("../proj/a.tex")),
            PathBuf::from("out/proj/a")
        );
        #[cfg(unix)]
        assert_eq!(
            file_output_dir(Path::new("out"), Path::new("/home/me/b.tex")),
            PathBuf::from("out/home/me/b")
        );
    }

    #[test]
    fn test_image_names() {
        assert_eq!(image_name(Some("eq_foo"), 3, "png"), "equation_eq_foo.png");
        assert_eq!(image_name(None, 3, "png"), "equation_3.png");
        assert_eq!(image_name(Some(""), 7, "jpg"), "equation_7.jpg");
        assert_eq!(scratch_stem(2), "equation_2");
    }

    #[test]
    fn test_tex_sources() {
        assert!(is_tex_source(Path::new("a/b.tex")));
        assert!(!is_tex_source(Path::new("a/b.bib")));
        assert!(!is_tex_source(Path::new("tex")));
    }
}
