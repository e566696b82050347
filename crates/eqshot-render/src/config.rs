use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Raster formats `magick` is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Webp,
    Gif,
    Tiff,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
            ImageFormat::Gif => "gif",
            ImageFormat::Tiff => "tiff",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "webp" => Ok(ImageFormat::Webp),
            "gif" => Ok(ImageFormat::Gif),
            "tif" | "tiff" => Ok(ImageFormat::Tiff),
            other => Err(anyhow::anyhow!("unsupported image format '{}'", other)),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Settings for [`LatexToolchain`](crate::LatexToolchain).
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Rasterization density in dots per inch.
    pub density: u32,
    pub format: ImageFormat,
    /// `magick -quality` value.
    pub quality: u8,
    /// `pdfcrop --margins` value, in PostScript points.
    pub crop_margin: u32,
    /// Packages loaded ahead of the extracted preamble unless it already
    /// declares them.
    pub base_packages: Vec<String>,
    pub pdflatex: String,
    pub pdfcrop: String,
    pub magick: String,
    /// Where intermediate files go. `None` uses a private temporary directory.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            density: 300,
            format: ImageFormat::Png,
            quality: 90,
            crop_margin: 3,
            base_packages: vec!["amsmath".to_string(), "amssymb".to_string()],
            pdflatex: "pdflatex".to_string(),
            pdfcrop: "pdfcrop".to_string(),
            magick: "magick".to_string(),
            scratch_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert_eq!(ImageFormat::Tiff.to_string(), "tiff");
        assert!("bmpx".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.density, 300);
        assert_eq!(config.quality, 90);
        assert_eq!(config.crop_margin, 3);
        assert_eq!(config.format.extension(), "png");
    }
}
