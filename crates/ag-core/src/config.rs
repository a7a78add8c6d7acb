//! Run configuration for a conversion.
//!
//! Defaults, then an optional TOML file, then CLI overrides applied by the binary.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::Rgb;
use crate::error::{ConvertError, Result};

/// Parameters of one conversion run.
///
/// # Example
/// ```
/// use ag_core::config::ConvertConfig;
/// let config: ConvertConfig = toml::from_str("width = 80\nchunk_size = 0.25").unwrap();
/// assert_eq!(config.width, 80);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Target glyph columns before `scale` is applied.
    pub width: u32,
    /// Resolution multiplier: columns = round(width × scale).
    pub scale: f32,
    /// Fraction of the total frame count held per chunk, in (0, 1].
    pub chunk_size: f64,
    pub background: Rgb,
    pub foreground: Rgb,
    /// Final artifact path (text file, image or recombined animation).
    pub output: Option<PathBuf>,
    /// Directory receiving chunk artifacts and the recombination script.
    pub work_dir: PathBuf,
    /// TrueType font for rendering; the built-in bitmap face when unset.
    pub font: Option<PathBuf>,
    /// Pixel height used with `font`.
    pub font_size: f32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            width: 100,
            scale: 1.0,
            chunk_size: 0.1,
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
            output: None,
            work_dir: PathBuf::from("."),
            font: None,
            font_size: 11.0,
        }
    }
}

impl ConvertConfig {
    /// Load a TOML config file. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `ConvertError::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `ConvertError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(ConvertError::Config("width must be at least 1".into()));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConvertError::Config(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.chunk_size > 0.0 && self.chunk_size <= 1.0) {
            return Err(ConvertError::Config(format!(
                "chunk_size must be in (0, 1], got {}",
                self.chunk_size
            )));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConvertError::Config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }

    /// Glyph columns after scaling, never below one.
    #[must_use]
    pub fn effective_width(&self) -> u32 {
        (f64::from(self.width) * f64::from(self.scale)).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ConvertConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.background, Rgb::WHITE);
        assert_eq!(config.foreground, Rgb::BLACK);
        assert_eq!(config.effective_width(), 100);
    }

    #[test]
    fn parses_colors_and_paths() {
        let config: ConvertConfig = toml::from_str(
            r##"
            width = 80
            scale = 0.5
            background = "#000000"
            foreground = "white"
            work_dir = "/tmp/chunks"
            "##,
        )
        .unwrap();
        assert_eq!(config.effective_width(), 40);
        assert_eq!(config.background, Rgb::BLACK);
        assert_eq!(config.foreground, Rgb::WHITE);
        assert_eq!(config.work_dir, PathBuf::from("/tmp/chunks"));
    }

    #[test]
    fn rejects_unknown_keys_and_bad_colors() {
        assert!(toml::from_str::<ConvertConfig>("more_info = true").is_err());
        assert!(toml::from_str::<ConvertConfig>("background = \"mauve-ish\"").is_err());
    }

    #[test]
    fn chunk_size_range_is_checked() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let config = ConvertConfig {
                chunk_size: bad,
                ..ConvertConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConvertError::Config(_))),
                "chunk_size {bad} accepted"
            );
        }
        let config = ConvertConfig {
            chunk_size: 1.0,
            ..ConvertConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asciigif.toml");
        std::fs::write(&path, "width = 64\nchunk_size = 0.08\n").unwrap();
        let config = ConvertConfig::load(&path).unwrap();
        assert_eq!(config.width, 64);
        assert!((config.chunk_size - 0.08).abs() < f64::EPSILON);

        let missing = ConvertConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConvertError::Config(_))));
    }
}
