//! CLI argument parsing with clap.

use std::path::PathBuf;

use ag_core::color::Rgb;
use ag_core::config::ConvertConfig;
use ag_core::error::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Convert images and animated GIFs to ASCII art
#[derive(Parser, Debug)]
#[command(name = "asciigif")]
#[command(version, about = "Image and animated GIF to ASCII art converter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file; CLI flags override its values
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a still image to a text file
    Still {
        input: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        /// Also print the ASCII art to stdout
        #[arg(long)]
        print: bool,
        /// Also rasterize the ASCII art to this image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Convert an animation in one pass, holding every frame in memory
    Animate {
        input: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Convert an animation chunk by chunk and emit a recombination script
    Chunked {
        input: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        /// Fraction of the frames held per chunk, in (0, 1]
        #[arg(long)]
        chunk_size: Option<f64>,
        /// Directory for chunk files and the script
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// Run ffmpeg right away instead of only writing the script
        #[arg(long)]
        compose: bool,
    },
}

/// Rendering options shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    /// Target glyph columns before scaling
    #[arg(long, short)]
    pub width: Option<u32>,
    /// Resolution multiplier
    #[arg(long, short)]
    pub scale: Option<f32>,
    /// Background color (name or #rrggbb)
    #[arg(long)]
    pub background: Option<Rgb>,
    /// Glyph color (name or #rrggbb)
    #[arg(long)]
    pub foreground: Option<Rgb>,
    /// TrueType font used to draw glyphs
    #[arg(long)]
    pub font: Option<PathBuf>,
    /// Font pixel height
    #[arg(long)]
    pub font_size: Option<f32>,
    /// Output file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    fn apply(&self, config: &mut ConvertConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(bg) = self.background {
            config.background = bg;
        }
        if let Some(fg) = self.foreground {
            config.foreground = fg;
        }
        if let Some(font) = &self.font {
            config.font = Some(font.clone());
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
    }
}

impl Cli {
    /// Defaults, then the config file, then flags.
    ///
    /// # Errors
    /// Returns `ConvertError::Config` if the file is unreadable or the merged
    /// values are out of range.
    pub fn resolve_config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)?,
            None => ConvertConfig::default(),
        };
        match &self.command {
            Command::Still { render, .. } | Command::Animate { render, .. } => {
                render.apply(&mut config);
            }
            Command::Chunked {
                render,
                chunk_size,
                work_dir,
                ..
            } => {
                render.apply(&mut config);
                if let Some(size) = chunk_size {
                    config.chunk_size = *size;
                }
                if let Some(dir) = work_dir {
                    config.work_dir = dir.clone();
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Default log filter for the verbosity flags.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
