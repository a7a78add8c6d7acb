use std::path::Path;

use ag_app::cli::{Cli, Command};
use ag_app::convert::{self, FrameConverter};
use ag_app::pipeline::ChunkedPipeline;
use ag_core::config::ConvertConfig;
use ag_core::recipe::DEFAULT_RECOMBINED_OUTPUT;
use ag_export::gif::GifChunkSink;
use anyhow::{Context, Result};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let config = cli.resolve_config().context("Configuration invalide")?;
    log::debug!("Resolved configuration: {config:?}");
    let converter = FrameConverter::new(&config).context("Cannot prepare renderer")?;

    match &cli.command {
        Command::Still {
            input,
            print,
            image,
            ..
        } => run_still(input, &config, &converter, *print, image.as_deref()),
        Command::Animate { input, .. } => run_animate(input, &config, &converter),
        Command::Chunked { input, compose, .. } => {
            run_chunked(input, &config, &converter, *compose)
        }
    }
}

fn run_still(
    input: &Path,
    config: &ConvertConfig,
    converter: &FrameConverter,
    print: bool,
    image: Option<&Path>,
) -> Result<()> {
    let ascii = convert::convert_still(input, converter)
        .with_context(|| format!("Failed to generate ASCII art for {}", input.display()))?;

    let text_path = config
        .output
        .clone()
        .unwrap_or_else(|| convert::default_text_output(input));
    ag_export::text::write_text(&text_path, &ascii)?;
    if print {
        print!("{}", ascii.to_text());
    }
    if let Some(image_path) = image {
        ag_export::text::write_image(image_path, converter.rasterize(&ascii))?;
    }
    Ok(())
}

fn run_animate(input: &Path, config: &ConvertConfig, converter: &FrameConverter) -> Result<()> {
    let mut source = ag_source::image::open_animation(input)
        .with_context(|| format!("Unable to open animation {}", input.display()))?;
    let chunk = convert::convert_all_frames(source.as_mut(), converter)?;
    let frames = chunk.len();

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| convert::default_animation_output(input));
    ag_export::gif::write_animation(&output, chunk)?;
    log::info!("ASCII GIF saved as {} ({frames} frames)", output.display());
    Ok(())
}

fn run_chunked(
    input: &Path,
    config: &ConvertConfig,
    converter: &FrameConverter,
    compose: bool,
) -> Result<()> {
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("Cannot create {}", config.work_dir.display()))?;
    let output = config
        .output
        .clone()
        .unwrap_or_else(|| config.work_dir.join(DEFAULT_RECOMBINED_OUTPUT));

    let mut sink = GifChunkSink::new(&config.work_dir);
    let mut pipeline = ChunkedPipeline::new(converter, output);
    let report = pipeline
        .run_path(input, &mut sink)
        .with_context(|| format!("Chunked conversion of {} failed", input.display()))?;
    log::info!(
        "Wrote {} frames in {} chunks",
        report.frames_written(),
        report.chunk_sizes.len()
    );

    if compose {
        ag_export::compose::run(&report.recipe).context("Recombination failed")?;
        log::info!("Combined animation saved as {}", report.recipe.output().display());
    } else {
        println!(
            "\nRun the following command to combine the chunks and clean up:\n\n    bash {}",
            report.script_path.display()
        );
    }
    Ok(())
}
