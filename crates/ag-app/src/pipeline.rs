//! Chunked animation pipeline.
//!
//! Scanning → Chunking → Composing → Done, with Failed reachable from any
//! state. At most one chunk of rendered frames is alive at a time: each chunk
//! buffer is moved into the sink before the next one is started.

use std::fmt;
use std::path::{Path, PathBuf};

use ag_core::error::{ConvertError, Result};
use ag_core::frame::Chunk;
use ag_core::recipe::RecombinationRecipe;
use ag_core::traits::{AnimationSource, ArtifactSink};

use crate::convert::FrameConverter;

/// Pipeline lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Scanning,
    Chunking,
    Composing,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Chunking => "chunking",
            Self::Composing => "composing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Frames per chunk: `max(1, floor(total_frames × chunk_size))`.
///
/// # Example
/// ```
/// use ag_app::pipeline::chunk_frame_count;
/// assert_eq!(chunk_frame_count(10, 0.3), 3);
/// assert_eq!(chunk_frame_count(5, 0.1), 1);
/// assert_eq!(chunk_frame_count(100, 0.08), 8);
/// ```
#[must_use]
pub fn chunk_frame_count(total_frames: usize, chunk_size: f64) -> usize {
    ((total_frames as f64 * chunk_size).floor() as usize).max(1)
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub total_frames: usize,
    pub chunk_frame_count: usize,
    /// Frames actually written to each chunk, in index order.
    pub chunk_sizes: Vec<usize>,
    pub recipe: RecombinationRecipe,
    pub script_path: PathBuf,
}

impl PipelineReport {
    #[must_use]
    pub fn frames_written(&self) -> usize {
        self.chunk_sizes.iter().sum()
    }
}

/// Converts an animation chunk by chunk and emits a recombination recipe.
///
/// # Example
/// ```no_run
/// use ag_app::convert::FrameConverter;
/// use ag_app::pipeline::ChunkedPipeline;
/// use ag_core::config::ConvertConfig;
/// use ag_export::gif::GifChunkSink;
/// use std::path::Path;
///
/// let config = ConvertConfig { width: 80, chunk_size: 0.08, ..ConvertConfig::default() };
/// let converter = FrameConverter::new(&config).unwrap();
/// let mut sink = GifChunkSink::new(".");
/// let mut pipeline = ChunkedPipeline::new(&converter, "output.gif");
/// let report = pipeline.run_path(Path::new("f.gif"), &mut sink).unwrap();
/// println!("bash {}", report.script_path.display());
/// ```
pub struct ChunkedPipeline<'a> {
    converter: &'a FrameConverter,
    output: PathBuf,
    state: PipelineState,
}

impl<'a> ChunkedPipeline<'a> {
    pub fn new(converter: &'a FrameConverter, output: impl Into<PathBuf>) -> Self {
        Self {
            converter,
            output: output.into(),
            state: PipelineState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        log::info!("Pipeline {} → {next}", self.state);
        self.state = next;
    }

    /// Open `path` and run the pipeline on it.
    ///
    /// # Errors
    /// Returns `ConvertError::Open` if the source cannot be opened, otherwise
    /// as [`ChunkedPipeline::run`].
    pub fn run_path(&mut self, path: &Path, sink: &mut dyn ArtifactSink) -> Result<PipelineReport> {
        self.transition(PipelineState::Scanning);
        let mut source = match ag_source::image::open_animation(path) {
            Ok(source) => source,
            Err(e) => {
                self.transition(PipelineState::Failed);
                return Err(e);
            }
        };
        self.run(source.as_mut(), sink)
    }

    /// Run the pipeline on an already opened source.
    ///
    /// Chunks persisted before a failure stay where the sink put them.
    ///
    /// # Errors
    /// Returns the first error from the source, the conversion chain or the sink.
    pub fn run(
        &mut self,
        source: &mut dyn AnimationSource,
        sink: &mut dyn ArtifactSink,
    ) -> Result<PipelineReport> {
        let result = self.run_stages(source, sink);
        match &result {
            Ok(_) => self.transition(PipelineState::Done),
            Err(e) => {
                log::error!("Pipeline failed while {}: {e}", self.state);
                self.transition(PipelineState::Failed);
            }
        }
        result
    }

    fn run_stages(
        &mut self,
        source: &mut dyn AnimationSource,
        sink: &mut dyn ArtifactSink,
    ) -> Result<PipelineReport> {
        if self.state != PipelineState::Scanning {
            self.transition(PipelineState::Scanning);
        }
        let durations = scan(source)?;
        let total_frames = durations.len();
        let per_chunk = chunk_frame_count(total_frames, self.converter.config().chunk_size);
        log::info!("Total frames to process: {total_frames} ({per_chunk} per chunk)");

        self.transition(PipelineState::Chunking);
        let mut processed_frames = 0usize;
        let mut chunk_paths = Vec::new();
        let mut chunk_sizes = Vec::new();

        while processed_frames < total_frames {
            let wanted = per_chunk.min(total_frames - processed_frames);
            let chunk = self.fill_chunk(source, &durations, processed_frames, wanted)?;
            if chunk.is_empty() {
                log::warn!(
                    "Source ended after {processed_frames} of {total_frames} frames"
                );
                break;
            }

            let consumed = chunk.len();
            let path = sink.persist_chunk(chunk_paths.len(), chunk)?;
            chunk_paths.push(path);
            chunk_sizes.push(consumed);
            processed_frames += consumed;
            if consumed < wanted {
                log::warn!("Source ended mid-chunk after {processed_frames} frames");
                break;
            }
        }

        if chunk_paths.is_empty() {
            return Err(ConvertError::decode(
                0,
                "source yielded no frames after rewinding",
            ));
        }

        self.transition(PipelineState::Composing);
        let recipe = RecombinationRecipe::new(chunk_paths, self.output.clone());
        let script_path = sink.persist_recipe(&recipe)?;

        Ok(PipelineReport {
            total_frames,
            chunk_frame_count: per_chunk,
            chunk_sizes,
            recipe,
            script_path,
        })
    }

    /// Pull and render up to `wanted` frames into a fresh chunk buffer.
    ///
    /// Durations come from the scan; a differing live delay is only reported.
    fn fill_chunk(
        &self,
        source: &mut dyn AnimationSource,
        durations: &[u32],
        first_index: usize,
        wanted: usize,
    ) -> Result<Chunk> {
        let mut chunk = Chunk::with_capacity(wanted);
        for index in first_index..first_index + wanted {
            let Some(frame) = source.next_frame()? else {
                break;
            };
            let duration = durations[index];
            if frame.duration_ms() != duration {
                log::warn!(
                    "Frame {index}: live delay {} ms differs from scanned {duration} ms, keeping scanned value",
                    frame.duration_ms()
                );
            }
            let rendered = self.converter.render_frame(&frame.buffer, index)?;
            chunk.push(rendered, duration);
            log::debug!("Rendered frame {index}");
        }
        Ok(chunk)
    }
}

/// Count frames and read their durations in one pass, then rewind.
fn scan(source: &mut dyn AnimationSource) -> Result<Vec<u32>> {
    let mut durations = Vec::new();
    while let Some(frame) = source.next_frame()? {
        durations.push(frame.duration_ms());
    }
    if durations.is_empty() {
        return Err(ConvertError::decode(0, "source has no frames"));
    }
    source.rewind()?;
    Ok(durations)
}
