use std::path::PathBuf;

use crate::error::Result;
use crate::frame::{Chunk, SourceFrame};
use crate::recipe::RecombinationRecipe;

/// A rewindable, lazily decoded frame sequence.
pub trait AnimationSource {
    /// Decode the next frame. `Ok(None)` marks end of sequence.
    ///
    /// # Errors
    /// Returns `ConvertError::Decode` if the frame cannot be decoded.
    fn next_frame(&mut self) -> Result<Option<SourceFrame>>;

    /// Reset the read position to the first frame.
    ///
    /// # Errors
    /// Returns `ConvertError::Open` if the source cannot be reopened.
    fn rewind(&mut self) -> Result<()>;
}

/// Destination for pipeline artifacts.
pub trait ArtifactSink {
    /// Persist one chunk as a standalone animation and return its path.
    /// The chunk is consumed; its frames are released when this returns.
    ///
    /// # Errors
    /// Returns `ConvertError::Write` on any persistence failure.
    fn persist_chunk(&mut self, index: usize, chunk: Chunk) -> Result<PathBuf>;

    /// Persist the recombination recipe and return the script path.
    ///
    /// # Errors
    /// Returns `ConvertError::Write` on any persistence failure.
    fn persist_recipe(&mut self, recipe: &RecombinationRecipe) -> Result<PathBuf>;
}
