use std::path::{Path, PathBuf};

/// Final output name when the caller does not choose one.
pub const DEFAULT_RECOMBINED_OUTPUT: &str = "output.gif";

/// How to concatenate persisted chunk artifacts into one animation.
///
/// Pure data: turning it into a script or a process is left to `ag-export`.
///
/// # Example
/// ```
/// use ag_core::recipe::RecombinationRecipe;
/// use std::path::PathBuf;
/// let recipe = RecombinationRecipe::new(
///     vec![PathBuf::from("chunk_0.gif"), PathBuf::from("chunk_1.gif")],
///     PathBuf::from("output.gif"),
/// );
/// assert_eq!(recipe.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecombinationRecipe {
    chunk_paths: Vec<PathBuf>,
    output: PathBuf,
}

impl RecombinationRecipe {
    #[must_use]
    pub fn new(chunk_paths: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            chunk_paths,
            output,
        }
    }

    /// Chunk artifacts in index order.
    #[must_use]
    pub fn chunk_paths(&self) -> &[PathBuf] {
        &self.chunk_paths
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunk_paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunk_paths.is_empty()
    }
}
