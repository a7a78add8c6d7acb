//! Out-of-process recombination through ffmpeg.
//!
//! Prérequis runtime: `ffmpeg` dans le PATH. The conversion pipeline never calls
//! into this module; only the binary does, when asked to compose immediately.

use std::ffi::OsString;
use std::process::{Command, Stdio};

use ag_core::error::{ConvertError, Result};
use ag_core::recipe::RecombinationRecipe;

use crate::script::absolute;

pub const FFMPEG: &str = "ffmpeg";

/// ffmpeg arguments concatenating the recipe's chunks, in order, into its output.
///
/// # Example
/// ```
/// use ag_core::recipe::RecombinationRecipe;
/// use ag_export::compose::ffmpeg_args;
/// use std::path::PathBuf;
///
/// let recipe = RecombinationRecipe::new(
///     vec![PathBuf::from("/w/chunk_0.gif"), PathBuf::from("/w/chunk_1.gif")],
///     PathBuf::from("/w/output.gif"),
/// );
/// let args = ffmpeg_args(&recipe);
/// assert_eq!(args[1], "-i");
/// assert_eq!(args[2], "/w/chunk_0.gif");
/// assert_eq!(args.last().unwrap(), "/w/output.gif");
/// ```
#[must_use]
pub fn ffmpeg_args(recipe: &RecombinationRecipe) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into()];
    for chunk in recipe.chunk_paths() {
        args.push("-i".into());
        args.push(absolute(chunk).into_os_string());
    }
    args.push("-filter_complex".into());
    args.push(format!("concat=n={}:v=1:a=0[out]", recipe.len()).into());
    args.push("-map".into());
    args.push("[out]".into());
    args.push(absolute(recipe.output()).into_os_string());
    args
}

/// Run the recipe now: concatenate with ffmpeg, then delete every chunk.
///
/// Chunks are left in place if ffmpeg fails.
///
/// # Errors
/// Returns `ConvertError::Write` if ffmpeg cannot be spawned, exits with a
/// failure status, or a chunk cannot be removed.
pub fn run(recipe: &RecombinationRecipe) -> Result<()> {
    let output = recipe.output();
    log::info!(
        "Composing {} chunks into {} with {FFMPEG}",
        recipe.len(),
        output.display()
    );
    let status = Command::new(FFMPEG)
        .args(ffmpeg_args(recipe))
        .stdin(Stdio::null())
        .status()
        .map_err(|e| ConvertError::write(output, e))?;
    if !status.success() {
        return Err(ConvertError::write(
            output,
            std::io::Error::other(format!("{FFMPEG} exited with {status}")),
        ));
    }

    for chunk in recipe.chunk_paths() {
        std::fs::remove_file(chunk).map_err(|e| ConvertError::write(chunk, e))?;
        log::debug!("Removed {}", chunk.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn filter_counts_every_chunk() {
        let recipe = RecombinationRecipe::new(
            (0..3).map(|i| PathBuf::from(format!("/w/c{i}.gif"))).collect(),
            PathBuf::from("/w/out.gif"),
        );
        let args = ffmpeg_args(&recipe);
        let inputs = args.iter().filter(|a| *a == "-i").count();
        assert_eq!(inputs, 3);
        assert!(args.iter().any(|a| a == "concat=n=3:v=1:a=0[out]"));
    }

    #[test]
    fn relative_paths_are_made_absolute() {
        let recipe = RecombinationRecipe::new(
            vec![PathBuf::from("chunk_0.gif")],
            PathBuf::from("output.gif"),
        );
        let args = ffmpeg_args(&recipe);
        assert!(PathBuf::from(&args[2]).is_absolute());
        assert!(PathBuf::from(args.last().unwrap()).is_absolute());
    }
}
