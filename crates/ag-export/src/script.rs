//! Recombination script: concatenates chunk GIFs with ffmpeg, then removes them.

use std::path::{Path, PathBuf};

use ag_core::error::{ConvertError, Result};
use ag_core::recipe::RecombinationRecipe;

use crate::compose;

pub const SCRIPT_FILE_NAME: &str = "combine_chunks.sh";

/// Quote `s` for a POSIX shell when it holds anything beyond plain path characters.
fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Absolute form of `path`, falling back to the path itself.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Render the script text for `recipe`.
///
/// The ffmpeg invocation lists chunks in index order; each `rm` runs only if
/// every previous command succeeded.
///
/// # Example
/// ```
/// use ag_core::recipe::RecombinationRecipe;
/// use ag_export::script::render_script;
/// use std::path::PathBuf;
///
/// let recipe = RecombinationRecipe::new(
///     vec![PathBuf::from("/tmp/chunk_0.gif")],
///     PathBuf::from("/tmp/output.gif"),
/// );
/// let script = render_script(&recipe);
/// assert!(script.starts_with("#!/bin/bash\n"));
/// assert!(script.contains("rm -- /tmp/chunk_0.gif\n"));
/// ```
#[must_use]
pub fn render_script(recipe: &RecombinationRecipe) -> String {
    let mut command = String::from(compose::FFMPEG);
    for arg in compose::ffmpeg_args(recipe) {
        command.push(' ');
        command.push_str(&shell_quote(&arg.to_string_lossy()));
    }

    let mut script = String::from("#!/bin/bash\nset -euo pipefail\n\n");
    script.push_str(&command);
    script.push('\n');
    for chunk in recipe.chunk_paths() {
        script.push_str("rm -- ");
        script.push_str(&shell_quote(&absolute(chunk).to_string_lossy()));
        script.push('\n');
    }
    script
}

/// Write the script for `recipe` to `path` and mark it executable.
///
/// # Errors
/// Returns `ConvertError::Write` if the file or its permissions cannot be written.
pub fn write_script(path: &Path, recipe: &RecombinationRecipe) -> Result<()> {
    std::fs::write(path, render_script(recipe)).map_err(|e| ConvertError::write(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| ConvertError::write(path, e))?;
    }

    log::info!(
        "Wrote recombination script {} ({} chunks)",
        path.display(),
        recipe.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(n: usize) -> RecombinationRecipe {
        RecombinationRecipe::new(
            (0..n)
                .map(|i| PathBuf::from(format!("/work/chunk_{i}.gif")))
                .collect(),
            PathBuf::from("/work/output.gif"),
        )
    }

    #[test]
    fn lists_chunks_in_order_and_removes_each() {
        let script = render_script(&recipe(4));
        let ffmpeg_line = script
            .lines()
            .find(|l| l.starts_with("ffmpeg "))
            .unwrap();

        let positions: Vec<usize> = (0..4)
            .map(|i| ffmpeg_line.find(&format!("-i /work/chunk_{i}.gif")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(ffmpeg_line.contains("concat=n=4:v=1:a=0[out]"));
        assert!(ffmpeg_line.ends_with(" /work/output.gif"));

        let removals: Vec<&str> = script.lines().filter(|l| l.starts_with("rm ")).collect();
        assert_eq!(
            removals,
            vec![
                "rm -- /work/chunk_0.gif",
                "rm -- /work/chunk_1.gif",
                "rm -- /work/chunk_2.gif",
                "rm -- /work/chunk_3.gif",
            ]
        );
    }

    #[test]
    fn quotes_awkward_paths() {
        assert_eq!(shell_quote("it's.gif"), r"'it'\''s.gif'");
        assert_eq!(shell_quote("/w/chunk_0.gif"), "/w/chunk_0.gif");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote(""), "''");
        let recipe = RecombinationRecipe::new(
            vec![PathBuf::from("/w/it's.gif")],
            PathBuf::from("/w/out.gif"),
        );
        assert!(render_script(&recipe).contains(r"rm -- '/w/it'\''s.gif'"));
    }

    #[cfg(unix)]
    #[test]
    fn written_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCRIPT_FILE_NAME);
        write_script(&path, &recipe(2)).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(
            std::fs::read_to_string(&path)
                .unwrap()
                .starts_with("#!/bin/bash")
        );
    }
}
