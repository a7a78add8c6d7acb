//! Error kinds shared by every conversion stage.

use std::path::PathBuf;

/// Fatal conversion error. No variant is retried; the caller reports and exits.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Source missing, unreadable or not a decodable image.
    #[error("cannot open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// A single frame failed to decode or resample.
    #[error("cannot decode frame {frame}: {reason}")]
    Decode { frame: usize, reason: String },

    /// Persisting an artifact (chunk, script, text or image) failed.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ConvertError {
    /// Build an `Open` error from anything displayable.
    pub fn open(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a `Decode` error for frame `frame`.
    pub fn decode(frame: usize, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            frame,
            reason: reason.to_string(),
        }
    }

    /// Build a `Write` error for `path`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_artifact() {
        let err = ConvertError::open("anim.gif", "no such file");
        assert_eq!(err.to_string(), "cannot open anim.gif: no such file");

        let err = ConvertError::decode(7, "truncated");
        assert_eq!(err.to_string(), "cannot decode frame 7: truncated");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConvertError::write("chunk_0.gif", io);
        assert!(err.to_string().starts_with("cannot write chunk_0.gif"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
