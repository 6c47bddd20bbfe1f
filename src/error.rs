// Error taxonomy for a theme build

use std::path::PathBuf;

/// Every way a build can fail. All variants are fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid density tier '{tier}' (expected one of lo, tv, hd, xhd, xxhd, xxxhd)")]
    InvalidTier { tier: String },

    #[error("malformed cursor spec {}: {reason}", .path.display())]
    MalformedSpec { path: PathBuf, reason: String },

    #[error("malformed alias at {}:{line}: {reason}", .path.display())]
    MalformedAlias {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("no cursor specs found under {}", .dir.display())]
    NoSpecs { dir: PathBuf },

    #[error("image {} referenced by cursor '{cursor}' does not exist", .path.display())]
    MissingImage { cursor: String, path: PathBuf },

    #[error("{tool} failed ({status}): {stderr}")]
    ExternalTool {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("invalid theme manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type BuildResult<T> = Result<T, BuildError>;

impl From<rayon::ThreadPoolBuildError> for BuildError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        BuildError::Io(std::io::Error::other(e.to_string()))
    }
}

impl BuildError {
    pub fn malformed_spec(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedSpec {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn render(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }
}
