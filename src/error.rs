use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ContextizerError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("The directory '{0}' does not exist.")]
    MissingRoot(PathBuf),
    #[error("'{0}' is not a directory.")]
    NotADirectory(PathBuf),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
impl ContextizerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContextizerError::Io {
            path: path.into(),
            source,
        }
    }
}
