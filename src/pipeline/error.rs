//! Error types for the audit pipeline

use crate::analyzer::walker::WalkError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an audit run
///
/// Component failures never abort; they degrade their section instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Project root does not exist
    #[error("Project root not found: {0}")]
    RootNotFound(PathBuf),

    /// Project root is a file
    #[error("Project root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Project root could not be read
    #[error("Cannot read project root {path}")]
    RootUnreadable {
        /// Root path
        path: PathBuf,
        /// I/O error
        #[source]
        source: std::io::Error,
    },
}

impl From<WalkError> for PipelineError {
    fn from(err: WalkError) -> Self {
        match err {
            WalkError::RootNotFound(path) => Self::RootNotFound(path),
            WalkError::NotADirectory(path) => Self::NotADirectory(path),
            WalkError::RootUnreadable { path, source } => Self::RootUnreadable { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_errors_map_to_root_errors() {
        let err: PipelineError = WalkError::RootNotFound(PathBuf::from("/missing")).into();
        assert!(matches!(err, PipelineError::RootNotFound(_)));
        assert!(err.to_string().contains("/missing"));

        let err: PipelineError = WalkError::RootUnreadable {
            path: PathBuf::from("/locked"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert!(matches!(err, PipelineError::RootUnreadable { .. }));
    }
}
