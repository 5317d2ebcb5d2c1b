use std::path::PathBuf;

/// Central error type for reposnap.
#[derive(Debug, thiserror::Error)]
pub enum ReposnapError {
    #[error("inspection failed for {path}: {message}")]
    Inspection { path: PathBuf, message: String },

    #[error("error walking the path {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("snapshot error for {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    #[error("failed to restore repo {path}: {message}")]
    Restore { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ReposnapError {
    pub fn inspection(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Inspection {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn restore(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Restore {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.into(),
        }
    }
}
