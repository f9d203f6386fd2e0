/// Error types shared by the session, the imaging layer and the UI
///
/// `ViewerError` is `Clone` so it can be carried inside iced messages;
/// underlying library errors are flattened to their display text.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that abort a single user action and leave the session intact
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// Unreadable or unsupported image data
    #[error("could not decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The rendered image could not be encoded in the requested format
    #[error("could not encode image: {0}")]
    Encode(String),

    /// Open, save or directory listing failed
    #[error("{action} {path}: {reason}")]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// A filter could not be applied while replaying the parameter set
    #[error("could not render image: {0}")]
    Recompute(String),

    /// A parameter value that cannot be stored (NaN, infinity)
    #[error("invalid value for {field}: {value}")]
    InvalidParameter { field: &'static str, value: f32 },
}

impl ViewerError {
    pub fn decode(path: &Path, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn filesystem(action: &'static str, path: &Path, reason: impl ToString) -> Self {
        Self::Filesystem {
            action,
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of the persisted settings store
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings database: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("settings directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine user data directory")]
    NoDataDir,
}
