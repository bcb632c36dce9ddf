// File: src/error.rs
//! Error types for group formation and state persistence.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotationError {
    #[error("group size {group_size} is invalid for a roster of {roster_size}")]
    InvalidGroupSize { group_size: usize, roster_size: usize },

    #[error("participant '{participant}' cannot be paired with themselves")]
    InvalidPair { participant: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode state for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("failed to decode state file {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl RotationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RotationError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RotationResult<T> = Result<T, RotationError>;
