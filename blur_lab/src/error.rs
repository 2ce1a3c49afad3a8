use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a blur pass or by the picture/config plumbing around it.
#[derive(Debug, Error)]
pub enum BlurError {
    #[error("Failed to spawn worker thread '{name}': {source}")]
    ThreadSpawn {
        name: String,
        source: std::io::Error,
    },

    #[error("Failed to build thread pool with {threads} threads: {source}")]
    PoolBuild {
        threads: usize,
        source: rayon::ThreadPoolBuildError,
    },

    #[error("Worker thread '{name}' panicked")]
    WorkerPanicked { name: String },

    #[error("Invalid picture: {0}")]
    InvalidPicture(String),

    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode or encode image '{path}': {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read or write configuration: {0}")]
    Config(#[from] common::file_format::FileFormatError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BlurError>;
