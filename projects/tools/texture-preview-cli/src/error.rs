use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Failed to map {path}: {message}")]
    Mmap { path: String, message: String },
    #[error("Failed to write {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("{0}: no format matched")]
    Unrecognised(String),
}
