//! Error types.

use crate::dataset::{AnnotationId, ImageId};
use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type of dataset loading and batch collation.
#[derive(Debug, Error)]
pub enum Error {
    /// The annotation file is missing or cannot be parsed.
    #[error("failed to load annotation file '{}'", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("index {index} is out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("image id {0} is not found in the annotation index")]
    UnknownImage(ImageId),

    #[error("annotation id {0} is not found in the annotation index")]
    UnknownAnnotation(AnnotationId),

    /// The image file cannot be opened or read.
    #[error("failed to read image file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image file content is corrupted or in an unsupported format.
    #[error("failed to decode image file '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {index} in the batch has shape {found:?}, but expect {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("cannot collate an empty batch")]
    EmptyBatch,
}

/// The cause of an [Error::Load].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<LoadError>) -> Self {
        Self::Load {
            path: path.into(),
            source: source.into(),
        }
    }
}
