//! Errors raised while loading meshes and images.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Vertex attribute array a face corner points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Normal,
    Uv,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Normal => "normal",
            Attribute::Uv => "uv",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    /// Malformed OBJ line. `line` is 1-based.
    #[error("Malformed OBJ line {line}: {message}")]
    Format { line: usize, message: String },

    /// A face corner references an attribute that does not exist.
    #[error("Face {face} references {attribute} index {index}, but only {len} are declared")]
    Index {
        attribute: Attribute,
        index: usize,
        len: usize,
        face: usize,
    },

    #[error("Resource not found: {}", path.display())]
    MissingResource { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture handle ids exhausted")]
    HandlesExhausted,
}

impl AssetError {
    pub(crate) fn format(line_no: usize, message: impl Into<String>) -> Self {
        AssetError::Format {
            line: line_no + 1,
            message: message.into(),
        }
    }

    /// I/O failure on `path`; a missing file is a [`AssetError::MissingResource`].
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            AssetError::MissingResource {
                path: path.to_path_buf(),
            }
        } else {
            AssetError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
