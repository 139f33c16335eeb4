mod stl;

pub use stl::{to_stl_ascii, to_stl_binary, write_combined_stl, write_tagged_stl};

use crate::errors::BuildError;

/// Errors raised while exporting geometry.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),
    /// Meshing the solid failed before anything was written.
    Mesh(BuildError),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StdIo(error) => write!(f, "std::io::Error: {error}"),
            Self::Mesh(error) => write!(f, "meshing failed: {error}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}

impl From<BuildError> for IoError {
    fn from(value: BuildError) -> Self {
        Self::Mesh(value)
    }
}
