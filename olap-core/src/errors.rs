use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionSetError {
    #[error("Can't read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing region at {path}:{line}: {message}")]
    RegionParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Can't derive an interval set identifier from path: {0}")]
    InvalidPath(String),
}
