use std::path::PathBuf;

use olap_core::errors::RegionSetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlapError {
    #[error("Window size must be a positive integer, got {0}")]
    InvalidWindowSize(u32),

    #[error("No interval set files given, nothing to compute")]
    EmptyInput,

    #[error(
        "Interval set identifier '{name}' is shared by {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateIdentifier {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Intersection tool failed for '{file}' ({}): {diagnostic}", describe_status(.status))]
    ExternalTool {
        file: String,
        status: Option<i32>,
        diagnostic: String,
    },

    #[error("Can't read config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Can't start the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    RegionSet(#[from] RegionSetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "no exit status".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, OverlapError>;
