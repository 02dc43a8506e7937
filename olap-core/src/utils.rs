use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::RegionSetError;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, RegionSetError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|source| RegionSetError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Identifier of an interval set file: its base name with the final
/// extension stripped, e.g. `data/0h_H3K4me3.regions` -> `0h_H3K4me3`.
///
pub fn file_identifier(path: &Path) -> Result<String, RegionSetError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RegionSetError::InvalidPath(path.display().to_string()))
}
