use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use crate::errors::RegionSetError;
use crate::models::RegionSet;
use crate::utils::file_identifier;

///
/// An interval set file as it takes part in an overlap computation: where it
/// lives and the name it goes by in the output.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalSet {
    pub path: PathBuf,
    pub name: String,
}

impl IntervalSet {
    ///
    /// Read the regions of this set from disk.
    ///
    pub fn load(&self) -> Result<RegionSet, RegionSetError> {
        RegionSet::try_from(self.path.as_path())
    }
}

impl TryFrom<&Path> for IntervalSet {
    type Error = RegionSetError;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        Ok(IntervalSet {
            name: file_identifier(value)?,
            path: value.to_path_buf(),
        })
    }
}

impl TryFrom<PathBuf> for IntervalSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        Ok(IntervalSet {
            name: file_identifier(&value)?,
            path: value,
        })
    }
}

impl Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}
