use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::RegionSetError;
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// RegionSet struct, the representation of the interval region set file,
/// such as bed file.
///
#[derive(Clone, Debug)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed file, gzipped or not.
    ///
    /// Only the first three columns are interpreted; anything after them is
    /// kept verbatim in [Region::rest]. An empty file yields an empty set.
    ///
    /// This is stricter than `bedtools`: columns must be tab-separated and
    /// start/end must fit in `u32`. Lines starting with `browser`, `track`
    /// or `#` are header lines, and so is a first line whose second column
    /// is not a number (e.g. `chrom start end`); bedtools only skips the
    /// prefixed kinds. A file that bedtools accepts as a candidate can still
    /// be rejected here as a main set with [RegionSetError::RegionParse].
    ///
    /// # Arguments:
    /// - value: path to bed file on disk.
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let path = value;
        let reader = get_dynamic_reader(path)?;

        let mut new_regions: Vec<Region> = Vec::new();
        let mut header: String = String::new();
        let mut first_line: bool = true;

        for (line_number, line) in reader.lines().enumerate() {
            let string_line = line.map_err(|source| RegionSetError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

            if string_line.trim().is_empty() {
                continue;
            }

            if string_line.starts_with("browser")
                | string_line.starts_with("track")
                | string_line.starts_with('#')
            {
                header.push_str(&string_line);
                first_line = false;
                continue;
            }

            let parts: Vec<&str> = string_line.split('\t').collect();

            // Handling column headers like `chr start end etc` without #
            if first_line {
                first_line = false;
                if parts.len() >= 3 && parts[1].parse::<u32>().is_err() {
                    header.push_str(&string_line);
                    continue;
                }
            }

            let parse_error = |message: String| RegionSetError::RegionParse {
                path: path.to_path_buf(),
                line: line_number + 1,
                message,
            };

            if parts.len() < 3 {
                return Err(parse_error(format!(
                    "expected at least 3 tab-separated columns, found {}",
                    parts.len()
                )));
            }

            let start = parts[1]
                .parse::<u32>()
                .map_err(|_| parse_error(format!("invalid start position: {:?}", parts[1])))?;
            let end = parts[2]
                .parse::<u32>()
                .map_err(|_| parse_error(format!("invalid end position: {:?}", parts[2])))?;

            new_regions.push(Region {
                chr: parts[0].to_owned(),
                start,
                end,
                rest: Some(parts[3..].join("\t")).filter(|s| !s.is_empty()),
            });
        }

        Ok(RegionSet {
            regions: new_regions,
            header: match header.is_empty() {
                true => None,
                false => Some(header),
            },
            path: Some(value.to_owned()),
        })
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RegionSet::try_from(Path::new(value))
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet {
            regions,
            header: None,
            path: None,
        }
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl RegionSet {
    ///
    /// Is regionSet empty?
    ///
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    ///
    /// Get number of regions in RegionSet
    ///
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    ///
    /// Get total nucleotide count
    ///
    pub fn nucleotides_length(&self) -> u64 {
        self.regions.iter().map(|r| r.width() as u64).sum()
    }
}
