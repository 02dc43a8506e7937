//! Fixed-size tiling of a region set, the same layout `bedtools makewindows -w`
//! produces: windows start at each interval's start, and the last window of an
//! interval is cut short at the interval's end.

use std::slice::Iter;

use olap_core::models::{Region, RegionSet};

use crate::errors::{OverlapError, Result};

/// Lazy iterator over the windows of a [RegionSet], see [make_windows].
pub struct Windows<'a> {
    regions: Iter<'a, Region>,
    current: Option<&'a Region>,
    next_start: u32,
    window_size: u32,
}

///
/// Tile every region of `region_set` with windows of `window_size` bases.
///
/// # Arguments
/// - region_set: the intervals to tile, in the order they are tiled
/// - window_size: window length, must be positive
///
pub fn make_windows(region_set: &RegionSet, window_size: u32) -> Result<Windows<'_>> {
    if window_size == 0 {
        return Err(OverlapError::InvalidWindowSize(window_size));
    }

    Ok(Windows {
        regions: region_set.into_iter(),
        current: None,
        next_start: 0,
        window_size,
    })
}

impl Iterator for Windows<'_> {
    type Item = Region;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(region) = self.current {
                if self.next_start < region.end {
                    let start = self.next_start;
                    let end = start.saturating_add(self.window_size).min(region.end);
                    self.next_start = end;
                    return Some(Region {
                        chr: region.chr.clone(),
                        start,
                        end,
                        rest: None,
                    });
                }
            }

            let region = self.regions.next()?;
            self.current = Some(region);
            self.next_start = region.start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_regionset(regions: Vec<(&str, u32, u32)>) -> RegionSet {
        let regions: Vec<Region> = regions
            .into_iter()
            .map(|(chr, start, end)| Region {
                chr: chr.to_string(),
                start,
                end,
                rest: None,
            })
            .collect();
        RegionSet::from(regions)
    }

    fn coords(windows: Windows<'_>) -> Vec<(String, u32, u32)> {
        windows.map(|w| (w.chr, w.start, w.end)).collect()
    }

    #[rstest]
    fn test_exact_tiling() {
        let set = make_regionset(vec![("chr1", 100, 400)]);
        let windows = coords(make_windows(&set, 100).unwrap());

        assert_eq!(
            windows,
            vec![
                ("chr1".to_string(), 100, 200),
                ("chr1".to_string(), 200, 300),
                ("chr1".to_string(), 300, 400),
            ]
        );
    }

    #[rstest]
    fn test_partial_last_window_is_kept() {
        let set = make_regionset(vec![("chr1", 0, 250), ("chr2", 10, 40)]);
        let windows = coords(make_windows(&set, 100).unwrap());

        assert_eq!(
            windows,
            vec![
                ("chr1".to_string(), 0, 100),
                ("chr1".to_string(), 100, 200),
                ("chr1".to_string(), 200, 250),
                ("chr2".to_string(), 10, 40),
            ]
        );
    }

    #[rstest]
    fn test_windows_tile_without_gaps() {
        let set = make_regionset(vec![("chr1", 7, 1003), ("chr1", 2000, 2001)]);
        let windows: Vec<Region> = make_windows(&set, 33).unwrap().collect();

        let covered: u64 = windows.iter().map(|w| w.width() as u64).sum();
        assert_eq!(covered, set.nucleotides_length());
        assert!(windows.iter().all(|w| w.width() >= 1 && w.width() <= 33));
        for pair in windows.windows(2) {
            if pair[0].end != pair[1].start {
                assert_eq!(pair[1].start, 2000);
            }
        }
    }

    #[rstest]
    fn test_zero_length_region_has_no_windows() {
        let set = make_regionset(vec![("chr1", 50, 50), ("chr1", 60, 70)]);
        let windows = coords(make_windows(&set, 5).unwrap());

        assert_eq!(
            windows,
            vec![("chr1".to_string(), 60, 65), ("chr1".to_string(), 65, 70)]
        );
    }

    #[rstest]
    fn test_near_coordinate_limit() {
        let set = make_regionset(vec![("chr1", u32::MAX - 10, u32::MAX)]);
        let windows = coords(make_windows(&set, 8).unwrap());

        assert_eq!(
            windows,
            vec![
                ("chr1".to_string(), u32::MAX - 10, u32::MAX - 2),
                ("chr1".to_string(), u32::MAX - 2, u32::MAX),
            ]
        );
    }

    #[rstest]
    fn test_zero_window_size() {
        let set = make_regionset(vec![("chr1", 0, 10)]);
        assert!(matches!(
            make_windows(&set, 0),
            Err(OverlapError::InvalidWindowSize(0))
        ));
    }

    #[rstest]
    fn test_empty_set() {
        let set = make_regionset(vec![]);
        assert_eq!(make_windows(&set, 10).unwrap().count(), 0);
    }
}
