use std::collections::BTreeMap;

use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::intersect::{LocationKey, OverlapTuple};
use crate::matrix::OverlapMatrixRow;

///
/// Histogram of overlap multiplicities: for every number of distinct sources
/// seen at a location, how many locations have it. Duplicate
/// (location, source) pairs count once.
///
pub fn overlap_histogram<T>(tuples: T) -> BTreeMap<u32, u64>
where
    T: IntoIterator<Item = OverlapTuple>,
{
    let mut sources_by_location: HashMap<LocationKey, HashSet<usize>> = HashMap::default();
    for tuple in tuples {
        sources_by_location
            .entry(tuple.location)
            .or_default()
            .insert(tuple.source);
    }

    let mut histogram: BTreeMap<u32, u64> = BTreeMap::new();
    for sources in sources_by_location.values() {
        *histogram.entry(sources.len() as u32).or_insert(0) += 1;
    }

    histogram
}

///
/// Matrix fragment for one main file at nucleotide resolution. Each window
/// stands for `window_size` bases.
///
pub fn nucleotide_overlap<T>(main: &str, tuples: T, window_size: u32) -> Vec<OverlapMatrixRow>
where
    T: IntoIterator<Item = OverlapTuple>,
{
    overlap_histogram(tuples)
        .into_iter()
        .map(|(other, windows)| OverlapMatrixRow {
            main: main.to_string(),
            other,
            overlaps: windows * window_size as u64,
        })
        .collect()
}

///
/// Matrix fragment for one main file at region resolution.
///
pub fn region_overlap<T>(main: &str, tuples: T) -> Vec<OverlapMatrixRow>
where
    T: IntoIterator<Item = OverlapTuple>,
{
    overlap_histogram(tuples)
        .into_iter()
        .map(|(other, regions)| OverlapMatrixRow {
            main: main.to_string(),
            other,
            overlaps: regions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn tuple(chr: &str, start: u32, end: u32, source: usize) -> OverlapTuple {
        OverlapTuple {
            location: LocationKey {
                chr: chr.to_string(),
                start,
                end,
            },
            source,
        }
    }

    fn row(main: &str, other: u32, overlaps: u64) -> OverlapMatrixRow {
        OverlapMatrixRow {
            main: main.to_string(),
            other,
            overlaps,
        }
    }

    #[fixture]
    fn tuples() -> Vec<OverlapTuple> {
        vec![
            // overlaps itself and source 1 twice: counts as 2
            tuple("chr1", 0, 100, 0),
            tuple("chr1", 0, 100, 1),
            tuple("chr1", 0, 100, 1),
            // only itself
            tuple("chr1", 100, 200, 0),
            // three sources
            tuple("chr2", 0, 100, 2),
            tuple("chr2", 0, 100, 0),
            tuple("chr2", 0, 100, 1),
            // only itself, other chromosome, same coordinates
            tuple("chr3", 100, 200, 0),
        ]
    }

    #[rstest]
    fn test_histogram_deduplicates(tuples: Vec<OverlapTuple>) {
        let histogram = overlap_histogram(tuples);
        assert_eq!(
            histogram.into_iter().collect::<Vec<_>>(),
            vec![(1, 2), (2, 1), (3, 1)]
        );
    }

    #[rstest]
    fn test_region_overlap(tuples: Vec<OverlapTuple>) {
        assert_eq!(
            region_overlap("a", tuples),
            vec![row("a", 1, 2), row("a", 2, 1), row("a", 3, 1)]
        );
    }

    #[rstest]
    fn test_nucleotide_overlap_scales_by_window(tuples: Vec<OverlapTuple>) {
        let rows = nucleotide_overlap("a", tuples, 100);
        assert_eq!(rows, vec![row("a", 1, 200), row("a", 2, 100), row("a", 3, 100)]);
        assert!(rows.iter().all(|r| r.overlaps % 100 == 0));
    }

    #[rstest]
    fn test_rows_are_sorted_by_other() {
        let mut tuples = Vec::new();
        for i in 0..20u32 {
            for source in 0..=(i % 5) as usize {
                tuples.push(tuple("chr1", i * 10, i * 10 + 10, source));
            }
        }
        tuples.reverse();

        let rows = region_overlap("a", tuples);
        let others: Vec<u32> = rows.iter().map(|r| r.other).collect();
        assert_eq!(others, vec![1, 2, 3, 4, 5]);
        assert_eq!(rows.iter().map(|r| r.overlaps).sum::<u64>(), 20);
    }

    #[rstest]
    fn test_no_tuples_no_rows() {
        assert!(region_overlap("a", Vec::new()).is_empty());
        assert!(nucleotide_overlap("a", Vec::new(), 50).is_empty());
    }
}
