use std::path::{Path, PathBuf};

use fxhash::FxHashMap as HashMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use olap_core::models::IntervalSet;

use crate::aggregate::{nucleotide_overlap, region_overlap};
use crate::consts::DEFAULT_THREADS;
use crate::errors::{OverlapError, Result};
use crate::intersect::{BedtoolsIntersector, Intersector};
use crate::matrix::{OverlapMatrix, OverlapMatrixRow};
use crate::windows::make_windows;

/// What a location is: a fixed-size window of a main-set interval, or a whole
/// main-set interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Nucleotide { window_size: u32 },
    Region,
}

///
/// Runs the per-file pipeline (load, window, intersect, aggregate) for every
/// file of a collection on a bounded worker pool, and assembles the
/// fragments into one [OverlapMatrix] in input order.
///
pub struct MatrixBuilder<'a, E: Intersector> {
    intersector: &'a E,
    threads: usize,
    progress: bool,
}

impl<'a, E: Intersector> MatrixBuilder<'a, E> {
    pub fn new(intersector: &'a E) -> Self {
        MatrixBuilder {
            intersector,
            threads: DEFAULT_THREADS,
            progress: false,
        }
    }

    /// Number of files processed at once, at least one.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Show a progress bar on stderr.
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn nucleotides<P: AsRef<Path>>(&self, files: &[P], window_size: u32) -> Result<OverlapMatrix> {
        self.build(files, Resolution::Nucleotide { window_size })
    }

    pub fn regions<P: AsRef<Path>>(&self, files: &[P]) -> Result<OverlapMatrix> {
        self.build(files, Resolution::Region)
    }

    ///
    /// Compute the overlap matrix of `files`. Every file is in turn the main
    /// set, and every file (itself included) is a candidate.
    ///
    /// All-or-nothing: the first failing file aborts the computation and no
    /// rows are returned.
    ///
    pub fn build<P: AsRef<Path>>(&self, files: &[P], resolution: Resolution) -> Result<OverlapMatrix> {
        if let Resolution::Nucleotide { window_size: 0 } = resolution {
            return Err(OverlapError::InvalidWindowSize(0));
        }
        if files.is_empty() {
            return Err(OverlapError::EmptyInput);
        }

        let sets = resolve_interval_sets(files)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()?;

        let bar = match self.progress {
            true => {
                let bar = ProgressBar::new(sets.len() as u64);
                bar.set_style(
                    ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            false => ProgressBar::hidden(),
        };

        // indexed collect: slot i holds the fragment of sets[i] whatever the
        // completion order
        let fragments = pool.install(|| {
            sets.par_iter()
                .map(|main| {
                    let fragment = self.fragment(main, &sets, resolution);
                    bar.inc(1);
                    fragment
                })
                .collect::<Result<Vec<_>>>()
        });

        bar.finish_and_clear();

        Ok(OverlapMatrix::from(fragments?))
    }

    fn fragment(
        &self,
        main: &IntervalSet,
        candidates: &[IntervalSet],
        resolution: Resolution,
    ) -> Result<Vec<OverlapMatrixRow>> {
        let region_set = main.load()?;

        // nothing to look up, so no locations and no rows
        if region_set.is_empty() {
            info!("Skipping {}: no regions", main);
            return Ok(Vec::new());
        }

        match resolution {
            Resolution::Nucleotide { window_size } => {
                info!("Processing {} at nucleotide level", main.name);
                let windows = make_windows(&region_set, window_size)?;
                let tuples = self.intersector.intersect(main, windows, candidates)?;
                Ok(nucleotide_overlap(&main.name, tuples, window_size))
            }
            Resolution::Region => {
                info!("Processing {}", main.name);
                let tuples = self
                    .intersector
                    .intersect(main, region_set.regions.into_iter(), candidates)?;
                Ok(region_overlap(&main.name, tuples))
            }
        }
    }
}

///
/// Derive the identifier of every file, rejecting collections where two
/// files would share one.
///
pub fn resolve_interval_sets<P: AsRef<Path>>(files: &[P]) -> Result<Vec<IntervalSet>> {
    let mut seen: HashMap<String, PathBuf> = HashMap::default();

    files
        .iter()
        .map(|file| {
            let set = IntervalSet::try_from(file.as_ref())?;
            if let Some(first) = seen.insert(set.name.clone(), set.path.clone()) {
                return Err(OverlapError::DuplicateIdentifier {
                    name: set.name,
                    first,
                    second: set.path,
                });
            }
            Ok(set)
        })
        .collect()
}

///
/// Nucleotide-resolution overlap matrix of `files`, using `bedtools` from
/// `PATH` on `nb_cpu` workers.
///
pub fn overlap_matrix_nucleotides<P: AsRef<Path>>(
    files: &[P],
    window_size: u32,
    nb_cpu: usize,
) -> Result<OverlapMatrix> {
    let intersector = BedtoolsIntersector::default();
    MatrixBuilder::new(&intersector)
        .threads(nb_cpu)
        .nucleotides(files, window_size)
}

///
/// Region-resolution overlap matrix of `files`, using `bedtools` from `PATH`
/// on `nb_cpu` workers.
///
pub fn overlap_matrix_regions<P: AsRef<Path>>(files: &[P], nb_cpu: usize) -> Result<OverlapMatrix> {
    let intersector = BedtoolsIntersector::default();
    MatrixBuilder::new(&intersector).threads(nb_cpu).regions(files)
}
