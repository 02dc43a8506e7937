//! Pairwise overlap matrices for collections of genomic interval sets.
//!
//! For every file of a collection taken as the *main* set, count how many of
//! its locations are covered by one, two, ... of the files in the collection
//! (the main set included). Locations are either fixed-size windows of the
//! main set's intervals (nucleotide resolution) or the intervals themselves
//! (region resolution). The geometry is delegated to `bedtools intersect`.
//!
//! # Example
//!
//! ```no_run
//! use olap_matrix::{overlap_matrix_nucleotides, overlap_matrix_regions};
//!
//! let files = ["0h_H3K4me3.regions", "3h_H3K4me3.regions", "6h_H3K4me3.regions"];
//!
//! let regions = overlap_matrix_regions(&files, 4).unwrap();
//! let nucleotides = overlap_matrix_nucleotides(&files, 200, 4).unwrap();
//!
//! regions.write_tsv(&mut std::io::stdout()).unwrap();
//! ```

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod consts;
pub mod errors;
pub mod intersect;
pub mod matrix;
pub mod windows;

// re-exports
pub use builder::{MatrixBuilder, Resolution, overlap_matrix_nucleotides, overlap_matrix_regions};
pub use config::OverlapConfig;
pub use errors::OverlapError;
pub use intersect::{BedtoolsIntersector, Intersector, LocationKey, OverlapTuple};
pub use matrix::{OverlapMatrix, OverlapMatrixRow};
pub use windows::make_windows;
