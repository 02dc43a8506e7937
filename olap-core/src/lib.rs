//! Core models shared by the olap crates.
//!
//! - [`models::Region`] and [`models::RegionSet`]: BED-like intervals read from
//!   plain or gzipped files.
//! - [`models::IntervalSet`]: a file path together with the identifier used
//!   for it in overlap matrices.

pub mod errors;
pub mod models;
pub mod utils;
