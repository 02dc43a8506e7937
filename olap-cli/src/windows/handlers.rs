use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use olap_core::models::RegionSet;
use olap_matrix::make_windows;

/// Write the BED3 windows of `region_set` to `writer`, returning how many were written.
pub fn write_windows<W: Write>(region_set: &RegionSet, window_size: u32, writer: &mut W) -> Result<usize> {
    let mut count = 0;
    for window in make_windows(region_set, window_size)? {
        writeln!(writer, "{}", window.as_bed3())?;
        count += 1;
    }
    Ok(count)
}

pub fn run_windows(matches: &ArgMatches) -> Result<()> {
    let bed = matches
        .get_one::<PathBuf>("bed")
        .context("--bed is required")?;
    let window_size = *matches
        .get_one::<u32>("window-size")
        .context("--window-size is required")?;

    let region_set = RegionSet::try_from(bed.as_path())?;

    let count = match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let count = write_windows(&region_set, window_size, &mut out)?;
            out.flush()?;
            count
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let count = write_windows(&region_set, window_size, &mut out)?;
            out.flush()?;
            count
        }
    };

    info!("Wrote {} windows of {} bases from {}", count, window_size, bed.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn path_to_data() -> &'static str {
        "../tests/data/overlaps"
    }

    #[rstest]
    fn test_write_windows(path_to_data: &str) {
        let region_set = RegionSet::try_from(format!("{}/c.bed", path_to_data).as_str()).unwrap();

        let mut out = Vec::new();
        let count = write_windows(&region_set, 150, &mut out).unwrap();

        assert_eq!(count, 4);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr3\t100\t200\nchr3\t500\t650\nchr3\t650\t800\nchr3\t800\t900\n"
        );
    }

    #[rstest]
    fn test_write_windows_rejects_zero(path_to_data: &str) {
        let region_set = RegionSet::try_from(format!("{}/c.bed", path_to_data).as_str()).unwrap();
        let mut out = Vec::new();
        assert!(write_windows(&region_set, 0, &mut out).is_err());
        assert!(out.is_empty());
    }
}
