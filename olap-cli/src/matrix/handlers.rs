use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use olap_matrix::consts::{DEFAULT_BEDTOOLS, DEFAULT_THREADS, DEFAULT_WINDOW_SIZE};
use olap_matrix::{BedtoolsIntersector, MatrixBuilder, OverlapConfig};

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug, PartialEq)]
pub struct MatrixSettings {
    pub bedtools: PathBuf,
    pub threads: usize,
    pub window_size: u32,
    pub nucleotides: bool,
    pub progress: bool,
}

///
/// Flags win over the config file, the config file wins over defaults.
///
pub fn resolve_settings(matches: &ArgMatches) -> Result<MatrixSettings> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => OverlapConfig::try_from(path)?,
        None => OverlapConfig::default(),
    };

    let bedtools = matches
        .get_one::<PathBuf>("bedtools")
        .cloned()
        .or(config.bedtools)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BEDTOOLS));

    let threads = matches
        .get_one::<usize>("threads")
        .copied()
        .or(config.threads)
        .unwrap_or(DEFAULT_THREADS);

    let window_size = matches
        .get_one::<u32>("window-size")
        .copied()
        .or(config.window_size)
        .unwrap_or(DEFAULT_WINDOW_SIZE);

    Ok(MatrixSettings {
        bedtools,
        threads,
        window_size,
        nucleotides: matches.get_flag("nucleotides"),
        progress: !matches.get_flag("no-progress"),
    })
}

pub fn run_matrix(matches: &ArgMatches) -> Result<()> {
    let settings = resolve_settings(matches)?;

    let files: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("beds")
        .context("--beds is required")?
        .collect();

    let intersector = BedtoolsIntersector::new(&settings.bedtools);
    let version = intersector.version().with_context(|| {
        format!(
            "Can't run '{}'. Is bedtools installed? Use --bedtools to point to it.",
            intersector.program().display()
        )
    })?;
    info!("Using {}", version);

    let builder = MatrixBuilder::new(&intersector)
        .threads(settings.threads)
        .progress(settings.progress);

    info!(
        "Computing {} overlap matrix of {} files on {} threads",
        if settings.nucleotides { "nucleotide" } else { "region" },
        files.len(),
        settings.threads
    );

    let matrix = match settings.nucleotides {
        true => builder.nucleotides(&files, settings.window_size)?,
        false => builder.regions(&files)?,
    };

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            matrix
                .write_to_file(path)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Output written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            matrix.write_tsv(&mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::matrix::cli::create_matrix_cli;

    fn parse(args: &[&str]) -> ArgMatches {
        create_matrix_cli()
            .try_get_matches_from(std::iter::once("matrix").chain(args.iter().copied()))
            .unwrap()
    }

    #[rstest]
    fn test_defaults() {
        let settings = resolve_settings(&parse(&["--beds", "a.bed", "b.bed"])).unwrap();
        assert_eq!(
            settings,
            MatrixSettings {
                bedtools: PathBuf::from("bedtools"),
                threads: 1,
                window_size: 200,
                nucleotides: false,
                progress: true,
            }
        );
    }

    #[rstest]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("olap.toml");
        std::fs::write(
            &config,
            "bedtools = \"/opt/bedtools\"\nthreads = 8\nwindow_size = 50\n",
        )
        .unwrap();

        let settings = resolve_settings(&parse(&[
            "--beds",
            "a.bed",
            "--config",
            config.to_str().unwrap(),
            "--threads",
            "2",
            "--nucleotides",
            "--no-progress",
        ]))
        .unwrap();

        assert_eq!(
            settings,
            MatrixSettings {
                bedtools: PathBuf::from("/opt/bedtools"),
                threads: 2,
                window_size: 50,
                nucleotides: true,
                progress: false,
            }
        );
    }

    #[rstest]
    fn test_negative_window_size_is_rejected_by_parser() {
        let result = create_matrix_cli().try_get_matches_from([
            "matrix",
            "--beds",
            "a.bed",
            "--window-size",
            "-5",
        ]);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_missing_tool_is_reported_before_any_work() {
        let error = run_matrix(&parse(&[
            "--beds",
            "no/such/a.bed",
            "--bedtools",
            "/definitely/not/bedtools",
            "--no-progress",
        ]))
        .unwrap_err();

        assert!(
            error.to_string().contains("/definitely/not/bedtools"),
            "{}",
            error
        );
    }

    #[rstest]
    fn test_bad_config_is_an_error() {
        let settings = resolve_settings(&parse(&[
            "--beds",
            "a.bed",
            "--config",
            "no/such/olap.toml",
        ]));
        assert!(settings.is_err());
    }
}
