mod matrix;
mod windows;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "olap";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Overlap matrices for collections of genomic interval sets, such as peak calls from several timepoints.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log progress (-v) or debugging details (-vv) to stderr"),
        )
        .subcommand(matrix::cli::create_matrix_cli())
        .subcommand(windows::cli::create_windows_cli())
}

fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // OVERLAP MATRIX
        //
        Some((matrix::cli::MATRIX_CMD, matches)) => {
            matrix::handlers::run_matrix(matches)?;
        }

        //
        // WINDOWS
        //
        Some((windows::cli::WINDOWS_CMD, matches)) => {
            windows::handlers::run_windows(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["olap", "windows", "--bed", "x.bed", "-w", "10", "-vv"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
