use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub const MATRIX_CMD: &str = "matrix";

pub fn create_matrix_cli() -> Command {
    Command::new(MATRIX_CMD)
        .about("Compute the overlap matrix of a collection of interval set files. Outputs a Main/Other/Overlaps table.")
        .arg(
            Arg::new("beds")
                .long("beds")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf))
                .help("Interval set files (BED-like); each is compared against all of them"),
        )
        .arg(
            Arg::new("nucleotides")
                .long("nucleotides")
                .action(ArgAction::SetTrue)
                .help("Count overlapping bases (in windows) instead of overlapping regions"),
        )
        .arg(
            Arg::new("window-size")
                .long("window-size")
                .short('w')
                .value_parser(value_parser!(u32))
                .help("Window size for --nucleotides [default: 200]"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .value_parser(value_parser!(usize))
                .help("Number of files processed in parallel [default: 1]"),
        )
        .arg(
            Arg::new("bedtools")
                .long("bedtools")
                .value_parser(value_parser!(PathBuf))
                .help("bedtools executable [default: bedtools from PATH]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with default values for bedtools, threads and window_size"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .help("Output file, gzipped when it ends in .gz (default: stdout)"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(ArgAction::SetTrue)
                .help("Do not show a progress bar"),
        )
}
