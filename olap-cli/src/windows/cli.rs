use std::path::PathBuf;

use clap::{Arg, Command, value_parser};

pub const WINDOWS_CMD: &str = "windows";

pub fn create_windows_cli() -> Command {
    Command::new(WINDOWS_CMD)
        .about("Split every interval of a file into fixed-size windows and write them as BED3.")
        .arg(
            Arg::new("bed")
                .long("bed")
                .short('b')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Interval set file to tile"),
        )
        .arg(
            Arg::new("window-size")
                .long("window-size")
                .short('w')
                .required(true)
                .value_parser(value_parser!(u32))
                .help("Window size in bases"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .help("Output file (default: stdout)"),
        )
}
