pub const DEFAULT_BEDTOOLS: &str = "bedtools";
pub const DEFAULT_THREADS: usize = 1;
pub const DEFAULT_WINDOW_SIZE: u32 = 200;

pub const MATRIX_HEADER: [&str; 3] = ["Main", "Other", "Overlaps"];
