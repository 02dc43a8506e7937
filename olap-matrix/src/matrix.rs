use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::consts::MATRIX_HEADER;

///
/// One line of an overlap matrix: `overlaps` locations of `main` are
/// covered by exactly `other` of the input sets (`main` itself included).
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlapMatrixRow {
    pub main: String,
    pub other: u32,
    pub overlaps: u64,
}

///
/// Rows of every main file, grouped by main file in input order.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlapMatrix {
    pub rows: Vec<OverlapMatrixRow>,
}

impl From<Vec<Vec<OverlapMatrixRow>>> for OverlapMatrix {
    /// Concatenate per-file fragments, keeping their order.
    fn from(fragments: Vec<Vec<OverlapMatrixRow>>) -> Self {
        OverlapMatrix {
            rows: fragments.into_iter().flatten().collect(),
        }
    }
}

impl OverlapMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    ///
    /// Rows belonging to one main file.
    ///
    pub fn fragment<'a>(&'a self, main: &'a str) -> impl Iterator<Item = &'a OverlapMatrixRow> {
        self.rows.iter().filter(move |r| r.main == main)
    }

    ///
    /// Write the matrix as a tab-separated table with a `Main Other Overlaps`
    /// header.
    ///
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", MATRIX_HEADER.join("\t"))?;
        for row in &self.rows {
            writeln!(writer, "{}\t{}\t{}", row.main, row.other, row.overlaps)?;
        }
        Ok(())
    }

    ///
    /// Save the matrix to disk; gzip-compressed when the path ends in `.gz`.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let is_gzipped = path.extension().is_some_and(|ext| ext == "gz");

        if is_gzipped {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            self.write_tsv(&mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = BufWriter::new(file);
            self.write_tsv(&mut writer)?;
            writer.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    use flate2::read::GzDecoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn row(main: &str, other: u32, overlaps: u64) -> OverlapMatrixRow {
        OverlapMatrixRow {
            main: main.to_string(),
            other,
            overlaps,
        }
    }

    #[fixture]
    fn matrix() -> OverlapMatrix {
        OverlapMatrix::from(vec![
            vec![row("b", 1, 10), row("b", 2, 4)],
            vec![],
            vec![row("a", 2, 3)],
        ])
    }

    #[rstest]
    fn test_concatenation_keeps_fragment_order(matrix: OverlapMatrix) {
        let mains: Vec<&str> = matrix.rows.iter().map(|r| r.main.as_str()).collect();
        assert_eq!(mains, vec!["b", "b", "a"]);
        assert_eq!(matrix.fragment("b").count(), 2);
        assert_eq!(matrix.fragment("c").count(), 0);
    }

    #[rstest]
    fn test_write_tsv(matrix: OverlapMatrix) {
        let mut out = Vec::new();
        matrix.write_tsv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Main\tOther\tOverlaps\nb\t1\t10\nb\t2\t4\na\t2\t3\n"
        );
    }

    #[rstest]
    fn test_write_gz(matrix: OverlapMatrix) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/matrix.tsv.gz");
        matrix.write_to_file(&path).unwrap();

        let mut text = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert!(text.starts_with("Main\tOther\tOverlaps\n"));
        assert_eq!(text.lines().count(), 4);
    }

    #[rstest]
    fn test_write_plain(matrix: OverlapMatrix) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.tsv");
        matrix.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().last(), Some("a\t2\t3"));
    }
}
