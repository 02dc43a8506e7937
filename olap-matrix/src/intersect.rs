//! Calling the interval-intersection primitive.
//!
//! [BedtoolsIntersector] runs
//! `bedtools intersect -wo -filenames -a stdin -b <candidates...>`. The query
//! intervals are streamed to the tool as three-column BED, so the layout of
//! every output line is fixed:
//!
//! ```text
//! chr  start  end  [candidate path]  <candidate columns...>  overlap
//! ```
//!
//! The candidate path column is only printed when more than one `-b` file is
//! given.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

use fxhash::FxHashMap as HashMap;
use log::{debug, warn};

use olap_core::models::{IntervalSet, Region};

use crate::consts::DEFAULT_BEDTOOLS;
use crate::errors::{OverlapError, Result};

/// A base window or a main-set region.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

/// One hit reported by the primitive: `location` (from the query) overlaps an
/// interval of the candidate at index `source`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlapTuple {
    pub location: LocationKey,
    pub source: usize,
}

///
/// Something that can tell, for every query interval, which candidate sets
/// have an interval overlapping it.
///
pub trait Intersector: Sync {
    ///
    /// Intersect `query` with every set in `candidates`.
    ///
    /// Returns one tuple per (query interval, overlapping candidate interval)
    /// pair, in no particular order. The same location may appear several
    /// times for one candidate.
    ///
    /// # Arguments
    /// - main: the set the query was derived from, used to label errors
    /// - query: intervals to look up
    /// - candidates: the sets to look them up in
    fn intersect<I>(
        &self,
        main: &IntervalSet,
        query: I,
        candidates: &[IntervalSet],
    ) -> Result<Vec<OverlapTuple>>
    where
        I: Iterator<Item = Region> + Send;
}

#[derive(Clone, Debug)]
pub struct BedtoolsIntersector {
    program: PathBuf,
}

impl Default for BedtoolsIntersector {
    fn default() -> Self {
        BedtoolsIntersector::new(DEFAULT_BEDTOOLS)
    }
}

impl BedtoolsIntersector {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        BedtoolsIntersector {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    ///
    /// Ask the tool for its version, e.g. `bedtools v2.31.1`.
    ///
    pub fn version(&self) -> io::Result<String> {
        let output = Command::new(&self.program).arg("--version").output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn command(&self, candidates: &[IntervalSet]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["intersect", "-wo", "-filenames", "-a", "stdin", "-b"])
            .args(candidates.iter().map(|c| c.path.as_os_str()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl Intersector for BedtoolsIntersector {
    fn intersect<I>(
        &self,
        main: &IntervalSet,
        query: I,
        candidates: &[IntervalSet],
    ) -> Result<Vec<OverlapTuple>>
    where
        I: Iterator<Item = Region> + Send,
    {
        let tool_error = |status: Option<i32>, diagnostic: String| OverlapError::ExternalTool {
            file: main.name.clone(),
            status,
            diagnostic,
        };

        let mut command = self.command(candidates);
        debug!("Running {:?}", command);

        let child = command.spawn().map_err(|e| {
            tool_error(
                None,
                format!("failed to launch {}: {}", self.program.display(), e),
            )
        })?;
        let mut process = ScopedChild::new(child);

        let (Some(stdin), Some(stdout), Some(stderr)) = (
            process.child.stdin.take(),
            process.child.stdout.take(),
            process.child.stderr.take(),
        ) else {
            return Err(tool_error(
                None,
                "standard streams of the tool were not captured".to_string(),
            ));
        };

        let parser = HitParser::new(candidates);

        // stdin and stderr get their own threads so that a full pipe on one
        // side can never stall the other.
        let (parsed, written, diagnostics) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_query(stdin, query));
            let errors = scope.spawn(move || read_diagnostics(stderr));

            let parsed = parser.parse(BufReader::new(stdout));

            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("query writer panicked")));
            let diagnostics = errors.join().unwrap_or_default();
            (parsed, written, diagnostics)
        });

        let status = process.wait().map_err(|e| {
            tool_error(
                None,
                format!("failed to wait for {}: {}", self.program.display(), e),
            )
        })?;

        if !status.success() {
            let diagnostic = match diagnostics.trim() {
                "" => format!("{} exited with {}", self.program.display(), status),
                text => text.to_string(),
            };
            return Err(tool_error(status.code(), diagnostic));
        }

        let tuples = parsed.map_err(|message| tool_error(status.code(), message))?;
        let n_query = written.map_err(|e| {
            tool_error(
                status.code(),
                format!("failed to stream query intervals: {}", e),
            )
        })?;

        if !diagnostics.trim().is_empty() {
            warn!("{}: {}", main.name, diagnostics.trim());
        }
        debug!(
            "{}: {} query intervals, {} overlap tuples",
            main.name,
            n_query,
            tuples.len()
        );

        Ok(tuples)
    }
}

///
/// Owns a running tool process. Dropping it without a successful
/// [ScopedChild::wait] kills and reaps the process.
///
struct ScopedChild {
    child: Child,
    reaped: bool,
}

impl ScopedChild {
    fn new(child: Child) -> Self {
        ScopedChild {
            child,
            reaped: false,
        }
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ScopedChild {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Returns the number of intervals written. A tool that stops reading early
/// is not an error here; its exit status tells what went wrong.
fn write_query<I>(stdin: ChildStdin, query: I) -> io::Result<u64>
where
    I: Iterator<Item = Region>,
{
    let mut writer = BufWriter::new(stdin);
    let mut written: u64 = 0;

    match stream_regions(&mut writer, query, &mut written) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(written),
        Err(e) => Err(e),
        Ok(()) => Ok(written),
    }
}

fn stream_regions<W, I>(writer: &mut W, query: I, written: &mut u64) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = Region>,
{
    for region in query {
        writeln!(writer, "{}", region.as_bed3())?;
        *written += 1;
    }
    writer.flush()
}

fn read_diagnostics<R: Read>(mut stderr: R) -> String {
    let mut buffer = Vec::new();
    let _ = stderr.read_to_end(&mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

///
/// Turns `bedtools intersect -wo -filenames` output lines into tuples.
///
pub(crate) struct HitParser {
    sources: HashMap<String, usize>,
    n_candidates: usize,
}

impl HitParser {
    pub(crate) fn new(candidates: &[IntervalSet]) -> Self {
        let sources = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.path.to_string_lossy().into_owned(), i))
            .collect();

        HitParser {
            sources,
            n_candidates: candidates.len(),
        }
    }

    /// Reads `output` to the end, even after a bad line, and reports the
    /// first bad line if there was one.
    pub(crate) fn parse<R: BufRead>(
        &self,
        output: R,
    ) -> std::result::Result<Vec<OverlapTuple>, String> {
        let mut tuples = Vec::new();
        let mut first_error: Option<String> = None;

        for (line_number, line) in output.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Err(format!("failed to read tool output: {}", e)),
            };
            if first_error.is_some() || line.is_empty() {
                continue;
            }
            match self.parse_line(&line) {
                Ok(tuple) => tuples.push(tuple),
                Err(message) => {
                    first_error = Some(format!("output line {}: {}", line_number + 1, message))
                }
            }
        }

        match first_error {
            Some(message) => Err(message),
            None => Ok(tuples),
        }
    }

    pub(crate) fn parse_line(&self, line: &str) -> std::result::Result<OverlapTuple, String> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(format!(
                "expected at least 5 tab-separated columns, found {}: {:?}",
                fields.len(),
                line
            ));
        }

        let start = fields[1]
            .parse::<u32>()
            .map_err(|_| format!("non-numeric start {:?}", fields[1]))?;
        let end = fields[2]
            .parse::<u32>()
            .map_err(|_| format!("non-numeric end {:?}", fields[2]))?;

        let overlap = fields[fields.len() - 1];
        overlap
            .parse::<u64>()
            .map_err(|_| format!("non-numeric overlap length {:?}", overlap))?;

        let source = match self.sources.get(fields[3]) {
            Some(&index) => index,
            None if self.n_candidates == 1 => 0,
            None => return Err(format!("unknown source file {:?}", fields[3])),
        };

        Ok(OverlapTuple {
            location: LocationKey {
                chr: fields[0].to_string(),
                start,
                end,
            },
            source,
        })
    }
}
