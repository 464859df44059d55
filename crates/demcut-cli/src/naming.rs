//! Tick ranges and output names derived from demo file names.
//!
//! Recorders commonly save highlights as `<name>_<start>-<end>.dem`; such a
//! name is enough to cut without typing the ticks.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// A tick range read from a file name, with the name to write the cut to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRange {
    pub start: u32,
    pub end: u32,
    pub output: String,
}

#[derive(Debug, Error)]
pub enum NameError {
    #[error("input path {} has no file name", .0.display())]
    NoFileName(PathBuf),
    #[error("no start tick given and none found in file name {0:?}")]
    NoRange(String),
}

fn range_suffix() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(?P<base>.+)_(?P<start>\d+)[-_](?P<end>\d+)$").ok())
        .as_ref()
}

/// Read a `_<start>-<end>` or `_<start>_<end>` suffix off the file stem.
pub fn infer_range(file_name: &str) -> Option<NamedRange> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let caps = range_suffix()?.captures(stem)?;
    let start: u32 = caps["start"].parse().ok()?;
    let end: u32 = caps["end"].parse().ok()?;
    if start > end {
        return None;
    }
    Some(NamedRange {
        start,
        end,
        output: format!("{}_cut_{start}-{end}.dem", &caps["base"]),
    })
}

/// `<stem>_cut.dem` next to `input`.
pub fn default_output(input: &Path) -> Result<PathBuf, NameError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| NameError::NoFileName(input.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push("_cut.dem");
    Ok(input.with_file_name(name))
}

/// Settle the range and output path for a cut.
///
/// Explicit ticks win; without a start tick the range comes from the file
/// name. A missing end tick means the end of the recording.
pub fn resolve(
    input: &Path,
    start: Option<i64>,
    end: Option<i64>,
    output: Option<PathBuf>,
) -> Result<(i64, i64, PathBuf), NameError> {
    if let Some(start) = start {
        let end = end.unwrap_or(i64::from(u32::MAX));
        let output = match output {
            Some(path) => path,
            None => default_output(input)?,
        };
        return Ok((start, end, output));
    }

    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NameError::NoFileName(input.to_path_buf()))?;
    let named =
        infer_range(file_name).ok_or_else(|| NameError::NoRange(file_name.to_string()))?;
    let output = output.unwrap_or_else(|| input.with_file_name(&named.output));
    Ok((i64::from(named.start), i64::from(named.end), output))
}
