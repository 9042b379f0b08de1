//! Input artifacts: descriptor files (one command or identifier per record)
//! and plain identifier lists.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{FetchConfig, InputKind};
use crate::descriptor::{self, ParseError, RequestDescriptor};

/// First field of one input record, numbered by its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub sequence_number: u64,
    pub raw: String,
}

/// A record that could not be turned into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub sequence_number: u64,
    pub raw: String,
    pub error: ParseError,
}

/// Records of one input file plus its data line count, blank lines included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFile {
    pub lines_read: usize,
    pub records: Vec<InputRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedInput {
    pub lines_read: usize,
    pub descriptors: Vec<RequestDescriptor>,
    pub rejected: Vec<RejectedLine>,
}

/// Read the first field of every record in `path`.
///
/// Sequence numbers are 1-based over data lines (the header line, if any, is
/// line 0), so blank lines consume a number even though they yield no record.
pub fn read_records(path: &Path, has_header: bool) -> Result<InputFile> {
    let data = fs::read(path).with_context(|| format!("open input file: {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(data.as_slice());

    let offset = u64::from(has_header);
    let mut records = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("read input file: {}", path.display()))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1 + offset);
        let raw = record
            .get(0)
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .unwrap_or_default();
        records.push(InputRecord {
            sequence_number: line.saturating_sub(offset).max(1),
            raw,
        });
    }
    let lines_read = count_lines(&data).saturating_sub(usize::from(has_header));
    Ok(InputFile {
        lines_read,
        records,
    })
}

/// Physical lines in `data`; a final line without a newline still counts.
fn count_lines(data: &[u8]) -> usize {
    let newlines = data.iter().filter(|&&b| b == b'\n').count();
    match data.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

/// Turn records into descriptors according to `cfg.input_kind`.
/// Rejected lines are logged and collected; they never abort the run.
pub fn parse_records(input: InputFile, cfg: &FetchConfig) -> ParsedInput {
    let mut parsed = ParsedInput {
        lines_read: input.lines_read,
        ..ParsedInput::default()
    };
    let mode = cfg.parse_mode();
    for record in input.records {
        let result = match cfg.input_kind {
            InputKind::Command => descriptor::parse(record.sequence_number, &record.raw, mode),
            InputKind::Identifier => descriptor::from_identifier(
                record.sequence_number,
                &cfg.base_url,
                &record.raw,
                cfg.cookie.as_deref(),
                mode,
            ),
        };
        match result {
            Ok(Some(d)) => parsed.descriptors.push(d),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    "line {}: invalid descriptor ({}) -> {}",
                    record.sequence_number,
                    error,
                    record.raw.trim()
                );
                parsed.rejected.push(RejectedLine {
                    sequence_number: record.sequence_number,
                    raw: record.raw,
                    error,
                });
            }
        }
    }
    parsed
}

/// Read identifiers (one per line, trimmed, blanks dropped) from each file in order.
pub fn read_identifiers(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read identifiers: {}", path.display()))?;
        ids.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }
    Ok(ids)
}

/// Drop repeated identifiers, keeping the first occurrence of each.
pub fn dedup_identifiers(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
