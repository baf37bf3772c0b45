//! Streaming reader for normalized RepeatMasker tables.
//!
//! The input is the tab-separated output of `rmtrack normalize`: a header
//! row naming columns, then one row per annotated repeat with 0-based
//! half-open coordinates. Columns are located by name, so extra columns
//! and reordering are tolerated; the required ones must be present.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::info;

use crate::error::{Result, TrackError};
use crate::interval::{RepeatRecord, Strand};

/// Column indices resolved from the header row.
#[derive(Debug, Clone)]
struct Columns {
    chrom: usize,
    start: usize,
    end: usize,
    repeat_name: usize,
    repeat_class: usize,
    repeat_family: usize,
    strand: Option<usize>,
    score: Option<usize>,
    perc_div: Option<usize>,
    perc_del: Option<usize>,
    perc_ins: Option<usize>,
    strain: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split('\t').collect();
        let find = |name: &str| names.iter().position(|n| *n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| TrackError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            chrom: require("chrom")?,
            start: require("start")?,
            end: require("end")?,
            repeat_name: require("repeat_name")?,
            repeat_class: require("repeat_class")?,
            repeat_family: require("repeat_family")?,
            strand: find("strand"),
            score: find("score"),
            perc_div: find("perc_div"),
            perc_del: find("perc_del"),
            perc_ins: find("perc_ins"),
            strain: find("strain"),
        })
    }
}

/// A streaming reader over a normalized repeat table.
pub struct AnnotReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
    columns: Columns,
}

impl AnnotReader<File> {
    /// Open a normalized repeat table from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read> AnnotReader<R> {
    /// Create a reader from any readable source, consuming the header row.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Err(TrackError::InvalidFormat(
                "empty repeat table: missing header row".to_string(),
            ));
        }
        let columns = Columns::from_header(header.trim_end())?;

        Ok(Self {
            reader,
            line_number: 1,
            buffer: String::with_capacity(256),
            columns,
        })
    }

    /// Read the next record, skipping blank and comment lines.
    pub fn read_record(&mut self) -> Result<Option<RepeatRecord>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            return self.parse_line(line).map(Some);
        }
    }

    fn parse_line(&self, line: &str) -> Result<RepeatRecord> {
        let fields: Vec<&str> = line.split('\t').collect();
        let cols = &self.columns;

        let get = |idx: usize, name: &str| -> Result<&str> {
            fields.get(idx).copied().ok_or_else(|| TrackError::Parse {
                line: self.line_number,
                message: format!("Row too short: no '{}' field", name),
            })
        };

        let chrom = get(cols.chrom, "chrom")?.to_string();
        let start = self.parse_position(get(cols.start, "start")?, "start")?;
        let end = self.parse_position(get(cols.end, "end")?, "end")?;

        if start >= end {
            return Err(TrackError::Parse {
                line: self.line_number,
                message: format!("Start ({}) >= end ({})", start, end),
            });
        }

        let strand = match cols.strand {
            Some(idx) => {
                let s = get(idx, "strand")?;
                s.chars().next().and_then(Strand::from_char)
            }
            None => None,
        };

        let opt_field = |idx: Option<usize>| idx.and_then(|i| fields.get(i).copied());

        Ok(RepeatRecord {
            chrom,
            start,
            end,
            strand,
            repeat_name: get(cols.repeat_name, "repeat_name")?.to_string(),
            repeat_class: get(cols.repeat_class, "repeat_class")?.to_string(),
            repeat_family: get(cols.repeat_family, "repeat_family")?.to_string(),
            score: opt_field(cols.score).and_then(|s| s.parse().ok()),
            perc_div: opt_field(cols.perc_div).and_then(|s| s.parse().ok()),
            perc_del: opt_field(cols.perc_del).and_then(|s| s.parse().ok()),
            perc_ins: opt_field(cols.perc_ins).and_then(|s| s.parse().ok()),
            strain: opt_field(cols.strain).map(|s| s.to_string()),
        })
    }

    fn parse_position(&self, s: &str, field_name: &str) -> Result<u64> {
        s.parse().map_err(|_| TrackError::Parse {
            line: self.line_number,
            message: format!("Invalid {} position: '{}'", field_name, s),
        })
    }

    /// Get an iterator over all records.
    pub fn records(self) -> AnnotRecordIter<R> {
        AnnotRecordIter { reader: self }
    }
}

/// Iterator over repeat records.
pub struct AnnotRecordIter<R: Read> {
    reader: AnnotReader<R>,
}

impl<R: Read> Iterator for AnnotRecordIter<R> {
    type Item = Result<RepeatRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read all records from a normalized repeat table.
pub fn read_repeats<P: AsRef<Path>>(path: P) -> Result<Vec<RepeatRecord>> {
    let reader = AnnotReader::from_path(&path)?;
    let records: Vec<RepeatRecord> = reader.records().collect::<Result<_>>()?;
    info!(
        "Loaded {} repeat records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Read a table and keep one contig's records, sorted by start.
pub fn load_contig<P: AsRef<Path>>(path: P, contig: &str) -> Result<Vec<RepeatRecord>> {
    let mut records: Vec<RepeatRecord> = read_repeats(path)?
        .into_iter()
        .filter(|r| r.chrom == contig)
        .collect();
    records.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    info!("{} records on contig {}", records.len(), contig);
    Ok(records)
}

/// Parse records from a string (useful for testing).
pub fn parse_repeats(content: &str) -> Result<Vec<RepeatRecord>> {
    let reader = AnnotReader::new(content.as_bytes())?;
    reader.records().collect()
}
