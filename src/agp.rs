//! AGP scaffold-structure track.
//!
//! AGP 2.0 files describe how components (typically WGS contigs, type `W`)
//! and gaps are laid out along scaffold objects. For display, each `W`
//! component gets its own horizontal layer in file order, so scaffold
//! joins and breakpoints stay visually explicit. Coordinates are kept as
//! they appear in the file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{Result, TrackError};
use crate::region::Region;

/// One AGP row. The last four columns mean different things for
/// component and gap rows, so they are kept as raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgpRow {
    pub object: String,
    pub obj_beg: u64,
    pub obj_end: u64,
    pub part_number: u64,
    pub component_type: String,
    pub component_id: String,
    pub comp_beg: String,
    pub comp_end: String,
    pub orientation: String,
}

impl AgpRow {
    #[inline]
    pub fn is_component(&self) -> bool {
        self.component_type == "W"
    }
}

/// A W component clipped to a region and assigned a display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSegment {
    /// Layer index; preserves file order among W rows.
    pub layer: usize,
    pub start: u64,
    pub end: u64,
    pub component_id: String,
}

/// Parse AGP rows from any readable source; `#` comment lines skipped.
pub fn parse_agp<R: Read>(reader: R) -> Result<Vec<AgpRow>> {
    let reader = BufReader::new(reader);
    let mut rows = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            return Err(TrackError::Parse {
                line: idx + 1,
                message: format!("AGP requires 9 columns, got {}", fields.len()),
            });
        }

        let parse_u64 = |s: &str, name: &str| -> Result<u64> {
            s.parse().map_err(|_| TrackError::Parse {
                line: idx + 1,
                message: format!("Invalid {}: '{}'", name, s),
            })
        };

        rows.push(AgpRow {
            object: fields[0].to_string(),
            obj_beg: parse_u64(fields[1], "object_beg")?,
            obj_end: parse_u64(fields[2], "object_end")?,
            part_number: parse_u64(fields[3], "part_number")?,
            component_type: fields[4].to_string(),
            component_id: fields[5].to_string(),
            comp_beg: fields[6].to_string(),
            comp_end: fields[7].to_string(),
            orientation: fields[8].to_string(),
        });
    }

    Ok(rows)
}

/// Read an AGP file.
pub fn read_agp<P: AsRef<Path>>(path: P) -> Result<Vec<AgpRow>> {
    let file = File::open(&path)?;
    let rows = parse_agp(file)?;
    info!("Loaded {} AGP rows from {}", rows.len(), path.as_ref().display());
    Ok(rows)
}

/// Keep rows on the region's object, overlapping its bounds if any.
pub fn subset_agp(rows: &[AgpRow], region: &Region) -> Vec<AgpRow> {
    rows.iter()
        .filter(|r| r.object == region.contig)
        .filter(|r| match region.bounds() {
            Some((start, end)) => r.obj_end > start && r.obj_beg < end,
            None => true,
        })
        .cloned()
        .collect()
}

/// Lay out W components as layered segments clipped to the region.
///
/// Each W row gets its own layer; non-W rows (gaps) contribute nothing.
/// Segments clipping to nothing are dropped. With `rebase`, coordinates
/// shift so the region start maps to 0.
pub fn component_layers(
    rows: &[AgpRow],
    region: &Region,
    rebase: bool,
) -> Vec<LayerSegment> {
    let bounds = region.bounds();
    let mut segments = Vec::new();

    for (layer, row) in rows.iter().filter(|r| r.is_component()).enumerate() {
        let (mut seg_start, mut seg_end) = (row.obj_beg, row.obj_end);

        if let Some((start, end)) = bounds {
            seg_start = seg_start.max(start);
            seg_end = seg_end.min(end);
        }

        if seg_start >= seg_end {
            continue;
        }

        if rebase {
            if let Some((start, _)) = bounds {
                seg_start -= start;
                seg_end -= start;
            }
        }

        segments.push(LayerSegment {
            layer,
            start: seg_start,
            end: seg_end,
            component_id: row.component_id.clone(),
        });
    }

    segments
}

/// Write layered segments as a TSV table with a header row.
pub fn write_layers<W: Write>(writer: &mut W, segments: &[LayerSegment]) -> io::Result<()> {
    writeln!(writer, "layer\tstart\tend\tcomponent_id")?;
    for s in segments {
        writeln!(writer, "{}\t{}\t{}\t{}", s.layer, s.start, s.end, s.component_id)?;
    }
    Ok(())
}
