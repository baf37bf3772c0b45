//! RepeatMasker `.out` normalization.
//!
//! Raw RepeatMasker output is a whitespace-aligned report with 1-based
//! inclusive coordinates and `+`/`C` strand encoding. Normalization
//! produces the canonical 0-based half-open table the rest of the crate
//! consumes: strand re-encoded to `+`/`-`, the `class/family` column split
//! in two, and a strain label attached.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{Result, TrackError};
use crate::interval::{RepeatRecord, Strand};

/// Split RepeatMasker's `class/family` column on the first slash.
///
/// Entries without a family part (e.g. `Simple_repeat`) get family `NA`.
pub fn split_class_family(class_family: &str) -> (&str, &str) {
    match class_family.split_once('/') {
        Some((class, family)) => (class, family),
        None => (class_family, "NA"),
    }
}

/// Parse a RepeatMasker `.out` report into normalized records.
///
/// Header, ruler, and blank lines are skipped; data rows shorter than the
/// 14 standard columns are ignored, matching RepeatMasker's own trailing
/// partial lines. Unexpected strand values fail naming the offender.
pub fn parse_rm_out<R: Read>(reader: R, strain: &str) -> Result<Vec<RepeatRecord>> {
    let reader = BufReader::new(reader);
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        let line_number = idx + 1;

        if line.is_empty()
            || line.starts_with("SW")
            || line.starts_with("score")
            || line.starts_with("perc")
            || line.starts_with("----")
        {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 14 {
            continue;
        }

        let parse_err = |field: &str, value: &str| TrackError::Parse {
            line: line_number,
            message: format!("Invalid {}: '{}'", field, value),
        };

        let score: i64 = parts[0].parse().map_err(|_| parse_err("score", parts[0]))?;
        let perc_div: f64 = parts[1].parse().map_err(|_| parse_err("perc_div", parts[1]))?;
        let perc_del: f64 = parts[2].parse().map_err(|_| parse_err("perc_del", parts[2]))?;
        let perc_ins: f64 = parts[3].parse().map_err(|_| parse_err("perc_ins", parts[3]))?;
        let chrom = parts[4].to_string();
        let start_1based: u64 = parts[5].parse().map_err(|_| parse_err("start", parts[5]))?;
        let end_1based: u64 = parts[6].parse().map_err(|_| parse_err("end", parts[6]))?;

        let strand = parts[8]
            .chars()
            .next()
            .and_then(Strand::from_rm_char)
            .ok_or_else(|| {
                TrackError::InvalidFormat(format!(
                    "Unexpected strand value in RM output: '{}'",
                    parts[8]
                ))
            })?;

        let (repeat_class, repeat_family) = split_class_family(parts[10]);

        // 1-based inclusive -> 0-based half-open
        records.push(RepeatRecord {
            chrom,
            start: start_1based.saturating_sub(1),
            end: end_1based,
            strand: Some(strand),
            repeat_name: parts[9].to_string(),
            repeat_class: repeat_class.to_string(),
            repeat_family: repeat_family.to_string(),
            score: Some(score),
            perc_div: Some(perc_div),
            perc_del: Some(perc_del),
            perc_ins: Some(perc_ins),
            strain: Some(strain.to_string()),
        });
    }

    Ok(records)
}

/// Read and normalize a RepeatMasker `.out` file.
pub fn read_rm_out<P: AsRef<Path>>(path: P, strain: &str) -> Result<Vec<RepeatRecord>> {
    let file = File::open(&path)?;
    let records = parse_rm_out(file, strain)?;
    info!(
        "Normalized {} RM alignments from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Column order of the normalized table.
const COLUMNS: &[&str] = &[
    "chrom",
    "start",
    "end",
    "strand",
    "repeat_name",
    "repeat_class",
    "repeat_family",
    "score",
    "perc_div",
    "perc_del",
    "perc_ins",
    "strain",
];

/// Write normalized records as a TSV table with a header row.
pub fn write_repeats<W: Write>(writer: &mut W, records: &[RepeatRecord]) -> io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join("\t"))?;
    for r in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.chrom,
            r.start,
            r.end,
            r.strand.map(|s| s.to_string()).unwrap_or_else(|| ".".to_string()),
            r.repeat_name,
            r.repeat_class,
            r.repeat_family,
            r.score.unwrap_or(0),
            r.perc_div.unwrap_or(0.0),
            r.perc_del.unwrap_or(0.0),
            r.perc_ins.unwrap_or(0.0),
            r.strain.as_deref().unwrap_or("NA"),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RM_OUT: &str = "\
   SW   perc perc perc  query     position in query    matching  repeat       position in repeat
score   div. del. ins.  sequence  begin end   (left)   repeat    class/family begin end  (left) ID

 2251   11.5  5.4  0.0  chr1       1001  1250 (98750) +  L1Md_A   LINE/L1        101  350 (5900)   1
  463    8.2  0.0  1.2  chr1       2001  2100 (97900) C  B1_Mus1  SINE/Alu         1  100    (0)   2
  311    2.0  0.0  0.0  chr2        501   560 (99440) +  (TA)n    Simple_repeat    1   60    (0)   3
";

    #[test]
    fn test_split_class_family() {
        assert_eq!(split_class_family("LINE/L1"), ("LINE", "L1"));
        assert_eq!(split_class_family("Simple_repeat"), ("Simple_repeat", "NA"));
        // Only the first slash splits
        assert_eq!(split_class_family("LTR/ERVK/intact"), ("LTR", "ERVK/intact"));
    }

    #[test]
    fn test_parse_rm_out() {
        let records = parse_rm_out(RM_OUT.as_bytes(), "B6").unwrap();

        assert_eq!(records.len(), 3);

        let r = &records[0];
        assert_eq!(r.chrom, "chr1");
        // 1-based inclusive 1001..1250 -> 0-based half-open [1000, 1250)
        assert_eq!(r.start, 1000);
        assert_eq!(r.end, 1250);
        assert_eq!(r.strand, Some(Strand::Plus));
        assert_eq!(r.repeat_name, "L1Md_A");
        assert_eq!(r.repeat_class, "LINE");
        assert_eq!(r.repeat_family, "L1");
        assert_eq!(r.score, Some(2251));
        assert_eq!(r.strain.as_deref(), Some("B6"));

        // C re-encodes to minus
        assert_eq!(records[1].strand, Some(Strand::Minus));
        // Bare class gets family NA
        assert_eq!(records[2].repeat_class, "Simple_repeat");
        assert_eq!(records[2].repeat_family, "NA");
    }

    #[test]
    fn test_unexpected_strand_fails() {
        let bad = " 100  1.0 0.0 0.0 chr1 10 20 (0) ? L1Md_A LINE/L1 1 10 (0) 1\n";
        let err = parse_rm_out(bad.as_bytes(), "B6").unwrap_err();
        match err {
            TrackError::InvalidFormat(msg) => assert!(msg.contains("'?'")),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_short_rows_skipped() {
        let content = "100 1.0 0.0 0.0 chr1 10 20\n";
        let records = parse_rm_out(content.as_bytes(), "B6").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_round_trip_through_annot_reader() {
        let records = parse_rm_out(RM_OUT.as_bytes(), "B6").unwrap();

        let mut buf = Vec::new();
        write_repeats(&mut buf, &records).unwrap();

        let reread = crate::annot::parse_repeats(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_eq!(reread, records);
    }
}
