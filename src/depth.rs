//! Read-depth track loading and binning.
//!
//! Input is `samtools depth` output: a headerless TSV of
//! `chrom  pos  depth`, one row per base. Binning aggregates depth values
//! into fixed-size windows for smoothing before display.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;

use crate::error::{Result, TrackError};
use crate::region::Region;

/// One per-base depth observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthRecord {
    pub chrom: String,
    pub pos: u64,
    pub depth: u64,
}

/// Aggregation applied within each depth bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthStatistic {
    #[default]
    Mean,
    Median,
    Sum,
}

impl DepthStatistic {
    /// Parse a CLI selector; unknown values fail naming the offender.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(DepthStatistic::Mean),
            "median" => Ok(DepthStatistic::Median),
            "sum" => Ok(DepthStatistic::Sum),
            _ => Err(TrackError::InvalidSelector {
                kind: "statistic",
                value: s.to_string(),
            }),
        }
    }

    fn aggregate(&self, values: &mut Vec<u64>) -> f64 {
        match self {
            DepthStatistic::Mean => {
                values.iter().sum::<u64>() as f64 / values.len() as f64
            }
            DepthStatistic::Median => {
                values.sort_unstable();
                let n = values.len();
                if n % 2 == 1 {
                    values[n / 2] as f64
                } else {
                    (values[n / 2 - 1] as f64 + values[n / 2] as f64) / 2.0
                }
            }
            DepthStatistic::Sum => values.iter().sum::<u64>() as f64,
        }
    }
}

/// Aggregated depth for one bin.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBin {
    /// Bin index (`pos / bin_size`).
    pub bin: u64,
    /// Genomic coordinate of the bin start (`bin * bin_size`).
    pub x: u64,
    pub depth: f64,
}

/// Parse `samtools depth` records from any readable source.
pub fn parse_depth<R: Read>(reader: R) -> Result<Vec<DepthRecord>> {
    let reader = BufReader::new(reader);
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let err = |message: String| TrackError::Parse {
            line: idx + 1,
            message,
        };

        let chrom = fields
            .next()
            .ok_or_else(|| err("Missing chrom field".to_string()))?;
        let pos = fields
            .next()
            .ok_or_else(|| err("Missing pos field".to_string()))?;
        let depth = fields
            .next()
            .ok_or_else(|| err("Missing depth field".to_string()))?;

        records.push(DepthRecord {
            chrom: chrom.to_string(),
            pos: pos
                .parse()
                .map_err(|_| err(format!("Invalid position: '{}'", pos)))?,
            depth: depth
                .parse()
                .map_err(|_| err(format!("Invalid depth: '{}'", depth)))?,
        });
    }

    Ok(records)
}

/// Read a `samtools depth` file.
pub fn read_depth<P: AsRef<Path>>(path: P) -> Result<Vec<DepthRecord>> {
    let file = File::open(&path)?;
    let records = parse_depth(file)?;
    info!(
        "Loaded {} depth observations from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Keep observations on the region's contig, inside its bounds if any.
///
/// Bounds are inclusive on both ends here, matching how per-base depth is
/// conventionally sliced.
pub fn subset_depth(records: &[DepthRecord], region: &Region) -> Vec<DepthRecord> {
    records
        .iter()
        .filter(|r| r.chrom == region.contig)
        .filter(|r| match region.bounds() {
            Some((start, end)) => r.pos >= start && r.pos <= end,
            None => true,
        })
        .cloned()
        .collect()
}

/// Aggregate depth observations into fixed-size bins.
///
/// Only bins containing at least one observation are emitted, sorted by
/// bin index. Empty input yields an empty result.
pub fn bin_depth(
    records: &[DepthRecord],
    bin_size: u64,
    statistic: DepthStatistic,
) -> Result<Vec<DepthBin>> {
    if bin_size == 0 {
        return Err(TrackError::InvalidFormat(
            "bin size must be positive".to_string(),
        ));
    }

    let mut grouped: FxHashMap<u64, Vec<u64>> = FxHashMap::default();
    for r in records {
        grouped.entry(r.pos / bin_size).or_default().push(r.depth);
    }

    let mut bins: Vec<DepthBin> = grouped
        .into_iter()
        .map(|(bin, mut values)| DepthBin {
            bin,
            x: bin * bin_size,
            depth: statistic.aggregate(&mut values),
        })
        .collect();
    bins.sort_by(|a, b| a.bin.cmp(&b.bin));

    Ok(bins)
}

/// Write binned depth as a TSV table with a header row.
pub fn write_depth_bins<W: Write>(writer: &mut W, bins: &[DepthBin]) -> io::Result<()> {
    writeln!(writer, "bin\tx\tdepth")?;
    for b in bins {
        if b.depth.fract() == 0.0 {
            writeln!(writer, "{}\t{}\t{}", b.bin, b.x, b.depth as u64)?;
        } else {
            writeln!(writer, "{}\t{}\t{}", b.bin, b.x, b.depth)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chrom: &str, pos: u64, depth: u64) -> DepthRecord {
        DepthRecord {
            chrom: chrom.to_string(),
            pos,
            depth,
        }
    }

    #[test]
    fn test_parse_depth() {
        let content = "chr1\t1\t30\nchr1\t2\t31\nchr2\t1\t5\n";
        let records = parse_depth(content.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], record("chr1", 1, 30));
    }

    #[test]
    fn test_parse_depth_bad_row() {
        assert!(parse_depth("chr1\tx\t30\n".as_bytes()).is_err());
        assert!(parse_depth("chr1\t1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_statistic_selector() {
        assert_eq!(DepthStatistic::parse("median").unwrap(), DepthStatistic::Median);

        let err = DepthStatistic::parse("mode").unwrap_err();
        match err {
            TrackError::InvalidSelector { kind, value } => {
                assert_eq!(kind, "statistic");
                assert_eq!(value, "mode");
            }
            other => panic!("expected InvalidSelector, got {:?}", other),
        }
    }

    #[test]
    fn test_subset_inclusive_bounds() {
        let records = vec![
            record("chr1", 99, 1),
            record("chr1", 100, 2),
            record("chr1", 200, 3),
            record("chr1", 201, 4),
            record("chr2", 150, 5),
        ];
        let region: Region = "chr1:100-200".parse().unwrap();

        let sub = subset_depth(&records, &region);
        let positions: Vec<u64> = sub.iter().map(|r| r.pos).collect();
        assert_eq!(positions, vec![100, 200]);
    }

    #[test]
    fn test_bin_mean() {
        let records = vec![
            record("chr1", 0, 10),
            record("chr1", 5, 20),
            record("chr1", 10, 7),
        ];
        let bins = bin_depth(&records, 10, DepthStatistic::Mean).unwrap();

        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0], DepthBin { bin: 0, x: 0, depth: 15.0 });
        assert_eq!(bins[1], DepthBin { bin: 1, x: 10, depth: 7.0 });
    }

    #[test]
    fn test_bin_median_even_group() {
        let records = vec![
            record("chr1", 0, 1),
            record("chr1", 1, 9),
            record("chr1", 2, 3),
            record("chr1", 3, 5),
        ];
        let bins = bin_depth(&records, 10, DepthStatistic::Median).unwrap();

        // Sorted values 1,3,5,9: median is (3 + 5) / 2
        assert_eq!(bins[0].depth, 4.0);
    }

    #[test]
    fn test_bin_median_extreme_depths() {
        // The middle pair must not be summed in u64 before converting.
        let records = vec![
            record("chr1", 0, u64::MAX),
            record("chr1", 1, u64::MAX),
        ];
        let bins = bin_depth(&records, 10, DepthStatistic::Median).unwrap();

        assert_eq!(bins[0].depth, u64::MAX as f64);
    }

    #[test]
    fn test_bin_sum_and_empty_bins_skipped() {
        let records = vec![record("chr1", 0, 2), record("chr1", 95, 3)];
        let bins = bin_depth(&records, 10, DepthStatistic::Sum).unwrap();

        // Bins 1..8 have no observations and emit nothing
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].bin, 0);
        assert_eq!(bins[1].bin, 9);
        assert_eq!(bins[1].x, 90);
        assert_eq!(bins[1].depth, 3.0);
    }

    #[test]
    fn test_empty_input() {
        let bins = bin_depth(&[], 10, DepthStatistic::Mean).unwrap();
        assert!(bins.is_empty());
    }
}
