//! Per-bin coverage accounting over annotated intervals.
//!
//! A contig is tiled with fixed-size half-open bins starting at 0. Each
//! binning strategy turns a set of possibly-overlapping labeled intervals
//! into [`CoverageRecord`]s, one per (bin, taxonomy) pair, with the
//! sentinel taxonomy [`UNANNOTATED`] accounting for uncovered bases.
//!
//! The three strategies differ only in how covered bases are attributed:
//!
//! - [`UniformBinner`]: independent raw sums per taxon (no overlap
//!   deduplication)
//! - [`DominantBinner`]: the whole union-covered span goes to the taxon
//!   with the most exclusive coverage
//! - [`ProportionalBinner`]: the union-covered span is split across taxa
//!   in proportion to their own merged coverage

pub mod dominant;
pub mod proportional;
pub mod uniform;

pub use dominant::DominantBinner;
pub use proportional::ProportionalBinner;
pub use uniform::UniformBinner;

use std::io::{self, Write};

use rustc_hash::FxHashMap;

use crate::error::{Result, TrackError};
use crate::interval::{Span, TaxonInterval};
pub use crate::taxonomy::UNANNOTATED;

/// Which attribution strategy to bin with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinStrategy {
    Uniform,
    #[default]
    Dominant,
    Proportional,
}

impl BinStrategy {
    /// Parse a CLI selector; unknown values fail naming the offender.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(BinStrategy::Uniform),
            "dominant" => Ok(BinStrategy::Dominant),
            "proportional" => Ok(BinStrategy::Proportional),
            _ => Err(TrackError::InvalidSelector {
                kind: "strategy",
                value: s.to_string(),
            }),
        }
    }

    /// Bin intervals with this strategy.
    pub fn bin(&self, bin_size: u64, intervals: &[TaxonInterval]) -> Result<Vec<CoverageRecord>> {
        match self {
            BinStrategy::Uniform => UniformBinner::new(bin_size).bin(intervals),
            BinStrategy::Dominant => DominantBinner::new(bin_size).bin(intervals),
            BinStrategy::Proportional => ProportionalBinner::new(bin_size).bin(intervals),
        }
    }
}

/// Coverage attributed to one taxonomy label within one bin.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRecord {
    pub bin_start: u64,
    pub bin_end: u64,
    pub taxonomy: String,
    pub coverage: f64,
}

impl CoverageRecord {
    pub fn new(bin_start: u64, bin_end: u64, taxonomy: impl Into<String>, coverage: f64) -> Self {
        Self {
            bin_start,
            bin_end,
            taxonomy: taxonomy.into(),
            coverage,
        }
    }
}

/// Merge overlapping spans into a minimal sorted set.
///
/// Sort by start, then sweep left to right extending the open span while
/// the next span starts at or before its end. Adjacent spans (next start
/// == current end) merge too. Idempotent on already-merged input.
pub fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    if spans.is_empty() {
        return Vec::new();
    }

    spans.sort();

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    let mut current = spans[0];

    for span in spans.into_iter().skip(1) {
        if span.start <= current.end {
            current.end = current.end.max(span.end);
        } else {
            merged.push(current);
            current = span;
        }
    }

    merged.push(current);
    merged
}

/// Total length covered by a merged span set.
#[inline]
pub fn total_len(spans: &[Span]) -> u64 {
    spans.iter().map(Span::len).sum()
}

/// Clip labeled intervals to one bin, dropping degenerate results.
///
/// An interval only partially overlapping the bin contributes just the
/// inside portion; labels are borrowed, not cloned.
pub fn clip_to_bin(
    intervals: &[TaxonInterval],
    bin_start: u64,
    bin_end: u64,
) -> Vec<(Span, &str)> {
    intervals
        .iter()
        .filter_map(|iv| {
            iv.span()
                .clip(bin_start, bin_end)
                .map(|span| (span, iv.taxon.as_str()))
        })
        .collect()
}

/// Bin start positions tiling `[0, max_pos]` at `bin_size` strides.
///
/// Matches the axis used by all binners: starts run `0, bin_size, ...`
/// through `max_pos` inclusive, so the final bin may extend past the last
/// annotated base (and a bin starting exactly at `max_pos` is included).
/// `max_pos == None` (empty input) yields no bins rather than panicking.
pub fn bin_starts(max_pos: Option<u64>, bin_size: u64) -> Vec<u64> {
    let max_pos = match max_pos {
        Some(p) => p,
        None => return Vec::new(),
    };
    (0..)
        .map(|i| i * bin_size)
        .take_while(|&b| b <= max_pos)
        .collect()
}

/// Maximum end coordinate across intervals, `None` when empty.
pub fn max_end(intervals: &[TaxonInterval]) -> Option<u64> {
    intervals.iter().map(|iv| iv.end).max()
}

pub(crate) fn check_bin_size(bin_size: u64) -> Result<()> {
    if bin_size == 0 {
        return Err(TrackError::InvalidFormat(
            "bin size must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Union and per-taxon exclusive accounting for one bin's clipped
/// intervals. Shared by the dominant and proportional strategies.
pub(crate) struct BinAccounting {
    /// Total length of the all-taxa union (union-covered bp).
    pub repeat_bp: u64,
    /// `bin_size - repeat_bp`, floored at zero.
    pub unannotated_bp: u64,
    /// Merged (deduplicated) bp per taxon, sorted by label for
    /// deterministic emission order.
    pub class_bp: Vec<(String, u64)>,
}

impl BinAccounting {
    pub fn compute(clipped: &[(Span, &str)], bin_size: u64) -> Self {
        let union = merge_spans(clipped.iter().map(|(s, _)| *s).collect());
        let repeat_bp = total_len(&union);
        let unannotated_bp = bin_size.saturating_sub(repeat_bp);

        // Per-taxon merge deduplicates same-taxon overlap; cross-taxon
        // overlap is intentionally counted once per taxon.
        let mut by_taxon: FxHashMap<&str, Vec<Span>> = FxHashMap::default();
        for (span, taxon) in clipped {
            by_taxon.entry(taxon).or_default().push(*span);
        }

        let mut class_bp: Vec<(String, u64)> = by_taxon
            .into_iter()
            .map(|(taxon, spans)| (taxon.to_string(), total_len(&merge_spans(spans))))
            .collect();
        class_bp.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            repeat_bp,
            unannotated_bp,
            class_bp,
        }
    }

    /// Sum of per-taxon merged bp (annotation space); can exceed
    /// `repeat_bp` when taxa overlap each other.
    pub fn annotation_bp(&self) -> u64 {
        self.class_bp.iter().map(|(_, bp)| bp).sum()
    }
}

/// Write coverage records as a TSV table with a header row.
///
/// Integral coverages print without a decimal point so the uniform and
/// dominant outputs stay integer-typed on disk.
pub fn write_coverage<W: Write>(writer: &mut W, records: &[CoverageRecord]) -> io::Result<()> {
    writeln!(writer, "bin_start\tbin_end\ttaxonomy\tcoverage")?;
    for rec in records {
        if rec.coverage.fract() == 0.0 {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                rec.bin_start, rec.bin_end, rec.taxonomy, rec.coverage as u64
            )?;
        } else {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                rec.bin_start, rec.bin_end, rec.taxonomy, rec.coverage
            )?;
        }
    }
    Ok(())
}
