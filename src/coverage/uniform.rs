//! Uniform binning: independent per-taxon coverage sums.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::interval::TaxonInterval;
use crate::taxonomy::UNANNOTATED;

use super::{bin_starts, check_bin_size, max_end, CoverageRecord};

/// Bins intervals by summing each taxon's overlap with the bin.
///
/// Per-taxon sums are raw: positions covered twice by the same taxon are
/// counted twice. That is a documented limitation of this strategy, so a
/// bin's total coverage can exceed the bin size when annotations overlap.
/// The `Unannotated` record floors at zero in that case.
#[derive(Debug, Clone)]
pub struct UniformBinner {
    pub bin_size: u64,
}

impl UniformBinner {
    pub fn new(bin_size: u64) -> Self {
        Self { bin_size }
    }

    /// Compute per-bin, per-taxon coverage records.
    ///
    /// Every bin emits one record per overlapping taxon (sorted by label)
    /// plus an explicit `Unannotated` record. Empty input yields no bins.
    pub fn bin(&self, intervals: &[TaxonInterval]) -> Result<Vec<CoverageRecord>> {
        check_bin_size(self.bin_size)?;

        let mut records = Vec::new();

        for bin_start in bin_starts(max_end(intervals), self.bin_size) {
            let bin_end = bin_start + self.bin_size;

            let mut covered: FxHashMap<&str, u64> = FxHashMap::default();
            for iv in intervals {
                if iv.span().overlaps_window(bin_start, bin_end) {
                    let overlap = iv.end.min(bin_end) - iv.start.max(bin_start);
                    *covered.entry(iv.taxon.as_str()).or_insert(0) += overlap;
                }
            }

            let total_covered: u64 = covered.values().sum();

            let mut taxa: Vec<(&str, u64)> = covered.into_iter().collect();
            taxa.sort_by(|a, b| a.0.cmp(b.0));

            for (taxon, bp) in taxa {
                records.push(CoverageRecord::new(bin_start, bin_end, taxon, bp as f64));
            }

            records.push(CoverageRecord::new(
                bin_start,
                bin_end,
                UNANNOTATED,
                self.bin_size.saturating_sub(total_covered) as f64,
            ));
        }

        Ok(records)
    }
}
