//! Proportional binning: composition-preserving attribution.

use crate::error::Result;
use crate::interval::TaxonInterval;
use crate::taxonomy::UNANNOTATED;

use super::{bin_starts, check_bin_size, clip_to_bin, max_end, BinAccounting, CoverageRecord};

/// Bins intervals and splits each bin's union-covered span across taxa in
/// proportion to their own merged coverage.
///
/// Per-taxon bp are merged within a taxon but not across taxa, so their
/// sum (`annotation_bp`) can exceed the union length when taxa overlap.
/// Rescaling by `repeat_bp / annotation_bp` projects annotation space
/// onto repeat space: emitted taxon coverages always sum to `repeat_bp`,
/// preserving relative composition while bounding the total to the true
/// covered span. Taxa scaling to exactly zero are omitted.
#[derive(Debug, Clone)]
pub struct ProportionalBinner {
    pub bin_size: u64,
}

impl ProportionalBinner {
    pub fn new(bin_size: u64) -> Self {
        Self { bin_size }
    }

    /// Compute per-bin coverage records.
    ///
    /// A bin nothing overlaps emits exactly one `(Unannotated, bin_size)`
    /// record; otherwise `Unannotated` comes first, then one record per
    /// contributing taxon in label order.
    pub fn bin(&self, intervals: &[TaxonInterval]) -> Result<Vec<CoverageRecord>> {
        check_bin_size(self.bin_size)?;

        let mut records = Vec::new();

        for bin_start in bin_starts(max_end(intervals), self.bin_size) {
            let bin_end = bin_start + self.bin_size;

            let clipped = clip_to_bin(intervals, bin_start, bin_end);
            if clipped.is_empty() {
                records.push(CoverageRecord::new(
                    bin_start,
                    bin_end,
                    UNANNOTATED,
                    self.bin_size as f64,
                ));
                continue;
            }

            let acc = BinAccounting::compute(&clipped, self.bin_size);
            let annotation_bp = acc.annotation_bp();

            records.push(CoverageRecord::new(
                bin_start,
                bin_end,
                UNANNOTATED,
                acc.unannotated_bp as f64,
            ));

            if acc.repeat_bp > 0 && annotation_bp > 0 {
                for (taxon, bp) in &acc.class_bp {
                    let scaled = (*bp as f64 / annotation_bp as f64) * acc.repeat_bp as f64;
                    if scaled > 0.0 {
                        records.push(CoverageRecord::new(bin_start, bin_end, taxon.clone(), scaled));
                    }
                }
            }
        }

        Ok(records)
    }
}
