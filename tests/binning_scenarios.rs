//! End-to-end coverage accounting scenarios.
//!
//! Each scenario pins the arithmetic of one attribution strategy on a
//! small synthetic input, including the documented double-counting
//! behavior of the uniform strategy.

use rmtrack::coverage::{
    clip_to_bin, merge_spans, total_len, BinStrategy, DominantBinner, ProportionalBinner,
    UniformBinner,
};
use rmtrack::interval::{Span, TaxonInterval};
use rmtrack::taxonomy::UNANNOTATED;

fn ivs(triples: &[(u64, u64, &str)]) -> Vec<TaxonInterval> {
    triples
        .iter()
        .map(|&(s, e, t)| TaxonInterval::new(s, e, t))
        .collect()
}

fn bin(records: &[rmtrack::CoverageRecord], bin_start: u64) -> Vec<&rmtrack::CoverageRecord> {
    records.iter().filter(|r| r.bin_start == bin_start).collect()
}

// Scenario 1: uniform binning double-counts same-category overlap.
#[test]
fn uniform_double_counts_same_category_overlap() {
    let intervals = ivs(&[(0, 50, "A"), (40, 100, "A")]);

    let records = UniformBinner::new(100).bin(&intervals).unwrap();
    let bin0 = bin(&records, 0);

    assert_eq!(bin0.len(), 2);
    assert_eq!(bin0[0].taxonomy, "A");
    assert_eq!(bin0[0].coverage, 110.0); // 50 + 60, overlap counted twice
    assert_eq!(bin0[1].taxonomy, UNANNOTATED);
    assert_eq!(bin0[1].coverage, 0.0); // max(100 - 110, 0)
}

// Scenario 2: dominant binning merges the same input before accounting.
#[test]
fn dominant_deduplicates_same_category_overlap() {
    let intervals = ivs(&[(0, 50, "A"), (40, 100, "A")]);

    let records = DominantBinner::new(100).bin(&intervals).unwrap();
    let bin0 = bin(&records, 0);

    assert_eq!(bin0.len(), 2);
    assert_eq!(bin0[0].taxonomy, UNANNOTATED);
    assert_eq!(bin0[0].coverage, 0.0);
    assert_eq!(bin0[1].taxonomy, "A");
    assert_eq!(bin0[1].coverage, 100.0); // union [0,100), not 110
}

// Scenario 3: the dominant category takes the whole union.
#[test]
fn dominant_attributes_union_to_winner() {
    let intervals = ivs(&[(0, 40, "A"), (50, 100, "B")]);

    let records = DominantBinner::new(100).bin(&intervals).unwrap();
    let bin0 = bin(&records, 0);

    assert_eq!(bin0[0].taxonomy, UNANNOTATED);
    assert_eq!(bin0[0].coverage, 10.0);
    assert_eq!(bin0[1].taxonomy, "B"); // 50 > 40
    assert_eq!(bin0[1].coverage, 90.0); // union length, not B's 50
}

// Scenario 4: proportional rescaling under cross-category overlap.
#[test]
fn proportional_rescales_overlapping_categories() {
    let intervals = ivs(&[(0, 60, "A"), (40, 100, "B")]);

    let records = ProportionalBinner::new(100).bin(&intervals).unwrap();
    let bin0 = bin(&records, 0);

    // class_bp A = 60, B = 60, annotation_bp = 120, repeat_bp = 100
    let a = bin0.iter().find(|r| r.taxonomy == "A").unwrap();
    let b = bin0.iter().find(|r| r.taxonomy == "B").unwrap();
    assert!((a.coverage - 50.0).abs() < 1e-9);
    assert!((b.coverage - 50.0).abs() < 1e-9);

    let taxa_sum: f64 = bin0
        .iter()
        .filter(|r| r.taxonomy != UNANNOTATED)
        .map(|r| r.coverage)
        .sum();
    assert!((taxa_sum - 100.0).abs() < 1e-9);
}

// Scenario 5: a window nothing overlaps yields one Unannotated record.
#[test]
fn empty_window_yields_single_unannotated_record() {
    let intervals = ivs(&[(0, 50, "A"), (320, 380, "B")]);

    for strategy in [
        BinStrategy::Uniform,
        BinStrategy::Dominant,
        BinStrategy::Proportional,
    ] {
        let records = strategy.bin(100, &intervals).unwrap();
        let bin2 = bin(&records, 200);

        assert_eq!(bin2.len(), 1, "{:?}", strategy);
        assert_eq!(bin2[0].taxonomy, UNANNOTATED);
        assert_eq!(bin2[0].coverage, 100.0);
        assert_eq!(bin2[0].bin_end, 300);
    }
}

// Dominant invariant: unannotated + repeat == bin_size in every bin.
#[test]
fn dominant_accounts_for_every_base() {
    let intervals = ivs(&[
        (5, 95, "LINE"),
        (30, 160, "SINE"),
        (150, 155, "LINE"),
        (240, 333, "LTR"),
        (260, 300, "Simple_repeat"),
    ]);

    let records = DominantBinner::new(100).bin(&intervals).unwrap();

    for bin_start in (0..=300).step_by(100) {
        let total: f64 = bin(&records, bin_start).iter().map(|r| r.coverage).sum();
        assert_eq!(total, 100.0, "bin {}", bin_start);
    }
}

// Proportional invariant: category coverages sum to the union length.
#[test]
fn proportional_sums_to_union_in_every_bin() {
    let intervals = ivs(&[
        (5, 95, "LINE"),
        (30, 160, "SINE"),
        (150, 155, "LINE"),
        (240, 333, "LTR"),
        (260, 300, "Simple_repeat"),
    ]);

    let records = ProportionalBinner::new(100).bin(&intervals).unwrap();

    for bin_start in (0..=300).step_by(100) {
        let clipped = clip_to_bin(&intervals, bin_start, bin_start + 100);
        let union = merge_spans(clipped.iter().map(|(s, _)| *s).collect());
        let repeat_bp = total_len(&union) as f64;

        let taxa_sum: f64 = bin(&records, bin_start)
            .iter()
            .filter(|r| r.taxonomy != UNANNOTATED)
            .map(|r| r.coverage)
            .sum();
        assert!(
            (taxa_sum - repeat_bp).abs() < 1e-9,
            "bin {}: {} != {}",
            bin_start,
            taxa_sum,
            repeat_bp
        );
    }
}

// Merging an already-merged set returns it unchanged.
#[test]
fn merge_is_idempotent() {
    let spans = vec![
        Span::new(10, 20),
        Span::new(5, 15),
        Span::new(40, 60),
        Span::new(60, 70),
    ];

    let once = merge_spans(spans);
    assert_eq!(once, vec![Span::new(5, 20), Span::new(40, 70)]);
    assert_eq!(merge_spans(once.clone()), once);
    assert_eq!(total_len(&once), 45);
}

// Binning an empty interval set must not panic.
#[test]
fn empty_input_yields_no_bins() {
    for strategy in [
        BinStrategy::Uniform,
        BinStrategy::Dominant,
        BinStrategy::Proportional,
    ] {
        assert!(strategy.bin(100, &[]).unwrap().is_empty(), "{:?}", strategy);
    }
}
