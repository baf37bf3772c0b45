//! Core interval types for annotation tracks.
//!
//! All coordinates are 0-based, half-open `[start, end)`.

use std::fmt;

/// A bare coordinate span without chromosome or label.
///
/// The binning core works in span space: one contig at a time, labels
/// carried separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Length in base pairs.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open overlap test against a window.
    #[inline]
    pub fn overlaps_window(&self, win_start: u64, win_end: u64) -> bool {
        self.start < win_end && self.end > win_start
    }

    /// Clip to a window, returning `None` if the clipped span is empty.
    #[inline]
    pub fn clip(&self, win_start: u64, win_end: u64) -> Option<Span> {
        let start = self.start.max(win_start);
        let end = self.end.min(win_end);
        if start < end {
            Some(Span::new(start, end))
        } else {
            None
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.start, self.end)
    }
}

/// A span carrying a taxonomy label.
///
/// Intervals of the same taxon may overlap each other, and intervals of
/// different taxa may overlap too; the binners must cope with both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonInterval {
    pub start: u64,
    pub end: u64,
    pub taxon: String,
}

impl TaxonInterval {
    pub fn new(start: u64, end: u64, taxon: impl Into<String>) -> Self {
        Self {
            start,
            end,
            taxon: taxon.into(),
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Strand orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Parse a BED-style strand character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Parse RepeatMasker's strand encoding, where `C` marks the
    /// complement strand.
    pub fn from_rm_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            'C' => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// One row of a normalized RepeatMasker table.
///
/// Coordinates are already converted to 0-based half-open; the taxonomy
/// columns (`repeat_name`, `repeat_class`, `repeat_family`) feed
/// [`crate::taxonomy::TaxonomyLevel`] label selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Option<Strand>,
    pub repeat_name: String,
    pub repeat_class: String,
    pub repeat_family: String,
    pub score: Option<i64>,
    pub perc_div: Option<f64>,
    pub perc_del: Option<f64>,
    pub perc_ins: Option<f64>,
    pub strain: Option<String>,
}

impl RepeatRecord {
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Half-open overlap test against a coordinate window.
    #[inline]
    pub fn overlaps_window(&self, win_start: u64, win_end: u64) -> bool {
        self.start < win_end && self.end > win_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_clip() {
        let s = Span::new(100, 300);

        assert_eq!(s.clip(150, 250), Some(Span::new(150, 250)));
        assert_eq!(s.clip(0, 200), Some(Span::new(100, 200)));
        assert_eq!(s.clip(0, 1000), Some(s));
        assert_eq!(s.clip(300, 400), None); // Adjacent, not overlapping
        assert_eq!(s.clip(400, 500), None);
    }

    #[test]
    fn test_span_overlap_window() {
        let s = Span::new(100, 200);

        assert!(s.overlaps_window(150, 250));
        assert!(s.overlaps_window(0, 101));
        assert!(!s.overlaps_window(200, 300));
        assert!(!s.overlaps_window(0, 100));
    }

    #[test]
    fn test_strand_rm_encoding() {
        assert_eq!(Strand::from_rm_char('+'), Some(Strand::Plus));
        assert_eq!(Strand::from_rm_char('C'), Some(Strand::Minus));
        assert_eq!(Strand::from_rm_char('-'), None);
        assert_eq!(Strand::Minus.to_string(), "-");
    }

    #[test]
    fn test_taxon_interval_span() {
        let iv = TaxonInterval::new(10, 50, "LINE");
        assert_eq!(iv.span(), Span::new(10, 50));
        assert_eq!(iv.len(), 40);
        assert!(!iv.is_empty());
    }
}
