//! Region selector parsing and interval subsetting.
//!
//! Regions come in on the command line as `contig` or `contig:start-end`
//! and restrict analysis to one contig, optionally to a coordinate window.

use std::fmt;
use std::str::FromStr;

use crate::error::TrackError;
use crate::interval::RepeatRecord;

/// A contig name with optional coordinate bounds.
///
/// Bounds are applied as half-open overlap filters, so an interval is kept
/// when `interval.end > start && interval.start < end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub contig: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl Region {
    /// Region covering a whole contig.
    pub fn whole_contig(contig: impl Into<String>) -> Self {
        Self {
            contig: contig.into(),
            start: None,
            end: None,
        }
    }

    /// Region bounds as a pair, if present.
    #[inline]
    pub fn bounds(&self) -> Option<(u64, u64)> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    /// Keep records on this contig that overlap the bounds (if any).
    ///
    /// Produces a new vector; input records are not mutated.
    pub fn subset_repeats(&self, records: &[RepeatRecord]) -> Vec<RepeatRecord> {
        records
            .iter()
            .filter(|r| r.chrom == self.contig)
            .filter(|r| match self.bounds() {
                Some((start, end)) => r.overlaps_window(start, end),
                None => true,
            })
            .cloned()
            .collect()
    }
}

impl FromStr for Region {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TrackError::InvalidRegion(s.to_string()));
        }

        if !s.contains(':') {
            return Ok(Region::whole_contig(s));
        }

        let err = || TrackError::InvalidRegion(s.to_string());

        let mut parts = s.split(':');
        let contig = parts.next().ok_or_else(err)?;
        let coords = parts.next().ok_or_else(err)?;
        if parts.next().is_some() || contig.is_empty() {
            return Err(err());
        }

        let mut bounds = coords.split('-');
        let start = bounds.next().ok_or_else(err)?;
        let end = bounds.next().ok_or_else(err)?;
        if bounds.next().is_some() {
            return Err(err());
        }

        let start: u64 = start.parse().map_err(|_| err())?;
        let end: u64 = end.parse().map_err(|_| err())?;
        if start >= end {
            return Err(err());
        }

        Ok(Region {
            contig: contig.to_string(),
            start: Some(start),
            end: Some(end),
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bounds() {
            Some((start, end)) => write!(f, "{}:{}-{}", self.contig, start, end),
            None => write!(f, "{}", self.contig),
        }
    }
}

/// Shift record coordinates left by `offset`, producing new records.
///
/// Used to rebase a region subset to local coordinates (region start -> 0)
/// or to left-align tracks from different assemblies.
pub fn rebase_repeats(records: &[RepeatRecord], offset: u64) -> Vec<RepeatRecord> {
    records
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.start = r.start.saturating_sub(offset);
            r.end = r.end.saturating_sub(offset);
            r
        })
        .collect()
}
