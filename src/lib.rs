//! rmtrack: repeat-annotation track binning for assembly diagnostics.
//!
//! The crate turns genomic annotation tracks (RepeatMasker repeats, AGP
//! scaffold structure, read-depth) into aligned per-bin tabular summaries
//! over a shared coordinate axis. At its center is the coverage core:
//! three strategies for attributing possibly-overlapping annotated
//! intervals to fixed-size bins.
//!
//! # Example
//!
//! ```rust
//! use rmtrack::coverage::DominantBinner;
//! use rmtrack::interval::TaxonInterval;
//!
//! let intervals = vec![
//!     TaxonInterval::new(0, 40, "LINE"),
//!     TaxonInterval::new(50, 100, "SINE"),
//! ];
//!
//! let records = DominantBinner::new(100).bin(&intervals).unwrap();
//! assert_eq!(records[1].taxonomy, "SINE");
//! assert_eq!(records[1].coverage, 90.0);
//! ```

pub mod agp;
pub mod annot;
pub mod coverage;
pub mod depth;
pub mod error;
pub mod interval;
pub mod normalize;
pub mod palette;
pub mod region;
pub mod taxonomy;

// Re-export commonly used types
pub use coverage::{BinStrategy, CoverageRecord, DominantBinner, ProportionalBinner, UniformBinner};
pub use error::TrackError;
pub use interval::{RepeatRecord, Span, Strand, TaxonInterval};
pub use region::Region;
pub use taxonomy::{TaxonomyLevel, UNANNOTATED};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::coverage::{
        merge_spans, BinStrategy, CoverageRecord, DominantBinner, ProportionalBinner,
        UniformBinner,
    };
    pub use crate::error::TrackError;
    pub use crate::interval::{RepeatRecord, Span, Strand, TaxonInterval};
    pub use crate::region::Region;
    pub use crate::taxonomy::{TaxonomyLevel, UNANNOTATED};
}
