//! Taxonomy level selection for repeat annotations.

use crate::error::TrackError;
use crate::interval::{RepeatRecord, TaxonInterval};

/// Sentinel label for bases not covered by any annotation.
pub const UNANNOTATED: &str = "Unannotated";

/// Which taxonomy column(s) to group coverage by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxonomyLevel {
    /// Repeat class, e.g. `LINE`.
    #[default]
    Class,
    /// Class plus family, rendered as `LINE/L1`.
    Family,
    /// The individual repeat name, e.g. `L1Md_A`.
    Name,
}

impl TaxonomyLevel {
    /// Parse a CLI selector; unknown values fail naming the offender.
    pub fn parse(s: &str) -> Result<Self, TrackError> {
        match s {
            "class" => Ok(TaxonomyLevel::Class),
            "family" => Ok(TaxonomyLevel::Family),
            "name" => Ok(TaxonomyLevel::Name),
            _ => Err(TrackError::InvalidSelector {
                kind: "taxonomy",
                value: s.to_string(),
            }),
        }
    }

    /// Render the taxonomy label for one record at this level.
    pub fn label(&self, record: &RepeatRecord) -> String {
        match self {
            TaxonomyLevel::Class => record.repeat_class.clone(),
            TaxonomyLevel::Family => {
                format!("{}/{}", record.repeat_class, record.repeat_family)
            }
            TaxonomyLevel::Name => record.repeat_name.clone(),
        }
    }

    /// Project records into labeled intervals at this level.
    pub fn intervals(&self, records: &[RepeatRecord]) -> Vec<TaxonInterval> {
        records
            .iter()
            .map(|r| TaxonInterval::new(r.start, r.end, self.label(r)))
            .collect()
    }
}
