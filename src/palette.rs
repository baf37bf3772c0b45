//! Deterministic category colors.
//!
//! Colors exist so a downstream plotter can render the same taxonomy with
//! the same color across tracks and figures. Assignment is a pure
//! function of the category set: sort, then walk a fixed palette.

use std::io::{self, Write};

use rustc_hash::FxHashMap;

use crate::taxonomy::UNANNOTATED;

/// The fixed color for unannotated bases (just off white).
pub const UNANNOTATED_COLOR: &str = "#E6E6E6";

/// matplotlib's tab20 palette, the de facto categorical default.
const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728",
    "#ff9896", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2",
    "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Assign a color to each category, plus the `Unannotated` sentinel.
///
/// Categories are deduplicated and sorted before assignment, so the
/// mapping is independent of input order. Palettes wrap around when there
/// are more than 20 categories.
pub fn make_color_map<S: AsRef<str>>(categories: &[S]) -> FxHashMap<String, &'static str> {
    let mut sorted: Vec<&str> = categories.iter().map(|c| c.as_ref()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut map: FxHashMap<String, &'static str> = FxHashMap::default();
    for (i, cat) in sorted.into_iter().enumerate() {
        map.insert(cat.to_string(), PALETTE[i % PALETTE.len()]);
    }
    map.insert(UNANNOTATED.to_string(), UNANNOTATED_COLOR);
    map
}

/// Write a color map as a TSV table, categories sorted, sentinel last.
pub fn write_color_map<W: Write>(
    writer: &mut W,
    colors: &FxHashMap<String, &'static str>,
) -> io::Result<()> {
    let mut labels: Vec<&String> = colors.keys().filter(|k| *k != UNANNOTATED).collect();
    labels.sort();

    writeln!(writer, "taxonomy\tcolor")?;
    for label in labels {
        writeln!(writer, "{}\t{}", label, colors[label])?;
    }
    if let Some(color) = colors.get(UNANNOTATED) {
        writeln!(writer, "{}\t{}", UNANNOTATED, color)?;
    }
    Ok(())
}
