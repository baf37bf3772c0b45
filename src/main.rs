//! rmtrack: repeat-annotation track binning for assembly diagnostics.
//!
//! Usage: rmtrack <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

use rmtrack::agp;
use rmtrack::annot;
use rmtrack::coverage::{self, BinStrategy};
use rmtrack::depth::{self, DepthStatistic};
use rmtrack::error::Result;
use rmtrack::normalize;
use rmtrack::palette;
use rmtrack::region::Region;
use rmtrack::taxonomy::TaxonomyLevel;

#[derive(Parser)]
#[command(name = "rmtrack")]
#[command(version)]
#[command(about = "Repeat-annotation track binning and coverage accounting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a RepeatMasker .out file into a canonical TSV table
    Normalize {
        /// Raw RepeatMasker .out file
        #[arg(long = "rm-out")]
        rm_out: PathBuf,

        /// Output TSV path
        #[arg(short, long)]
        out: PathBuf,

        /// Strain label to attach to every record
        #[arg(short, long)]
        strain: String,

        /// Keep only this contig
        #[arg(short, long)]
        contig: Option<String>,
    },

    /// Bin repeat annotations into per-bin coverage records
    Bin {
        /// Normalized repeat table (output of `rmtrack normalize`)
        #[arg(long)]
        rm: PathBuf,

        /// Region to analyze: contig or contig:start-end
        #[arg(short, long)]
        region: String,

        /// Taxonomy level to group by
        #[arg(short, long, default_value = "class")]
        taxonomy: String,

        /// Attribution strategy
        #[arg(long, default_value = "dominant")]
        strategy: String,

        /// Bin size in bp
        #[arg(short, long = "bin-size")]
        bin_size: u64,

        /// Output TSV path
        #[arg(short, long)]
        out: PathBuf,

        /// Also write a taxonomy->color table to this path
        #[arg(long)]
        colors: Option<PathBuf>,
    },

    /// Bin samtools-depth output into smoothed depth values
    DepthBin {
        /// samtools depth TSV (chrom, pos, depth)
        #[arg(short, long)]
        depth: PathBuf,

        /// Region to analyze: contig or contig:start-end
        #[arg(short, long)]
        region: String,

        /// Bin size in bp
        #[arg(short, long = "bin-size", default_value = "10000")]
        bin_size: u64,

        /// Aggregation statistic: mean, median, or sum
        #[arg(short, long, default_value = "mean")]
        statistic: String,

        /// Output TSV path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Lay out AGP W components as layered, region-clipped segments
    AgpTrack {
        /// AGP 2.0 file
        #[arg(short, long)]
        agp: PathBuf,

        /// Region to analyze: contig or contig:start-end
        #[arg(short, long)]
        region: String,

        /// Output TSV path
        #[arg(short, long)]
        out: PathBuf,

        /// Keep file coordinates instead of rebasing to the region start
        #[arg(long)]
        no_rebase: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            rm_out,
            out,
            strain,
            contig,
        } => run_normalize(rm_out, out, strain, contig),

        Commands::Bin {
            rm,
            region,
            taxonomy,
            strategy,
            bin_size,
            out,
            colors,
        } => run_bin(rm, region, taxonomy, strategy, bin_size, out, colors),

        Commands::DepthBin {
            depth,
            region,
            bin_size,
            statistic,
            out,
        } => run_depth_bin(depth, region, bin_size, statistic, out),

        Commands::AgpTrack {
            agp,
            region,
            out,
            no_rebase,
        } => run_agp_track(agp, region, out, no_rebase),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_normalize(
    rm_out: PathBuf,
    out: PathBuf,
    strain: String,
    contig: Option<String>,
) -> Result<()> {
    let mut records = normalize::read_rm_out(&rm_out, &strain)?;
    if let Some(contig) = contig {
        records.retain(|r| r.chrom == contig);
    }

    let mut writer = BufWriter::new(File::create(&out)?);
    normalize::write_repeats(&mut writer, &records)?;
    writer.flush()?;
    Ok(())
}

fn run_bin(
    rm: PathBuf,
    region: String,
    taxonomy: String,
    strategy: String,
    bin_size: u64,
    out: PathBuf,
    colors: Option<PathBuf>,
) -> Result<()> {
    let region: Region = region.parse()?;
    let level = TaxonomyLevel::parse(&taxonomy)?;
    let strategy = BinStrategy::parse(&strategy)?;

    let records = annot::load_contig(&rm, &region.contig)?;
    let records = region.subset_repeats(&records);
    let intervals = level.intervals(&records);

    let binned = strategy.bin(bin_size, &intervals)?;

    let mut writer = BufWriter::new(File::create(&out)?);
    coverage::write_coverage(&mut writer, &binned)?;
    writer.flush()?;

    if let Some(colors_path) = colors {
        let labels: Vec<&str> = intervals.iter().map(|iv| iv.taxon.as_str()).collect();
        let map = palette::make_color_map(&labels);
        let mut writer = BufWriter::new(File::create(&colors_path)?);
        palette::write_color_map(&mut writer, &map)?;
        writer.flush()?;
    }

    Ok(())
}

fn run_depth_bin(
    depth_path: PathBuf,
    region: String,
    bin_size: u64,
    statistic: String,
    out: PathBuf,
) -> Result<()> {
    let region: Region = region.parse()?;
    let statistic = DepthStatistic::parse(&statistic)?;

    let records = depth::read_depth(&depth_path)?;
    let subset = depth::subset_depth(&records, &region);
    let bins = depth::bin_depth(&subset, bin_size, statistic)?;

    let mut writer = BufWriter::new(File::create(&out)?);
    depth::write_depth_bins(&mut writer, &bins)?;
    writer.flush()?;
    Ok(())
}

fn run_agp_track(
    agp_path: PathBuf,
    region: String,
    out: PathBuf,
    no_rebase: bool,
) -> Result<()> {
    let region: Region = region.parse()?;

    let rows = agp::read_agp(&agp_path)?;
    let subset = agp::subset_agp(&rows, &region);
    let layers = agp::component_layers(&subset, &region, !no_rebase);

    let mut writer = BufWriter::new(File::create(&out)?);
    agp::write_layers(&mut writer, &layers)?;
    writer.flush()?;
    Ok(())
}
