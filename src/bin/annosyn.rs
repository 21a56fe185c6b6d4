use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;

use annosyn::cli;
use annosyn::config::RunConfig;
use annosyn::feature::FeatureRecord;
use annosyn::region::{GenomeRegion, parse_region_list};
use annosyn::sequence::mask_to_string;
use annosyn::store::AnnotationStore;

#[derive(Parser)]
#[command(
    name = "annosyn",
    about = "Report gene-model features and synonymous sites over genomic regions"
)]
struct Cli {
    /// GTF annotation (plain or gzip)
    #[arg(short = 'g', long = "gtf")]
    gtf: Option<PathBuf>,

    /// Reference FASTA (plain or gzip)
    #[arg(short = 'r', long = "ref")]
    reference: Option<PathBuf>,

    /// Regions of interest, comma separated (chr, chr:pos or chr:start-end)
    #[arg(short = 'i', long = "intervals")]
    intervals: Option<String>,

    /// File with one region per line
    #[arg(short = 'I', long = "interval-list")]
    interval_list: Option<PathBuf>,

    /// JSON run configuration; command-line flags take precedence
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print per-base degeneracy masks for CDS features
    #[arg(long = "masks")]
    masks: bool,
}

/// Merge the config file (if any) with command-line flags.
fn resolve_config(args: &Cli) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(gtf) = &args.gtf {
        config.annotation = gtf.clone();
    }
    if let Some(reference) = &args.reference {
        config.reference = reference.clone();
    }
    if let Some(list) = &args.interval_list {
        config.region_list = Some(list.clone());
    }

    if config.annotation.as_os_str().is_empty() || config.reference.as_os_str().is_empty() {
        bail!("both a GTF annotation (-g) and a reference FASTA (-r) are required");
    }
    Ok(config)
}

/// Regions from `-i` keep their raw comma list so that `chr1:1,000-2,000`
/// parses as one region.
fn resolve_regions(args: &Cli, config: &RunConfig) -> Result<Option<Vec<GenomeRegion>>> {
    let Some(intervals) = &args.intervals else {
        return config.resolve_regions();
    };
    let mut regions = parse_region_list(intervals)
        .with_context(|| format!("invalid intervals: '{intervals}'"))?;
    let list_only = RunConfig {
        regions: Vec::new(),
        ..config.clone()
    };
    if let Some(extra) = list_only.resolve_regions()? {
        regions.extend(extra);
    }
    Ok(Some(regions))
}

fn write_record<W: Write>(out: &mut W, record: &FeatureRecord, masks: bool) -> io::Result<()> {
    writeln!(out, "{record}")?;
    if !masks {
        return Ok(());
    }
    if let Some(mask) = record.mask() {
        for (offset, &bits) in mask.as_slice().iter().enumerate() {
            writeln!(
                out,
                "\t{}\t{}",
                record.start + offset as u32,
                mask_to_string(bits)
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let start = Instant::now();
    let args = Cli::parse();

    cli::banner("Synonymous Sites");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = resolve_config(&args)?;
    let Some(regions) = resolve_regions(&args, &config)? else {
        bail!("no regions given; use -i, -I or the config file");
    };

    cli::kv("Annotation", &config.annotation.display().to_string());
    cli::kv("Reference", &config.reference.display().to_string());
    cli::kv("Regions", &regions.len().to_string());
    eprintln!();

    // ── Loading ──────────────────────────────────────────
    cli::section("Loading");

    let mut store = AnnotationStore::from_paths(
        &config.annotation,
        &config.reference,
        Some(regions.as_slice()),
    )
    .context("failed to open annotation store")?;
    cli::load_stats(&store.stats());
    eprintln!();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut reported = 0usize;
    for region in &regions {
        let records = store
            .search(&region.chrom, region.start, region.end)
            .with_context(|| format!("failed to search {region}"))?;
        if records.is_empty() {
            cli::warning(&format!("{region}: no features"));
        }
        for record in &records {
            write_record(&mut out, record, args.masks)?;
        }
        reported += records.len();
    }
    out.flush()?;

    cli::success(&format!(
        "{reported} features over {} region(s)",
        regions.len()
    ));

    cli::print_summary(start);
    Ok(())
}
