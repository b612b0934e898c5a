//! energyseg - Energy / NKS analysis and threshold segmentation

use anyhow::{Context, bail};
use clap::Parser;
use std::path::Path;
use std::process;
use energyseg::{init_logging, signal, AnalysisReport, AnalysisSession, Args, Config};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{}", energyseg::get_library_info());
        println!();
    }

    if let Some(path) = &args.init_config {
        Config::create_default_config(path)?;
        println!("Default config written to {}", path.display());
        return Ok(());
    }

    let config = Config::from_args_and_config(args)?;

    if !config.input_path.exists() {
        bail!("Input file does not exist: {}", config.input_path.display());
    }

    let samples = signal::read_samples(&config.input_path, config.input.max_samples)
        .with_context(|| format!("Failed to load {}", config.input_path.display()))?;
    let signal = config.build_signal(samples)?;

    let mut session = AnalysisSession::load(signal, config.analysis.series_unit)?;
    session.set_threshold(config.threshold())?;
    session.set_segments_enabled(config.analysis.segments_enabled)?;
    session.set_marker_unit(config.marker.unit);
    if let Some(time) = config.marker.time {
        session.set_marker(time)?;
    }

    let report = session.report();
    print_summary(&report, config.verbose());

    if let Some(path) = &config.output_path {
        write_report(&report, path)?;
        println!("Report: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport, verbose: bool) {
    let unit = report.series_unit.abbreviation();

    println!("=== Energy / NKS Analysis ===");
    println!("Samples: {}", report.sample_count);
    println!("Duration: {:.3} ms", report.duration_ms);
    println!("Series unit: {}", report.series_unit);
    println!(
        "Frames: {} x {} samples ({} overlap)",
        report.layout.frame_count, report.layout.frame_len, report.layout.frame_overlap
    );

    if let Some((lo, hi)) = report.energy.range() {
        println!("Energy: {:.6} .. {:.6}", lo, hi);
    }
    if let Some((lo, hi)) = report.nks.range() {
        println!("NKS: {:.6} .. {:.6}", lo, hi);
    }

    match &report.segmentation {
        Some(seg) => {
            println!("Threshold: {}", seg.threshold);
            println!("Boundaries: {}", seg.boundaries.len());
            if verbose {
                for b in &seg.boundaries {
                    println!("  {:.6} {}", b, unit);
                }
            }
        }
        None => println!("Segmentation: off"),
    }

    if let Some(marker) = &report.marker {
        println!(
            "Marker: {} {} -> {:.6} {}",
            marker.value,
            marker.unit.abbreviation(),
            marker.position,
            unit
        );
    }
    println!("=============================");
}

fn write_report(report: &AnalysisReport, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
