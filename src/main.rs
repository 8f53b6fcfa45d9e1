use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use roadpoints::boundary::{self, Boundary};
use roadpoints::config::{FileConfig, OverpassConfig, SampleConfig};
use roadpoints::output;
use roadpoints::pipeline;

/// Sample roadside field points along OpenStreetMap road networks
///
/// Examples:
///   # Sample every boundary in a GeoJSON file
///   roadpoints sample -b districts.geojson -o road_points/
///
///   # Wider field offset, coarser sampling
///   roadpoints sample -b districts.geojson -o out/ --field-offset 50 --step 0.0005
///
///   # Resume a batch from the 8th polygon
///   roadpoints sample -b districts.geojson -o out/ --start-index 7
///
///   # Thin an output table to every 4th row
///   roadpoints thin out/road_points_0.csv
#[derive(Parser, Debug)]
#[command(name = "roadpoints")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query roads for each boundary polygon and write road/field point tables
    Sample(SampleArgs),
    /// Keep every Nth row of a CSV table, in place
    Thin {
        /// Table to thin
        file: PathBuf,
        /// Keep one row out of every N
        #[arg(long, default_value = "4")]
        stride: usize,
    },
    /// Split a CSV table into fixed-size chunks
    Split {
        /// Table to split
        file: PathBuf,
        /// Maximum data rows per chunk
        #[arg(long, default_value = "300000")]
        chunk_size: usize,
        /// Directory for the chunk files (defaults to the table's directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Rename the first two columns of a CSV table to y, x
    RenameCols {
        /// Table to fix up
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Path to config file (optional, auto-searches roadpoints.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GeoJSON file with boundary polygons
    #[arg(short = 'b', long)]
    boundaries: Option<PathBuf>,

    /// Directory for the per-polygon output tables
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Skip boundaries before this index (resume support)
    #[arg(long, default_value = "0")]
    start_index: usize,

    /// Densification step along each road, in coordinate degrees
    #[arg(long, default_value = "0.0001")]
    step: f64,

    /// Perpendicular field-point offset in meters
    #[arg(long, default_value = "30.0")]
    field_offset: f64,

    /// Spherical Earth radius in meters
    #[arg(long, default_value = "6371000.0")]
    earth_radius: f64,

    /// Boundary simplification tolerance in degrees
    #[arg(long, default_value = "0.001")]
    simplify_tolerance: f64,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Sample(args) => run_sample(args),
        Command::Thin { file, stride } => {
            output::thin_rows(&file, stride)?;
            println!("Thinned {} to every {}th row", file.display(), stride);
            Ok(())
        }
        Command::Split {
            file,
            chunk_size,
            out_dir,
        } => {
            let out_dir = out_dir
                .or_else(|| file.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));
            let written = output::split_table(&file, chunk_size, &out_dir)?;
            println!("Wrote {} chunks to {}", written.len(), out_dir.display());
            Ok(())
        }
        Command::RenameCols { file } => {
            output::rename_coordinate_columns(&file)?;
            println!("Renamed coordinate columns in {}", file.display());
            Ok(())
        }
    }
}

fn run_sample(args: SampleArgs) -> Result<()> {
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };

    let boundaries_path = args
        .boundaries
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.boundaries.clone()));
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("road_points"));
    let start_index = if args.start_index != 0 {
        args.start_index
    } else {
        file_config.as_ref().map(|c| c.start_index).unwrap_or(0)
    };
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);

    let sample_config = SampleConfig {
        earth_radius_m: pick_value(
            args.earth_radius,
            6_371_000.0,
            file_config.as_ref().map(|c| c.earth_radius_m),
        ),
        densify_step_degrees: pick_value(
            args.step,
            0.0001,
            file_config.as_ref().map(|c| c.densify_step_degrees),
        ),
        field_offset_m: pick_value(
            args.field_offset,
            30.0,
            file_config.as_ref().map(|c| c.field_offset_m),
        ),
        simplify_tolerance_degrees: pick_value(
            args.simplify_tolerance,
            0.001,
            file_config.as_ref().map(|c| c.simplify_tolerance_degrees),
        ),
    };

    let overpass_config = file_config
        .as_ref()
        .and_then(|c| c.overpass.clone())
        .unwrap_or_default();

    let Some(boundaries_path) = boundaries_path else {
        bail!("Must provide a boundary file via --boundaries/-b or the config file");
    };

    println!("roadpoints - Road-Side Field Point Sampler");
    println!("==========================================");
    println!();

    if verbose {
        print_configuration(
            &boundaries_path,
            &output_dir,
            start_index,
            &sample_config,
            &overpass_config,
        );
    }

    let boundaries = boundary::load_boundaries(&boundaries_path)
        .context("Failed to load boundary polygons")?;
    println!(
        "Loaded {} boundary polygons from {}",
        boundaries.len(),
        boundaries_path.display()
    );

    std::fs::create_dir_all(&output_dir)
        .context(format!("Failed to create output directory: {:?}", output_dir))?;

    let mut total_records = 0usize;
    let mut failed_polygons = 0usize;

    for (idx, boundary) in boundaries.iter().enumerate() {
        if idx < start_index {
            continue;
        }

        let label = boundary_label(boundary, idx);
        let spinner = create_spinner(&format!("Processing {}...", label));
        let start = Instant::now();

        let batch =
            match pipeline::process_polygon(&boundary.rings, &sample_config, &overpass_config) {
                Ok(batch) => batch,
                Err(e) => {
                    // Skip this polygon, keep the batch going
                    spinner.finish_with_message(format!("{}: query failed ({})", label, e));
                    failed_polygons += 1;
                    continue;
                }
            };

        let out_path = output_dir.join(format!("road_points_{}.csv", idx));
        output::write_records(&out_path, &batch.records)
            .context(format!("Failed to write output for {}", label))?;
        total_records += batch.records.len();

        spinner.finish_with_message(format!(
            "{}: {} records, {} ways skipped, {} ways failed [{:.1}s]",
            label,
            batch.records.len(),
            batch.skipped.len(),
            batch.failures.len(),
            start.elapsed().as_secs_f32()
        ));

        if verbose {
            for (way_id, reason) in &batch.skipped {
                println!("  skipped way {}: {}", way_id, reason);
            }
        }
        for failure in &batch.failures {
            eprintln!("  {}: way {} failed: {}", label, failure.way_id, failure.error);
        }
    }

    println!();
    println!(
        "Done! {} records across {} polygons ({} polygons failed). Total time: {:.1}s",
        total_records,
        boundaries.len().saturating_sub(start_index),
        failed_polygons,
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_dir.display());

    Ok(())
}

/// CLI value wins when it differs from the flag default; otherwise fall back
/// to the config file, then the default itself
fn pick_value(cli_value: f64, default: f64, file_value: Option<f64>) -> f64 {
    if (cli_value - default).abs() > f64::EPSILON {
        cli_value
    } else {
        file_value.unwrap_or(default)
    }
}

fn boundary_label(boundary: &Boundary, idx: usize) -> String {
    match &boundary.name {
        Some(name) => format!("polygon {} ({})", idx, name),
        None => format!("polygon {}", idx),
    }
}

fn print_configuration(
    boundaries_path: &std::path::Path,
    output_dir: &std::path::Path,
    start_index: usize,
    sample: &SampleConfig,
    overpass: &OverpassConfig,
) {
    println!("Configuration:");
    println!("  Boundaries: {}", boundaries_path.display());
    println!("  Output dir: {}", output_dir.display());
    println!("  Start index: {}", start_index);
    println!("  Densify step: {} degrees", sample.densify_step_degrees);
    println!("  Field offset: {}m", sample.field_offset_m);
    println!("  Earth radius: {}m", sample.earth_radius_m);
    println!(
        "  Simplify tolerance: {} degrees",
        sample.simplify_tolerance_degrees
    );
    println!("  Overpass mirrors: {}", overpass.urls.len());
    println!("  Overpass timeout: {}s", overpass.timeout_secs);
    println!();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
