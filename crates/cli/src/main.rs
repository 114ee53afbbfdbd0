//! geonear CLI - nearest-neighbor search and interpolation on geodetic points

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array1;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geonear_algorithms::resample::{FieldResampler, InterpolateParams, Method};
use geonear_core::convert::{cartesian_to_geodetic, geodetic_to_cartesian};
use geonear_core::{ConvertOptions, EarthModel};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geonear")]
#[command(author, version, about = "Nearest-neighbor search and interpolation on geodetic points", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resample a scattered field from base points onto query points
    Interpolate {
        /// Base points CSV: lon,lat[,depth],value
        #[arg(short, long)]
        base: PathBuf,

        /// Query points CSV: lon,lat[,depth]
        #[arg(short, long)]
        query: PathBuf,

        /// Output CSV (lon,lat,value); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of neighbors per query point
        #[arg(short = 'k', long = "neighbors", default_value = "4")]
        neighbors: usize,

        /// Neighbor search method: kdtree, balltree
        #[arg(short, long, default_value = "kdtree")]
        method: String,

        /// Earth model for coordinate conversion: ellipsoidal, spherical
        #[arg(long, default_value = "ellipsoidal")]
        earth_model: String,

        /// Exclude neighbors farther than this many meters (kdtree only)
        #[arg(long)]
        max_distance: Option<f64>,

        /// Distance floor for inverse-distance weights
        #[arg(long, default_value = "1e-10")]
        epsilon: f64,
    },
    /// Convert coordinates between geodetic and Cartesian
    Convert {
        /// Input CSV: lon,lat[,depth] for to-cartesian, x,y,z for to-geodetic
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
        /// Conversion direction: to-cartesian, to-geodetic
        #[arg(short, long, default_value = "to-cartesian")]
        direction: String,
        /// Earth model: ellipsoidal, spherical
        #[arg(long, default_value = "ellipsoidal")]
        earth_model: String,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_earth_model(s: &str) -> Result<EarthModel> {
    match s.to_lowercase().as_str() {
        "ellipsoidal" | "wgs84" => Ok(EarthModel::Ellipsoidal),
        "spherical" | "sphere" => Ok(EarthModel::Spherical),
        _ => anyhow::bail!("Unknown earth model: {}. Use ellipsoidal or spherical.", s),
    }
}

/// Read a CSV of numeric rows, skipping blank lines, `#` comments, and an
/// optional single header line. Data rows must all have the same width,
/// between `min_cols` and `max_cols` columns.
fn read_rows(path: &PathBuf, min_cols: usize, max_cols: usize) -> Result<Vec<Vec<f64>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;
    let mut first_line = true;

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = Vec::new();
        let mut numeric = true;
        for field in line.split(',') {
            match field.trim().parse::<f64>() {
                Ok(v) => fields.push(v),
                Err(_) => {
                    numeric = false;
                    break;
                }
            }
        }
        if !numeric {
            // A non-numeric first line is taken as a column header.
            if first_line {
                first_line = false;
                continue;
            }
            anyhow::bail!(
                "{}: line {} is not numeric: {:?}",
                path.display(),
                lineno + 1,
                line
            );
        }
        first_line = false;

        if fields.len() < min_cols || fields.len() > max_cols {
            anyhow::bail!(
                "{}: line {} has {} columns, expected {} to {}",
                path.display(),
                lineno + 1,
                fields.len(),
                min_cols,
                max_cols
            );
        }
        match width {
            Some(w) if fields.len() != w => anyhow::bail!(
                "{}: line {} has {} columns, previous rows had {}",
                path.display(),
                lineno + 1,
                fields.len(),
                w
            ),
            None => width = Some(fields.len()),
            _ => {}
        }
        rows.push(fields);
    }

    if rows.is_empty() {
        anyhow::bail!("{} contains no data rows", path.display());
    }
    Ok(rows)
}

fn column(rows: &[Vec<f64>], idx: usize) -> Vec<f64> {
    rows.iter().map(|r| r[idx]).collect()
}

fn write_field(path: Option<&PathBuf>, query_rows: &[Vec<f64>], values: &Array1<f64>) -> Result<()> {
    let mut out = String::with_capacity(values.len() * 32);
    out.push_str("lon,lat,value\n");
    for (row, value) in query_rows.iter().zip(values.iter()) {
        out.push_str(&format!("{},{},{}\n", row[0], row[1], value));
    }
    match path {
        Some(p) => {
            std::fs::write(p, out).with_context(|| format!("Failed to write {}", p.display()))?
        }
        None => print!("{}", out),
    }
    Ok(())
}

// ─── Commands ───────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run_interpolate(
    base: &PathBuf,
    query: &PathBuf,
    output: Option<&PathBuf>,
    neighbors: usize,
    method: &str,
    earth_model: &str,
    max_distance: Option<f64>,
    epsilon: f64,
) -> Result<()> {
    let method: Method = method.parse()?;
    let model = parse_earth_model(earth_model)?;
    let options = ConvertOptions {
        model,
        ..ConvertOptions::default()
    };

    let base_rows = read_rows(base, 3, 4)?;
    let query_rows = read_rows(query, 2, 3)?;
    info!(
        "Loaded {} base points and {} query points",
        base_rows.len(),
        query_rows.len()
    );

    let mut resampler = FieldResampler::with_options(options);

    let value_col = base_rows[0].len() - 1;
    let base_depths = if value_col == 3 {
        Some(column(&base_rows, 2).into())
    } else {
        None
    };
    resampler.set_base_geodetic(column(&base_rows, 0), column(&base_rows, 1), base_depths)?;
    resampler.set_values(column(&base_rows, value_col))?;

    let query_depths = if query_rows[0].len() == 3 {
        Some(column(&query_rows, 2).into())
    } else {
        None
    };
    resampler.set_query_geodetic(column(&query_rows, 0), column(&query_rows, 1), query_depths)?;

    let pb = spinner("Interpolating...");
    let start = Instant::now();
    let field = resampler.interpolate(&InterpolateParams {
        num_neighbors: neighbors,
        method,
        epsilon,
        max_distance,
    })?;
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    write_field(output, &query_rows, &field)?;
    match output {
        Some(path) => done("Interpolated field", path, elapsed),
        None => info!("Processing time: {:.2?}", elapsed),
    }
    Ok(())
}

fn run_convert(input: &PathBuf, output: &PathBuf, direction: &str, earth_model: &str) -> Result<()> {
    let model = parse_earth_model(earth_model)?;
    let options = ConvertOptions {
        model,
        ..ConvertOptions::default()
    };

    match direction.to_lowercase().as_str() {
        "to-cartesian" | "cartesian" => {
            let rows = read_rows(input, 2, 3)?;
            info!("Loaded {} geodetic points", rows.len());
            let depths = if rows[0].len() == 3 {
                Some(column(&rows, 2).into())
            } else {
                None
            };

            let start = Instant::now();
            let xyz = geodetic_to_cartesian(column(&rows, 0), column(&rows, 1), depths, &options)
                .context("Failed to convert coordinates")?;

            let mut out = String::with_capacity(xyz.nrows() * 48);
            out.push_str("x,y,z\n");
            for row in xyz.rows() {
                out.push_str(&format!("{},{},{}\n", row[0], row[1], row[2]));
            }
            std::fs::write(output, out)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            done("Cartesian coordinates", output, start.elapsed());
        }
        "to-geodetic" | "geodetic" => {
            if model == EarthModel::Ellipsoidal {
                anyhow::bail!(
                    "The inverse conversion is defined for the spherical model only. \
                     Pass --earth-model spherical."
                );
            }
            let rows = read_rows(input, 3, 3)?;
            info!("Loaded {} cartesian points", rows.len());

            let start = Instant::now();
            let (lons, lats, depths) = cartesian_to_geodetic(
                column(&rows, 0),
                column(&rows, 1),
                column(&rows, 2),
                &options,
            )
            .context("Failed to convert coordinates")?;

            let mut out = String::with_capacity(lons.len() * 48);
            out.push_str("lon,lat,depth\n");
            for i in 0..lons.len() {
                out.push_str(&format!("{},{},{}\n", lons[i], lats[i], depths[i]));
            }
            std::fs::write(output, out)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            done("Geodetic coordinates", output, start.elapsed());
        }
        _ => anyhow::bail!(
            "Unknown direction: {}. Use to-cartesian or to-geodetic.",
            direction
        ),
    }
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match &cli.command {
        Commands::Interpolate {
            base,
            query,
            output,
            neighbors,
            method,
            earth_model,
            max_distance,
            epsilon,
        } => run_interpolate(
            base,
            query,
            output.as_ref(),
            *neighbors,
            method,
            earth_model,
            *max_distance,
            *epsilon,
        ),
        Commands::Convert {
            input,
            output,
            direction,
            earth_model,
        } => run_convert(input, output, direction, earth_model),
    }
}
