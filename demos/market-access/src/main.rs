//! `market-access` — city-to-city least-cost distances over a road, rail and
//! sea network.
//!
//! Reads up to three GeoJSON line-string files and a city CSV, builds one
//! multimodal network, snaps cities to it, and writes:
//!
//! - `cost_matrix.csv`: metres between every pair of matched cities
//! - `unmatched.csv`: cities with no network node within the snap radius
//!
//! Run with:
//!   cargo run -p market-access --release -- \
//!       --roads roads.geojson --rails rails.geojson --sea sea.geojson \
//!       --cities cities.csv --out-dir output

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info};

use ma_core::{LineString, NetworkConfig, TransportMode};
use ma_network::{CityNodeMatcher, CostMatrixEngine, NetworkBuilder};

/// Command-line interface for market-access
#[derive(Parser)]
#[command(name = "market-access")]
#[command(about = "Least-cost city-to-city distances over a multimodal transport network")]
struct Cli {
    /// GeoJSON file of road line strings
    #[arg(long)]
    roads: Option<PathBuf>,

    /// GeoJSON file of rail line strings
    #[arg(long)]
    rails: Option<PathBuf>,

    /// GeoJSON file of sea route line strings
    #[arg(long)]
    sea: Option<PathBuf>,

    /// City table with size,name,longitude,latitude columns
    #[arg(long)]
    cities: PathBuf,

    /// Directory for cost_matrix.csv and unmatched.csv
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Maximum distance in metres between a city and its network node
    #[arg(long, default_value_t = NetworkConfig::default().snap_distance_m)]
    snap_distance_m: f64,

    /// Decimal digits kept when merging coincident vertices
    #[arg(long, default_value_t = NetworkConfig::default().coord_precision)]
    precision: u8,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> NetworkConfig {
        NetworkConfig {
            coord_precision: self.precision,
            snap_distance_m: self.snap_distance_m,
        }
    }

    fn inputs(&self) -> Vec<(TransportMode, &Path)> {
        [
            (TransportMode::Road, &self.roads),
            (TransportMode::Rail, &self.rails),
            (TransportMode::Sea, &self.sea),
        ]
        .into_iter()
        .filter_map(|(mode, path)| path.as_deref().map(|p| (mode, p)))
        .collect()
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate().context("invalid configuration")?;

    let inputs = cli.inputs();
    if inputs.is_empty() {
        bail!("at least one of --roads, --rails, --sea is required");
    }

    // ── Load ──────────────────────────────────────────────────────────────
    let t0 = Instant::now();
    let mut collections: Vec<(TransportMode, Vec<LineString>)> = Vec::with_capacity(inputs.len());
    for (mode, path) in inputs {
        let lines = ma_io::load_line_strings(path)
            .with_context(|| format!("loading {mode} network from {}", path.display()))?;
        collections.push((mode, lines));
    }
    let cities = ma_io::load_cities(&cli.cities)
        .with_context(|| format!("loading cities from {}", cli.cities.display()))?;
    info!("inputs loaded in {:.3} s", t0.elapsed().as_secs_f64());

    // ── Build network ─────────────────────────────────────────────────────
    let t1 = Instant::now();
    let mut builder = NetworkBuilder::new(&config)?;
    for (mode, lines) in &collections {
        builder.add_line_strings(*mode, lines);
    }
    drop(collections);
    let network = builder.build();
    info!("network built in {:.3} s", t1.elapsed().as_secs_f64());

    // ── Match + matrix ────────────────────────────────────────────────────
    let t2 = Instant::now();
    let matches = CityNodeMatcher::from_config(&config)?.match_cities(&network, &cities);
    let matrix = CostMatrixEngine::new(&network).compute(&matches)?;
    info!("cities matched and matrix computed in {:.3} s", t2.elapsed().as_secs_f64());

    // ── Write ─────────────────────────────────────────────────────────────
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    ma_io::write_cost_matrix(&cli.out_dir.join("cost_matrix.csv"), &cities, &matrix)?;
    ma_io::write_unmatched(&cli.out_dir.join("unmatched.csv"), &cities, &matches.unmatched)?;

    info!(
        "done: {} nodes, {} edges, {}/{} cities matched, {} reachable ordered pairs",
        network.node_count(),
        network.edge_count(),
        matches.matched.len(),
        cities.len(),
        matrix.reachable_pairs(),
    );
    Ok(())
}
