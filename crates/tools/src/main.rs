use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use levelgen::analysis::CHOKE_MAP_UNSET;
use levelgen::grid::Grid;
use levelgen::{GeneratedLevel, LevelConfig, LevelGenerator, LevelStats};
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 1)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    depth: u32,
    /// TOML file overriding the default level configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
    /// Mark loops, chokepoints and gate sites in ASCII output
    #[arg(short, long)]
    annotate: bool,
    /// Also print the chokepoint-weight map
    #[arg(long)]
    choke_map: bool,
    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct LevelDump<'a> {
    seed: u64,
    depth: u32,
    fingerprint: String,
    stats: &'a LevelStats,
    rows: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    choke_map: Option<Vec<Vec<i32>>>,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: bool) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|error| anyhow!("Failed to install the stderr logger: {error}"))?;
    log::set_max_level(if verbose { LevelFilter::Debug } else { LevelFilter::Warn });
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LevelConfig> {
    let Some(path) = path else {
        return Ok(LevelConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

fn choke_map_rows(grid: &Grid) -> Vec<Vec<i32>> {
    grid.values().chunks(grid.width()).map(<[i32]>::to_vec).collect()
}

/// One character per cell: blank for cells no chokepoint cuts off, otherwise
/// the number of decimal digits in the region weight.
fn render_choke_map(grid: &Grid) -> String {
    let mut out = String::new();
    for row in choke_map_rows(grid) {
        for weight in row {
            let glyph = match weight {
                CHOKE_MAP_UNSET => ' ',
                weight => char::from_digit(weight.max(1).ilog10() + 1, 10).unwrap_or('+'),
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_ascii(level: &GeneratedLevel, annotate: bool, with_choke_map: bool) {
    print!("{}", level.map.render_ascii(annotate));
    if with_choke_map && let Some(choke_map) = &level.choke_map {
        println!();
        print!("{}", render_choke_map(choke_map));
    }
    let stats = &level.stats;
    println!("Seed: {} Depth: {}", level.seed, level.depth);
    println!(
        "Rooms: {} (first: {:?}) Attempts: {} Loops: {} Secret doors: {}",
        stats.placement.rooms_built + 1,
        stats.first_room,
        stats.placement.attempts,
        stats.loops_added,
        stats.secret_doors
    );
    println!(
        "Loop cells: {} Chokepoints: {} Gate sites: {}",
        stats.loop_cells, stats.chokepoints, stats.gate_sites
    );
    println!("Fingerprint: {:016x}", level.fingerprint());
}

fn dump_json(level: &GeneratedLevel, with_choke_map: bool) -> Result<String> {
    let dump = LevelDump {
        seed: level.seed,
        depth: level.depth,
        fingerprint: format!("{:016x}", level.fingerprint()),
        stats: &level.stats,
        rows: level.map.render_ascii(false).lines().map(str::to_owned).collect(),
        choke_map: level.choke_map.as_ref().filter(|_| with_choke_map).map(choke_map_rows),
    };
    serde_json::to_string_pretty(&dump).context("Failed to serialize level JSON")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = load_config(args.config.as_deref())?;
    let generator = LevelGenerator::new(config).context("Invalid level configuration")?;
    let level = generator.generate(args.seed, args.depth);

    match args.format {
        Format::Ascii => print_ascii(&level, args.annotate, args.choke_map),
        Format::Json => println!("{}", dump_json(&level, args.choke_map)?),
    }
    Ok(())
}
