mod error;
mod store;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use error::AppError;
use poem_types::dataset::load_locations;
use poem_types::dynasty::SHARED_DATASET;
use poem_types::geo::validate_coordinates;
use poem_types::{Dynasty, LocationGroup, PoemCursor};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poem_map", about = "Nanjing poem map dataset tool")]
struct Cli {
    /// Directory the deduplicated locations files are written to
    #[arg(long, global = true, env = "POEM_MAP_OUTPUT", default_value = "output")]
    output_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the dynasty pages and their datasets
    Dynasties,
    /// Deduplicate one dataset file → output/<slug>-locations.json
    Load {
        /// Path to a flat or grouped dataset file
        file: PathBuf,
        /// Dynasty slug, e.g. "nantang"
        #[arg(long, conflicts_with = "title")]
        dynasty: Option<Dynasty>,
        /// Page title to pick the dynasty from, e.g. "南唐诗词地图"
        #[arg(long)]
        title: Option<String>,
        /// Treat the file as the mixed all-dynasty dataset
        #[arg(long)]
        shared: bool,
    },
    /// Find every dynasty's dataset under a directory and deduplicate each
    Build {
        #[arg(default_value = ".")]
        data_dir: PathBuf,
    },
    /// Print one poem card of a location
    Show {
        /// A locations file written by `load`/`build`, or any dataset
        locations: PathBuf,
        /// Location name, e.g. "钟山"
        name: String,
        /// Card index; wraps around the location's poem list
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Dynasties => {
            run_dynasties();
            Ok(())
        }
        Command::Load {
            file,
            dynasty,
            title,
            shared,
        } => {
            let dynasty = resolve_dynasty(&file, dynasty, title.as_deref());
            let shared = shared || is_shared_file(&file);
            run_load(&file, dynasty, shared, &cli.output_dir)
        }
        Command::Build { data_dir } => run_build(&data_dir, &cli.output_dir),
        Command::Show {
            locations,
            name,
            index,
        } => run_show(&locations, &name, index),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  DYNASTY RESOLUTION
// ═══════════════════════════════════════════════════════════════════════

/// Explicit slug, then page title, then the dataset's file name, then any
/// dynasty keyword in the path (e.g. a `南唐/` directory).
fn resolve_dynasty(file: &Path, dynasty: Option<Dynasty>, title: Option<&str>) -> Dynasty {
    if let Some(d) = dynasty {
        return d;
    }
    if let Some(t) = title {
        return Dynasty::from_title(t);
    }
    file.file_name()
        .and_then(|n| n.to_str())
        .and_then(store::dynasty_for_file)
        .unwrap_or_else(|| Dynasty::from_title(&file.to_string_lossy()))
}

fn is_shared_file(file: &Path) -> bool {
    file.file_name().is_some_and(|n| n == SHARED_DATASET)
}

// ═══════════════════════════════════════════════════════════════════════
//  DYNASTIES MODE
// ═══════════════════════════════════════════════════════════════════════

fn run_dynasties() {
    for d in Dynasty::ALL {
        let c = d.config();
        println!(
            "{:<8} {:<4} {:<18} {:>2} poets  offsets={:?}  labels={}",
            c.slug,
            c.label,
            c.dataset_file,
            c.poets.len(),
            c.offset_profile,
            c.show_labels
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  LOAD / BUILD MODE
// ═══════════════════════════════════════════════════════════════════════

/// Log coordinates outside the Nanjing area. Returns how many there were.
fn report_coordinates(groups: &[LocationGroup]) -> usize {
    let mut count = 0;
    for group in groups {
        let (_, warning) = validate_coordinates(group.coordinates, &group.name);
        if let Some(w) = warning {
            warn!(location = %w.location, lng = w.coordinates.lng(), lat = w.coordinates.lat(), "{w}");
            count += 1;
        }
    }
    count
}

fn load_dynasty(file: &Path, dynasty: Dynasty, shared: bool) -> Result<Vec<LocationGroup>, AppError> {
    let json = store::read_dataset(file)?;
    let groups = load_locations(&json, dynasty.config(), shared)?;
    let poems: usize = groups.iter().map(|g| g.poem_count()).sum();
    info!(
        dynasty = %dynasty,
        file = %file.display(),
        shared,
        "{}诗歌数据加载成功: {} 个地点, {} 首诗歌",
        dynasty.as_chinese(),
        groups.len(),
        poems
    );
    report_coordinates(&groups);
    Ok(groups)
}

fn run_load(file: &Path, dynasty: Dynasty, shared: bool, output_dir: &Path) -> Result<(), AppError> {
    let groups = load_dynasty(file, dynasty, shared)?;
    let path = store::write_locations(output_dir, dynasty, &groups)?;
    info!("  {}", path.display());
    Ok(())
}

fn run_build(data_dir: &Path, output_dir: &Path) -> Result<(), AppError> {
    let inventory = store::find_datasets(data_dir);
    if inventory.is_empty() {
        return Err(AppError::NothingToBuild(data_dir.to_path_buf()));
    }

    let mut written = 0;
    for dynasty in Dynasty::ALL {
        let Some((file, shared)) = inventory.source_for(dynasty) else {
            warn!(dynasty = %dynasty, "no {} found, skipping", dynasty.config().dataset_file);
            continue;
        };
        let groups = load_dynasty(file, dynasty, shared)?;
        if groups.is_empty() {
            warn!(dynasty = %dynasty, "no locations, skipping");
            continue;
        }
        let path = store::write_locations(output_dir, dynasty, &groups)?;
        info!("  {}", path.display());
        written += 1;
    }

    info!("Wrote {written} locations file(s) to {}", output_dir.display());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  SHOW MODE: one poem card as text
// ═══════════════════════════════════════════════════════════════════════

fn render_card(group: &LocationGroup, cursor: &PoemCursor) -> String {
    let poem = &group.poems[cursor.index()];
    format!(
        "{}  {}\n[{}] 《{}》 作者：{}\n{}",
        group.name,
        group.count_label(),
        cursor.indicator(),
        poem.title,
        poem.author,
        poem.formatted()
    )
}

fn run_show(locations: &Path, name: &str, index: usize) -> Result<(), AppError> {
    let groups = store::read_locations(locations)?;
    let group = groups
        .iter()
        .find(|g| g.name == name)
        .ok_or_else(|| AppError::NoSuchLocation {
            name: name.to_string(),
            path: locations.to_path_buf(),
        })?;

    let cursor = PoemCursor::at(group.poem_count(), index);
    println!("{}", render_card(group, &cursor));
    Ok(())
}
