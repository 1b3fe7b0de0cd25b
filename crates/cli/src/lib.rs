use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flags::{FilterArgs, SourceArgs};
use model_runs_extractor::ModelRun;
use model_runs_indexer::{
    export_csv, Facets, IndexCache, IndexSource, IndexStats, IndexerConfig, LoadedIndex,
    StaleReason,
};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

mod flags;
mod render;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

#[derive(Parser)]
#[command(name = "model-runs")]
#[command(about = "Index and browse structural model runs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML config file (environment variables still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the run index, reusing a fresh snapshot unless --force
    Index(IndexArgs),

    /// Report whether the snapshot still matches the run tree
    Status(StatusArgs),

    /// List runs matching the filters
    List(ListArgs),

    /// List run folders present in the filtered runs
    Folders(BrowseArgs),

    /// Show detail cards for one run folder
    Show(ShowArgs),

    /// Show the distinct values available for filtering
    Facets(FacetsArgs),

    /// Export filtered runs as CSV
    Export(ExportArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Scan root containing one directory per run folder
    root: PathBuf,

    /// Snapshot file (overrides config and MODEL_RUNS_SNAPSHOT)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Rebuild even when the snapshot is fresh
    #[arg(long)]
    force: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatusArgs {
    /// Scan root containing one directory per run folder
    root: PathBuf,

    /// Snapshot file (overrides config and MODEL_RUNS_SNAPSHOT)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BrowseArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args)]
struct ListArgs {
    #[command(flatten)]
    browse: BrowseArgs,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Run folder to show
    #[arg(value_name = "FOLDER")]
    name: String,

    #[command(flatten)]
    browse: BrowseArgs,
}

#[derive(Args)]
struct FacetsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// CSV file to write
    #[arg(long, short)]
    output: PathBuf,

    /// Text written for absent values (default from config, else empty)
    #[arg(long)]
    empty_marker: Option<String>,

    #[command(flatten)]
    browse: BrowseArgs,
}

#[derive(Serialize)]
struct IndexReport<'a> {
    root: &'a Path,
    snapshot: &'a Path,
    source: IndexSource,
    stale_reasons: &'a [StaleReason],
    stats: &'a IndexStats,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    root: &'a Path,
    snapshot: &'a Path,
    stale: bool,
    reasons: &'a [StaleReason],
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Index(args) => args.json,
        Commands::Status(args) => args.json,
        Commands::List(args) => args.json,
        Commands::Facets(args) => args.json,
        _ => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Index(args) => run_index(args, config).await?,
        Commands::Status(args) => run_status(args, config).await?,
        Commands::List(args) => run_list(args, config).await?,
        Commands::Folders(args) => run_folders(args, config).await?,
        Commands::Show(args) => run_show(args, config).await?,
        Commands::Facets(args) => run_facets(args, config).await?,
        Commands::Export(args) => run_export(args, config).await?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<IndexerConfig> {
    match path {
        Some(path) => IndexerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let config = IndexerConfig::from_env();
            config.validate().context("Invalid configuration")?;
            Ok(config)
        }
    }
}

fn open_cache(
    root: &Path,
    snapshot: Option<PathBuf>,
    config: IndexerConfig,
) -> Result<(IndexCache, PathBuf)> {
    let root = std::fs::canonicalize(root)
        .with_context(|| format!("Run tree {} is not accessible", root.display()))?;
    let snapshot = snapshot.unwrap_or_else(|| config.snapshot_path.clone());
    let cache = IndexCache::new(&root, &snapshot, config).context("Failed to open index")?;
    Ok((cache, root))
}

async fn load_index(source: &SourceArgs, config: IndexerConfig) -> Result<LoadedIndex> {
    let (cache, root) = open_cache(&source.root, source.snapshot.clone(), config)?;
    cache
        .get()
        .await
        .with_context(|| format!("Failed to index {}", root.display()))
}

async fn filtered_rows(args: &BrowseArgs, config: IndexerConfig) -> Result<Vec<ModelRun>> {
    let loaded = load_index(&args.source, config).await?;
    Ok(args.filter.to_filter().apply(&loaded.table))
}

async fn run_index(args: IndexArgs, config: IndexerConfig) -> Result<()> {
    let (cache, root) = open_cache(&args.root, args.snapshot, config)?;
    let loaded = if args.force {
        cache.rebuild().await
    } else {
        cache.get().await
    }
    .with_context(|| format!("Failed to index {}", root.display()))?;

    if args.json {
        return print_json(&IndexReport {
            root: &root,
            snapshot: cache.snapshot_path(),
            source: loaded.source,
            stale_reasons: &loaded.stale_reasons,
            stats: &loaded.stats,
        });
    }

    let source = match loaded.source {
        IndexSource::Memory | IndexSource::Snapshot => "from snapshot",
        IndexSource::Rebuilt => "rebuilt",
    };
    print_stdout(&render::render_stats(&loaded.stats, source))
}

async fn run_status(args: StatusArgs, config: IndexerConfig) -> Result<()> {
    let (cache, root) = open_cache(&args.root, args.snapshot, config)?;
    let assessment = cache
        .status()
        .await
        .with_context(|| format!("Failed to inspect {}", root.display()))?;

    if args.json {
        return print_json(&StatusReport {
            root: &root,
            snapshot: cache.snapshot_path(),
            stale: assessment.stale,
            reasons: &assessment.reasons,
        });
    }
    print_stdout(&render::render_status(&assessment))
}

async fn run_list(args: ListArgs, config: IndexerConfig) -> Result<()> {
    let rows = filtered_rows(&args.browse, config).await?;
    if args.json {
        return print_json(&rows);
    }
    print_stdout(&render::render_rows(&rows))
}

async fn run_folders(args: BrowseArgs, config: IndexerConfig) -> Result<()> {
    let rows = filtered_rows(&args, config).await?;
    print_stdout(&render::render_folders(&rows))
}

async fn run_show(mut args: ShowArgs, config: IndexerConfig) -> Result<()> {
    args.browse.filter.folder = Some(args.name.clone());
    let rows = filtered_rows(&args.browse, config).await?;
    if rows.is_empty() {
        log::warn!("No runs found in folder {}", args.name);
    }
    print_stdout(&render::render_cards(&args.name, &rows))
}

async fn run_facets(args: FacetsArgs, config: IndexerConfig) -> Result<()> {
    let loaded = load_index(&args.source, config).await?;
    let facets = Facets::from_table(&loaded.table);
    if args.json {
        return print_json(&facets);
    }
    print_stdout(&render::render_facets(&facets))
}

async fn run_export(args: ExportArgs, config: IndexerConfig) -> Result<()> {
    let marker = args
        .empty_marker
        .clone()
        .unwrap_or_else(|| config.csv_empty_marker.clone());
    let rows = filtered_rows(&args.browse, config).await?;
    export_csv(&args.output, &rows, &marker)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    print_stdout(&format!(
        "Exported {} runs to {}",
        rows.len(),
        args.output.display()
    ))
}
