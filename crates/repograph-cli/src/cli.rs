//! CLI definition and command dispatch.
//!
//! ## Configuration Precedence
//!
//! 1. CLI flags (e.g., `--config`, `--device`, `-k`)
//! 2. Environment variables (`REPOGRAPH_CONFIG`, `REPOGRAPH_DEVICE`)
//! 3. Config file (`~/.repograph/config.yaml` or `--config` path)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use repograph_core::{
    build_graph, build_indexes, graph_dir, index_dir_for_kind, index_root, retrieve,
    RepographConfig, DATA_DIR, EMBEDDED_KINDS,
};
use repograph_db::{GraphStore, IndexBundle};
use repograph_model::{create_embedding_model, DevicePreference, EmbeddingConfig};

// ============================================================================
// CLI Definition
// ============================================================================

/// Repository knowledge graph and semantic retrieval engine
#[derive(Parser, Debug)]
#[command(name = "repograph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "REPOGRAPH_VERBOSE")]
    pub verbose: bool,

    /// Repository root to operate on
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Path to configuration file (default: ~/.repograph/config.yaml)
    #[arg(long, global = true, env = "REPOGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Device preference for embedding inference (auto/gpu/cpu)
    #[arg(long, global = true, env = "REPOGRAPH_DEVICE")]
    pub device: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the repository and build the code graph
    #[command(after_help = r#"EXAMPLES:
    # Build the graph for the current directory
    repograph build

    # Build for another repository
    repograph -C ../myproject build
"#)]
    Build,

    /// Embed stored entity names and build the per-kind vector indexes
    #[command(after_help = r#"EXAMPLES:
    # Build indexes after `repograph build`
    repograph embed
"#)]
    Embed,

    /// Retrieve merged graph and vector context for a query
    #[command(after_help = r#"EXAMPLES:
    # Default per-kind result count
    repograph query "parse input"

    # Ask for five nearest neighbors per kind
    repograph query -k 5 "http handler"
"#)]
    Query {
        /// The free-text query
        text: String,

        /// Per-kind result count for vector search
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show graph counts and index presence
    Status,
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, dispatch, and map errors to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    let config = RepographConfig::load_or_default(cli.config.as_deref())?;
    let data_dir = cli.repo.join(DATA_DIR);

    match &cli.command {
        Command::Build => cmd_build(&cli.repo, &data_dir),
        Command::Embed => cmd_embed(cli, &config, &data_dir),
        Command::Query { text, top_k } => {
            let top_k = top_k.unwrap_or(config.retrieval.top_k);
            cmd_query(cli, &config, &data_dir, text, top_k)
        }
        Command::Status => cmd_status(&data_dir),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_build(repo: &Path, data_dir: &Path) -> anyhow::Result<()> {
    let mut store = GraphStore::open(graph_dir(data_dir))?;
    let summary = build_graph(repo, &mut store)?;
    store.flush()?;

    println!(
        "{} {} directories, {} files, {} new entities",
        "indexed".green(),
        summary.directories,
        summary.files,
        summary.entities_created
    );
    if summary.skipped_files > 0 {
        println!(
            "{} {} file(s) skipped:",
            "warning:".yellow(),
            summary.skipped_files
        );
        for warning in &summary.warnings {
            println!("  {}", warning);
        }
    }
    println!(
        "graph: {} nodes, {} edges",
        store.node_count(),
        store.edge_count()
    );
    Ok(())
}

fn cmd_embed(cli: &Cli, config: &RepographConfig, data_dir: &Path) -> anyhow::Result<()> {
    let store = GraphStore::open(graph_dir(data_dir))?;
    let model = load_model(cli, config)?;

    let report = build_indexes(&store, model.as_ref(), &index_root(data_dir));
    for built in &report.built {
        println!(
            "{} {} index: {} names",
            "built".green(),
            built.kind.label(),
            built.rows
        );
    }
    for failed in &report.failed {
        println!(
            "{} {} index: {}",
            "failed".red(),
            failed.kind.label(),
            failed.reason
        );
    }

    if report.built.is_empty() {
        anyhow::bail!("no index could be built; run `repograph build` first");
    }
    Ok(())
}

fn cmd_query(
    cli: &Cli,
    config: &RepographConfig,
    data_dir: &Path,
    text: &str,
    top_k: usize,
) -> anyhow::Result<()> {
    let store = GraphStore::open(graph_dir(data_dir))?;
    let model = load_model(cli, config)?;

    let context = retrieve(&store, model.as_ref(), &index_root(data_dir), text, top_k);
    print!("{}", context.render());
    Ok(())
}

fn cmd_status(data_dir: &Path) -> anyhow::Result<()> {
    let store = GraphStore::open(graph_dir(data_dir))?;
    println!(
        "graph: {} nodes, {} edges",
        store.node_count(),
        store.edge_count()
    );

    let index_root = index_root(data_dir);
    for &kind in EMBEDDED_KINDS {
        let dir = index_dir_for_kind(&index_root, kind);
        match IndexBundle::load(&dir) {
            Ok(bundle) => println!(
                "index {}: {} rows (model {})",
                kind.label(),
                bundle.len(),
                bundle.meta.model_id
            ),
            Err(e) => println!("index {}: {}", kind.label(), e),
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn load_model(
    cli: &Cli,
    config: &RepographConfig,
) -> anyhow::Result<Box<dyn repograph_model::EmbeddingModel>> {
    let device = match &cli.device {
        Some(flag) => flag
            .parse::<DevicePreference>()
            .map_err(anyhow::Error::msg)?,
        None => config.embedding.device,
    };

    let embedding_config =
        EmbeddingConfig::for_model(config.embedding.model_id.clone()).with_device(device);

    create_embedding_model(&embedding_config)
        .with_context(|| format!("loading embedding model '{}'", config.embedding.model_id))
}
