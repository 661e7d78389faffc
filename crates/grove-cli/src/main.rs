//! Grove CLI - behavior tree checker and runner.
//!
//! - `grove check <file>` - parse a tree file and print its structure
//! - `grove run <file>` - tick a tree with the built-in leaves
//! - `grove nodes` - list the leaf names a tree file can use

mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use grove_bt::{BehaviorTree, LeafKind, NodeRegistry, NodeSnapshot};
use grove_core::{Blackboard, Status};
use grove_tools::TracingSink;

use crate::config::RunConfig;

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "Parse, inspect and run behavior trees", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a tree file and print its structure
    Check {
        /// Tree source file
        file: PathBuf,

        /// Print a JSON snapshot instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Run a tree with the built-in leaves
    Run {
        /// Tree source file
        file: PathBuf,

        /// Override the configured tick limit
        #[arg(long)]
        ticks: Option<u64>,

        /// Run configuration (defaults to grove.yaml beside the tree file)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List registered action and condition names
    Nodes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let registry = NodeRegistry::with_builtins();

    match cli.command {
        Commands::Check { file, json } => check_tree(&file, &registry, json),
        Commands::Run {
            file,
            ticks,
            config,
        } => run_tree(&file, &registry, ticks, config.as_deref()),
        Commands::Nodes => {
            list_nodes(&registry);
            Ok(())
        }
    }
}

fn load_tree(file: &Path, registry: &NodeRegistry) -> Result<Box<dyn grove_bt::Node>> {
    grove_dsl::parse_file(file, registry, &mut TracingSink)
        .with_context(|| format!("Failed to parse {}", file.display()))
}

fn check_tree(file: &Path, registry: &NodeRegistry, json: bool) -> Result<()> {
    let root = load_tree(file, registry)?;
    let snapshot = NodeSnapshot::capture(root.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", snapshot.render_outline());
        println!();
        println!("{} nodes", snapshot.node_count());
    }
    Ok(())
}

fn run_tree(
    file: &Path,
    registry: &NodeRegistry,
    ticks: Option<u64>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = RunConfig::discover(file, config_path)?;
    let max_ticks = ticks.unwrap_or(config.max_ticks);
    let root = load_tree(file, registry)?;

    tracing::info!(tree = %file.display(), max_ticks, "Starting run");

    let mut blackboard = Blackboard::new();
    config.seed(&mut blackboard);

    let mut tree = BehaviorTree::with_system_clock(root);
    let interval = Duration::from_millis(config.tick_interval_ms);
    let mut status = Status::Running;

    for _ in 0..max_ticks {
        status = tree.tick(&mut blackboard);
        tracing::debug!(tick = tree.tick_count(), %status, "tick");
        if config.stop_on_terminal && status.is_terminal() {
            break;
        }
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    tracing::info!(ticks = tree.tick_count(), %status, "Run finished");
    println!("{status} after {} ticks", tree.tick_count());
    Ok(())
}

fn list_nodes(registry: &NodeRegistry) {
    println!("Actions:");
    for name in registry.names(LeafKind::Action) {
        println!("  {name}");
    }
    println!();
    println!("Conditions:");
    for name in registry.names(LeafKind::Condition) {
        println!("  {name}");
    }
    let nodes = registry.node_names();
    if !nodes.is_empty() {
        println!();
        println!("Nodes:");
        for name in nodes {
            println!("  {name}");
        }
    }
}
