//! spacemap - where did the disk space go?
//!
//! Usage:
//!   spacemap [PATH]            Scan and print the largest entries
//!   spacemap scan [PATH]       Same, with display options
//!   spacemap export [PATH]     Export the tree to JSON
//!   spacemap --help            Show help

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use tracing::Level;

use spacemap_core::{ScanConfig, SpaceTree, TreeNode};
use spacemap_scan::SpaceScanner;

#[derive(Parser)]
#[command(
    name = "spacemap",
    version,
    about = "Mount-aware disk usage breakdown",
    long_about = "spacemap walks a directory tree without leaving its filesystem and \
                  reports how many bytes each directory holds.\n\n\
                  Run `spacemap [PATH]` for a quick overview, or use the subcommands \
                  for display options and JSON export."
)]
struct Cli {
    /// Path to analyze (defaults to the filesystem root)
    #[arg(default_value = "/")]
    path: PathBuf,

    /// Read mounts from this file instead of the system mount table
    #[arg(long, global = true)]
    mounts: Option<PathBuf>,

    /// Increase log output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan and print the largest entries
    Scan {
        /// Path to scan
        #[arg(default_value = "/")]
        path: PathBuf,

        /// Maximum depth to display
        #[arg(short, long, default_value = "3")]
        depth: u32,

        /// Show all entries (no depth limit on display)
        #[arg(short, long)]
        all: bool,

        /// Number of top entries to show per directory
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },

    /// Export the analyzed tree to JSON
    Export {
        /// Path to scan
        #[arg(default_value = "/")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Command::Scan {
            path,
            depth,
            all,
            top,
        }) => {
            run_scan(&path, cli.mounts, if all { None } else { Some(depth) }, top)?;
        }
        Some(Command::Export { path, output }) => {
            run_export(&path, cli.mounts, output)?;
        }
        None => {
            run_scan(&cli.path, cli.mounts, Some(1), 10)?;
        }
    }

    Ok(())
}

/// Route log output to stderr at the requested verbosity.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a full analysis of `path`.
fn analyze(path: &PathBuf, mounts: Option<PathBuf>) -> Result<SpaceTree> {
    let config = ScanConfig::builder()
        .root(path.clone())
        .mount_table(mounts)
        .build()
        .context("Invalid configuration")?;

    let scanner = SpaceScanner::new();
    scanner.scan(&config).context("Analysis failed")
}

/// Scan and display the tree.
fn run_scan(path: &PathBuf, mounts: Option<PathBuf>, max_depth: Option<u32>, top_n: usize) -> Result<()> {
    eprintln!("Analyzing {}...", path.display());
    let mut tree = analyze(path, mounts)?;

    let root_path = tree.path_of(&[]).unwrap_or_else(|| path.clone());
    println!();
    println!("{}", "─".repeat(60));
    println!(" {} - {}", root_path.display(), format_size(tree.total_area()));
    println!(
        " {} files, {} directories",
        tree.stats.total_files, tree.stats.total_dirs
    );
    println!(" Analyzed in {:.2}s", tree.scan_duration.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    let total = tree.total_area();
    let mut route = Vec::new();
    print_node(&mut tree, &mut route, max_depth.unwrap_or(u32::MAX), top_n, total);

    println!();
    println!("{}", tree.errors.summary());

    Ok(())
}

/// Export the analyzed tree to JSON.
fn run_export(path: &PathBuf, mounts: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    eprintln!("Analyzing {}...", path.display());
    let tree = analyze(path, mounts)?;

    let json = serde_json::to_string_pretty(&tree)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .with_context(|| format!("Cannot write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    if tree.has_errors() {
        eprintln!("{}", tree.errors.summary());
    }

    Ok(())
}

/// Print the node at `route` and, down to `max_depth`, its largest children.
///
/// Children are sorted only for the nodes that get printed.
fn print_node(tree: &mut SpaceTree, route: &mut Vec<usize>, max_depth: u32, top_n: usize, root_area: i64) {
    let depth = route.len() as u32;
    let Some(node) = tree.sort_children_at(route) else {
        return;
    };

    let ratio = if root_area > 0 {
        node.area() as f64 / root_area as f64 * 100.0
    } else {
        0.0
    };
    let name = if depth == 0 {
        tree_root_label(node)
    } else {
        node.name().to_string()
    };
    let expanded = node.is_expanded();
    let dir_marker = if expanded { "/" } else { "" };

    println!(
        "{}{}{:<40} {:>10} {:>5.1}% {}",
        "  ".repeat(depth as usize),
        if expanded { "▼ " } else { "  " },
        truncate(&format!("{}{}", name, dir_marker), 40),
        format_size(node.area()),
        ratio,
        make_bar(ratio / 100.0, 10)
    );

    let child_count = node.num_children();
    if !expanded || depth >= max_depth {
        return;
    }

    for index in 0..child_count.min(top_n) {
        route.push(index);
        print_node(tree, route, max_depth, top_n, root_area);
        route.pop();
    }

    let remaining = child_count.saturating_sub(top_n);
    if remaining > 0 {
        println!("{}  ... and {} more", "  ".repeat(depth as usize + 1), remaining);
    }
}

fn tree_root_label(root: &TreeNode) -> String {
    if root.name().is_empty() {
        "/".to_string()
    } else {
        root.name().to_string()
    }
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: i64) -> String {
    humansize::format_size(bytes.max(0) as u64, humansize::BINARY)
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
