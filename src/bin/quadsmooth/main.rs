//! quadsmooth CLI - Catmull-Clark subdivision from the command line.
//!
//! Usage: quadsmooth <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `quadsmooth --help` for available commands. Set `RUST_LOG=debug` for
//! per-iteration diagnostics.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::info;

use quadsmooth::algo::subdivide::{catmull_clark_subdivide_with_progress, SubdivideOptions};
use quadsmooth::algo::Progress;
use quadsmooth::io;

#[derive(Parser)]
#[command(name = "quadsmooth")]
#[command(author, version, about = "Catmull-Clark subdivision CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Subdivide a mesh
    Subdivide {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,

        /// Scale and center the input into the unit cube first
        #[arg(long)]
        normalize: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Subdivide {
            input,
            output,
            iterations,
            sequential,
            normalize,
        } => {
            cmd_subdivide(&input, &output, iterations, sequential, normalize)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic: only redraw when the percentage grows.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<32}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    let stats = mesh.stats()?;

    println!("File: {}", input.display());
    println!("Vertex slots: {}", mesh.num_vertices());
    println!("Distinct vertices: {}", stats.vertices);
    println!("Faces: {} ({} triangles, {} quads)", mesh.num_faces(), stats.triangles, stats.quads);
    println!("Edges: {} ({} boundary)", stats.edges, stats.boundary_edges);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    if mesh.is_quad_mesh() {
        println!("Mesh type: Quad mesh");
    } else if stats.quads == 0 {
        println!("Mesh type: Triangle mesh");
    } else {
        println!("Mesh type: Mixed triangle/quad mesh");
    }

    if stats.boundary_edges == 0 {
        println!("Topology: closed");
    } else {
        println!("Topology: open");
    }

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    output: &PathBuf,
    iterations: usize,
    sequential: bool,
    normalize: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = io::load(input)?;

    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    if normalize {
        if mesh.normalize_to_unit_cube() {
            info!("normalized {} into the unit cube", input.display());
        } else {
            eprintln!("Warning: mesh has zero extent, skipping normalization");
        }
    }

    let options = SubdivideOptions::new(iterations).with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    println!("Applying Catmull-Clark subdivision ({} iterations, {})...", iterations, mode);
    let start = Instant::now();
    let refined = catmull_clark_subdivide_with_progress(&mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!("Result: {} vertices, {} faces", refined.num_vertices(), refined.num_faces());
    io::save(&refined, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
