use anyhow::{Context, Result};
use cellmap::{
    half_edge::algorithms::{uniform_reduced_map_with_settings, SamplerSettings},
    parser::format_cycles,
    OrientedMap,
};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cellmap",
    about = "Sample and inspect combinatorial maps on oriented surfaces."
)]
struct Cli {
    /// Raise the log level (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a uniformly random map with one vertex and one face.
    Sample {
        /// Genus of the surface.
        #[arg(short, long)]
        genus: usize,
        /// Seed for a reproducible sample.
        #[arg(long)]
        seed: Option<u64>,
        /// Give up after this many rejected chain runs.
        #[arg(long, value_name = "N")]
        max_attempts: Option<usize>,
        /// Only print the cycles of the vertex permutation.
        #[arg(long)]
        plain: bool,
    },
    /// Print the invariants of a map given by its vertex cycles.
    Info {
        /// Cycles of the vertex permutation, e.g. "(0,2,1,3)".
        cycles: String,
        /// Read labels as edges: `e` is half-edge 2e and `~e` half-edge 2e+1.
        #[arg(long)]
        edge_like: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Sample {
            genus,
            seed,
            max_attempts,
            plain,
        } => {
            let settings = SamplerSettings { seed, max_attempts };
            let sampled = uniform_reduced_map_with_settings(genus, &settings)
                .with_context(|| format!("failed to sample a reduced map of genus {genus}"))?;
            tracing::info!(genus, attempts = sampled.attempts, "sampled");

            if plain {
                println!("{}", format_cycles(&sampled.map.vertices(), false));
            } else {
                describe(&sampled.map);
                println!("trace: {}", sampled.trace);
            }
        }
        Command::Info { cycles, edge_like } => {
            let map = OrientedMap::from_vertex_cycles(&cycles, edge_like)
                .with_context(|| format!("invalid vertex cycles {cycles:?}"))?;
            describe(&map);
        }
    }
    Ok(())
}

fn describe(map: &OrientedMap) {
    println!("{map}");
    println!("vertices: {}", map.num_vertices());
    println!("edges: {}", map.num_edges());
    println!("faces: {}", map.num_faces());
    match map.genus() {
        Ok(genus) => println!("genus: {genus}"),
        Err(err) => println!("genus: undefined ({err})"),
    }
    println!("connected components: {}", map.connected_components().len());
}
