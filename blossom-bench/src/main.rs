//! Command-line driver for blossom separation.

mod generator;
mod parse;
mod report;

use anyhow::{bail, Context, Result};
use blossom_core::{
    CombVerifier, ConvergenceController, CutStoreBuilder, FractionalSolution, Graph, RunState,
    SepRng, SeparationSettings, Verdict,
};
use clap::{Parser, Subcommand};
use rand::SeedableRng;

use generator::InstanceKind;

#[derive(Parser)]
#[command(name = "blossom-bench")]
#[command(about = "Blossom and comb separation driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the separation loop on a built-in or generated instance
    Run {
        /// Instance family
        #[arg(short, long, value_enum, default_value_t = InstanceKind::Demo5)]
        instance: InstanceKind,

        /// Node count (random instances)
        #[arg(short, long, default_value_t = 20)]
        nodes: usize,

        /// Chord probability (random instances)
        #[arg(short, long, default_value_t = 0.2)]
        density: f64,

        /// Seed for instance generation and the exact oracle
        #[arg(short, long, default_value_t = 12345)]
        seed: u64,

        /// Outer round limit
        #[arg(long, default_value_t = 1)]
        outer_limit: usize,

        /// Inner pass cap per round
        #[arg(long, default_value_t = 100)]
        max_inner: usize,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,

        /// Only print the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Verify one hand-written comb against a fractional point
    Verify {
        /// Node count
        #[arg(long)]
        nodes: usize,

        /// Edges as "u-v,u-v,..."
        #[arg(long)]
        edges: String,

        /// Edge values as "x,x,...", in edge order
        #[arg(long)]
        values: String,

        /// Cut as "handle;tooth;...", each clique "lo..hi|lo..hi"
        #[arg(long)]
        cut: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            instance,
            nodes,
            density,
            seed,
            outer_limit,
            max_inner,
            json,
            quiet,
        } => run(instance, nodes, density, seed, outer_limit, max_inner, json, quiet),
        Commands::Verify {
            nodes,
            edges,
            values,
            cut,
        } => verify(nodes, &edges, &values, &cut),
    }
}

#[allow(clippy::too_many_arguments)]
fn run(
    kind: InstanceKind,
    nodes: usize,
    density: f64,
    seed: u64,
    outer_limit: usize,
    max_inner: usize,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let instance = generator::build(kind, nodes, density, seed)
        .with_context(|| format!("failed to build {:?} instance", kind))?;
    log::info!(
        "Instance {}: {} nodes, {} edges, max degree excess {:.3}",
        instance.name,
        instance.graph.node_count(),
        instance.graph.edge_count(),
        instance.x.max_degree_excess(&instance.graph)
    );

    let mut settings = SeparationSettings::default()
        .with_outer_limit(outer_limit)
        .with_max_inner_passes(max_inner)
        .with_seed(seed);
    settings.verbose = !quiet && !json;
    settings.keep_reports = !quiet || json;

    let mut rng = SepRng::seed_from_u64(settings.seed);
    let mut controller = ConvergenceController::standard(settings);
    let outcome = controller.run(&instance.graph, &instance.x, &mut rng)?;

    if json {
        let run = report::JsonRun::new(
            &instance.name,
            instance.graph.node_count(),
            instance.graph.edge_count(),
            &outcome,
        );
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        report::print_text(&instance.name, &outcome);
    }

    if outcome.state == RunState::Failed {
        bail!(
            "separation failed: {}",
            outcome
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string())
        );
    }
    Ok(())
}

fn verify(nodes: usize, edges: &str, values: &str, cut: &str) -> Result<()> {
    let graph = Graph::new(nodes, parse::parse_edges(edges)?)?;
    let x = FractionalSolution::for_graph(&graph, parse::parse_values(values)?)?;
    let cliques = parse::parse_cut(cut)?;

    let mut builder = CutStoreBuilder::new("command line");
    builder.push_cut(&cliques, None);
    let store = builder.build();

    let verifier = CombVerifier::new(&graph, &x)?;
    let Some(cut_ref) = store.get(0) else {
        bail!("no cut was parsed");
    };
    let (evaluation, verdict) = verifier.verdict(&cut_ref)?;

    match (evaluation, &verdict) {
        (Some(eval), _) => {
            println!("handle crossing:  {:.6}", eval.delta_handle);
            println!("teeth crossing:   {:.6}", eval.delta_teeth);
            println!("LHS {:.6} vs RHS {:.0} (T = {})", eval.lhs(), eval.rhs(), eval.tooth_count);
            println!("margin {:+.6}: {}", eval.margin(), verdict.label());
        }
        (None, Verdict::Malformed(reason)) => println!("malformed: {}", reason),
        (None, _) => println!("{}", verdict.label()),
    }

    store.release();
    Ok(())
}
