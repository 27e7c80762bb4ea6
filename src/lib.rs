// src/lib.rs

//! Minimal build-system-like scheduler for staged dataset artifacts.
//!
//! Pipeline scripts declare a [`graph::Graph`] of named tasks. Each task
//! binds an opaque [`graph::Transform`] to declared inputs (literals, lists,
//! or [`graph::Reference`]s to other tasks' outputs) and an output path under
//! a staging root. The [`engine::Engine`] computes the minimal closure for
//! the requested targets, orders it so dependencies run first, skips tasks
//! whose artifact already exists (unless forced), and resolves references to
//! concrete paths immediately before each invocation.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod store;

use tracing::debug;

use crate::cli::CliArgs;
use crate::engine::{Engine, RunReport};
use crate::errors::Result;
use crate::graph::{Graph, Input};

/// High-level entry point used by pipeline binaries.
///
/// This wires together:
/// - the run specification from parsed CLI arguments
/// - dry-run printing
/// - the engine over the local filesystem
/// - summary logging
///
/// Loading `Stagedag.toml` and constructing the graphs stays with the
/// caller, since the staging root is needed before any task can be
/// registered:
///
/// ```no_run
/// use stagedag::graph::{Graph, Inputs, Invocation, Params};
/// use stagedag::{cli, config, logging};
///
/// fn main() -> stagedag::errors::Result<()> {
///     let args = cli::parse();
///     logging::init_logging(args.log_level)?;
///
///     let cfg = config::load_and_validate(&args.config)?;
///     let env = config::selected_env(args.env.as_deref());
///     let root = cfg.staging_root(env.as_deref())?.to_string();
///
///     let mut variants = Graph::new("variants", root);
///     let sites = variants.add_task(
///         "normalize_sites",
///         |call: &Invocation<'_>| -> anyhow::Result<()> {
///             // Dispatch the real work to the external engine here.
///             let _ = call.output_path;
///             Ok(())
///         },
///         "variants/normalized",
///         Inputs::new().literal("source", "gs://source-bucket/sites"),
///         Params::new().set("reference_genome", "GRCh38"),
///     )?;
///     variants.add_task(
///         "frequency_table",
///         |call: &Invocation<'_>| -> anyhow::Result<()> {
///             let _ = call.value("sites");
///             Ok(())
///         },
///         "variants/frequencies",
///         Inputs::new().upstream("sites", &sites),
///         Params::new(),
///     )?;
///     variants.set_outputs([("frequencies", "frequency_table")])?;
///
///     let report = stagedag::run(&[&variants], &args)?;
///     std::process::exit(report.exit_code());
/// }
/// ```
pub fn run(graphs: &[&Graph], args: &CliArgs) -> Result<RunReport> {
    if args.dry_run {
        print_dry_run(graphs);
        debug!("dry-run complete (no execution)");
        return Ok(RunReport::default());
    }

    let spec = args.run_spec();
    let report = Engine::new().run(graphs, &spec)?;
    report.log_summary();
    Ok(report)
}

/// Simple dry-run output: print tasks, dependencies and declared outputs.
fn print_dry_run(graphs: &[&Graph]) {
    println!("stagedag dry-run");

    for graph in graphs {
        println!();
        println!("graph '{}' (staging root: {})", graph.name(), graph.staging_root());

        for task in graph.tasks() {
            println!("  - {}", task.name());
            println!("      path: {}", task.path());
            let deps = upstream_names(graph, task);
            if !deps.is_empty() {
                println!("      after: {deps:?}");
            }
        }

        if !graph.outputs().is_empty() {
            println!("  outputs:");
            for (alias, task) in graph.outputs().iter() {
                println!("      {alias} -> {task}");
            }
        }
    }
}

fn upstream_names(graph: &Graph, task: &crate::graph::Task) -> Vec<String> {
    task.inputs()
        .iter()
        .filter_map(|(_, input)| match input {
            Input::Upstream(dep) => Some(dep.to_string()),
            Input::UpstreamNamed(name) => Some(format!("{}:{}", graph.name(), name)),
            Input::Literal(_) | Input::List(_) => None,
        })
        .collect()
}
