//! Command-line tool for encoding instances and building graph datasets.

mod split_choice;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use graph_core::{NodeKind, Relation};
use graph_data::instance::read_instance;
use graph_data::{
    discover_instances, DatasetSettings, InstanceDataset, LinearFormBuilder, ModelBuilder, Split,
};

use crate::split_choice::SplitChoice;

#[derive(Parser, Debug)]
#[command(name = "graph-bench", about = "Encode optimization instances as constraint graphs")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Comma-separated name markers of decision variables; `x(` and `phi(` when unset
    #[arg(long, global = true, env = "GRAPH_DECISION_MARKERS", value_delimiter = ',')]
    decision_markers: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a single instance and print its graph summary
    Encode {
        /// Instance JSON file
        instance: PathBuf,

        /// Encode every variable as a plain `var` node
        #[arg(long)]
        flat: bool,

        /// Write the encoded graph as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build one split of a dataset
    Dataset {
        /// Directory holding the instance JSON files
        #[arg(long)]
        instances: PathBuf,

        /// Directory holding the `<instance>_sols.npz` files
        #[arg(long, env = "GRAPH_SOLS_DIR")]
        sols_dir: PathBuf,

        #[arg(long, value_enum, default_value = "train")]
        split: SplitChoice,

        /// Only use instance files starting with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Encode every variable as a plain `var` node
        #[arg(long)]
        flat: bool,

        /// Write the built dataset to a gzip-compressed cache
        #[arg(long)]
        cache: Option<PathBuf>,
    },

    /// Print the contents of a dataset cache
    Inspect {
        cache: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn settings(flat: bool, markers: &[String]) -> DatasetSettings {
    let markers: Vec<&str> = markers.iter().map(|m| m.trim()).filter(|m| !m.is_empty()).collect();
    if flat {
        DatasetSettings::default().without_cone_partition()
    } else if markers.is_empty() {
        DatasetSettings::default()
    } else {
        DatasetSettings::default().with_decision_markers(markers)
    }
}

fn encode(instance: &Path, settings: &DatasetSettings, output: Option<&Path>) -> Result<()> {
    let doc = read_instance(instance)?;
    let program = LinearFormBuilder
        .build(&doc)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Failed to build model for {}", instance.display()))?;

    let graph = program
        .to_graph(settings.naming.as_ref())
        .with_context(|| format!("Failed to encode {}", instance.display()))?;

    println!("Instance:         {}", instance.display());
    println!("Variables (n):    {}", program.num_vars());
    println!("Constraints (m):  {}", program.num_constraints());
    println!("A nonzeros:       {}", program.num_nonzeros());
    println!("Graph:            {}", graph.summary());

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &graph)
            .context("Failed to serialize graph")?;
        log::info!("wrote graph to {}", path.display());
    }
    Ok(())
}

fn print_table(dataset: &InstanceDataset) {
    println!("\n{}", "=".repeat(72));
    println!("Split: {} ({} samples)", dataset.split(), dataset.len());
    println!("{}", "=".repeat(72));
    println!(
        "{:<16} {:>8} {:>8} {:>8} {:>10} {:>14}",
        "instance", "var", "con", "soc", "edges", "best obj"
    );
    println!("{}", "-".repeat(72));

    let mut total_nodes = 0;
    let mut total_edges = 0;
    for sample in dataset.iter() {
        let g = sample.graph;
        let edges: usize = Relation::ALL
            .iter()
            .filter(|r| r.is_forward())
            .map(|&r| g.num_edges(r))
            .sum();
        let best = sample
            .targets
            .best_objective()
            .map(|v| format!("{:.6e}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:>8} {:>8} {:>8} {:>10} {:>14}",
            sample.name,
            g.num_nodes(NodeKind::Variable),
            g.num_nodes(NodeKind::Constraint),
            g.num_nodes(NodeKind::ConeVariable),
            edges,
            best
        );
        total_nodes += NodeKind::ALL.iter().map(|&k| g.num_nodes(k)).sum::<usize>();
        total_edges += edges;
    }

    println!("{}", "-".repeat(72));
    println!("Total nodes:      {}", total_nodes);
    println!("Total edges:      {} (each mirrored once)", total_edges);
}

fn dataset(
    instances: &Path,
    sols_dir: &Path,
    split: Split,
    prefix: Option<&str>,
    settings: &DatasetSettings,
    cache: Option<&Path>,
) -> Result<()> {
    let paths = discover_instances(instances, prefix)
        .with_context(|| format!("Failed to list instances in {}", instances.display()))?;
    if paths.is_empty() {
        bail!("No instance files found in {}", instances.display());
    }

    let dataset = InstanceDataset::build(&paths, sols_dir, split, settings, &LinearFormBuilder)
        .with_context(|| format!("Failed to build {} split", split))?;
    print_table(&dataset);

    if let Some(path) = cache {
        dataset
            .save_cache(path)
            .with_context(|| format!("Failed to write cache {}", path.display()))?;
    }
    Ok(())
}

fn inspect(cache: &Path) -> Result<()> {
    let dataset = InstanceDataset::load_cache(cache)
        .with_context(|| format!("Failed to load cache {}", cache.display()))?;
    print_table(&dataset);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Encode {
            instance,
            flat,
            output,
        } => encode(&instance, &settings(flat, &cli.decision_markers), output.as_deref()),
        Command::Dataset {
            instances,
            sols_dir,
            split,
            prefix,
            flat,
            cache,
        } => dataset(
            &instances,
            &sols_dir,
            split.into(),
            prefix.as_deref(),
            &settings(flat, &cli.decision_markers),
            cache.as_deref(),
        ),
        Command::Inspect { cache } => inspect(&cache),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_core::ConeNaming;

    #[test]
    fn test_decision_markers_flag() {
        let cli = Cli::try_parse_from([
            "graph-bench",
            "--decision-markers",
            "x(, y(",
            "encode",
            "125_0.json",
        ])
        .unwrap();
        assert_eq!(cli.decision_markers, vec!["x(", " y("]);

        let naming = settings(false, &cli.decision_markers).naming;
        assert_eq!(naming, Some(ConeNaming::new(["x(", "y("])));
    }

    #[test]
    fn test_settings_defaults_and_flat() {
        assert_eq!(settings(false, &[]).naming, Some(ConeNaming::default()));
        assert_eq!(settings(true, &["x(".to_string()]).naming, None);
    }
}
