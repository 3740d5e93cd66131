#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use csv::Writer;
use graphstep::{EdgeData, LabeledGraph, Node, Trace};
use log::LevelFilter;
use serde::Deserialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// CSV edge list with a `source,target` header and optional `weight` and
    /// `capacity` columns
    #[arg(short, long)]
    input: PathBuf,

    /// Print every recorded step of the run
    #[arg(long)]
    steps: bool,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Maximum flow with Dinic's algorithm
    MaxFlow {
        #[arg(long)]
        source: String,
        #[arg(long)]
        sink: String,
    },
    /// All-pairs shortest paths with Johnson's algorithm
    ShortestPaths {
        /// Write the distance matrix to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: String,
    target: String,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    capacity: Option<i64>,
}

// Vertices are added in the order they first appear in the file
fn read_graph_csv(path: &Path) -> Result<LabeledGraph<String>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut graph = LabeledGraph::new();
    for row in rdr.deserialize() {
        let row: EdgeRow = row?;
        graph.add_vertex(row.source.clone());
        graph.add_vertex(row.target.clone());
        graph.add_edge(
            &row.source,
            &row.target,
            EdgeData {
                weight: row.weight,
                capacity: row.capacity,
            },
        )?;
    }
    Ok(graph)
}

fn write_matrix_csv(
    labels: &[String],
    rows: &[Vec<f64>],
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(std::iter::once("").chain(labels.iter().map(String::as_str)))?;
    for (label, row) in labels.iter().zip(rows) {
        wtr.write_record(
            std::iter::once(label.clone()).chain(row.iter().map(ToString::to_string)),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_trace<W: Display>(mut trace: Trace<Node<String>, W>) {
    loop {
        if let Some(step) = trace.current() {
            println!("{step}");
            for edge in &step.snapshot().edges {
                println!(
                    "    {} -> {} ({})",
                    vertex_name(&edge.source),
                    vertex_name(&edge.target),
                    edge.value
                );
            }
            for line in step.detail().lines() {
                println!("  {line}");
            }
        }
        if !trace.cursor_next() {
            break;
        }
    }
}

fn vertex_name(node: &Node<String>) -> &str {
    match node {
        Node::Virtual => "S",
        Node::WithId(id) => id,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let graph = read_graph_csv(&cli.input)?;
    log::info!(
        "read {} vertices and {} edges from {}",
        graph.vertex_count(),
        graph.edge_count(),
        cli.input.display()
    );

    match cli.command {
        Command::MaxFlow { source, sink } => {
            let (flow, trace) = graphstep::max_flow(&graph, &source, &sink)?;
            if cli.steps {
                print_trace(trace);
            }
            println!("maximum flow {source} -> {sink}: {flow}");
        }
        Command::ShortestPaths { output } => {
            let (matrix, trace) = graphstep::all_pairs_shortest_paths(&graph)?;
            if cli.steps {
                print_trace(trace);
            }
            match output {
                Some(path) => {
                    write_matrix_csv(matrix.labels(), matrix.rows(), &path)?;
                    log::info!("wrote distance matrix to {}", path.display());
                }
                None => {
                    for (label, row) in matrix.labels().iter().zip(matrix.rows()) {
                        let cells: Vec<_> = row.iter().map(ToString::to_string).collect();
                        println!("{label}: {}", cells.join(", "));
                    }
                }
            }
        }
    }
    Ok(())
}
