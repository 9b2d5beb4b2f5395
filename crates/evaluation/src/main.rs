use clap::{Parser, ValueEnum};
use common::io::read_hyperbench;
use hypertree::algorithms::{Algorithm, BalSepGlobal, BalSepHybrid, BalSepLocal, DetK, LogK, ParameterError};
use hypertree::{Decomp, EdgeName, Names, Outcome, Vertex};
use petgraph::dot::{Config, Dot};
use std::error::Error;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Algo {
    #[value(name = "balsep-global")]
    BalSepGlobal,
    #[value(name = "balsep-local")]
    BalSepLocal,
    #[value(name = "balsep-hybrid")]
    BalSepHybrid,
    #[value(name = "detk")]
    DetK,
    #[value(name = "logk")]
    LogK,
    All,
}

/// Decompose a hypergraph in HyperBench format.
#[derive(Debug, Parser)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, value_enum, default_value_t = Algo::BalSepGlobal)]
    algo: Algo,
    #[arg(long)]
    width: usize,
    #[arg(long, default_value_t = 2)]
    balance_factor: usize,
    /// Number of levels before BalSepHybrid switches to DetK.
    #[arg(long, default_value_t = 1)]
    depth: usize,
    /// Number of parallel search workers. Defaults to the number of threads.
    #[arg(long)]
    workers: Option<usize>,
    /// Size of the thread pool. Defaults to the number of cores.
    #[arg(long)]
    threads: Option<usize>,
    /// Print the decomposition found first.
    #[arg(long)]
    print: bool,
    /// Write the decomposition found first in Graphviz DOT format.
    #[arg(long)]
    dot: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<Level>,
    #[arg(long)]
    json: bool,
}

fn algorithms(cli: &Cli) -> Result<Vec<Box<dyn Algorithm>>, ParameterError> {
    let (width, bf) = (cli.width, cli.balance_factor);
    let selected = match cli.algo {
        Algo::All => vec![Algo::BalSepGlobal, Algo::BalSepLocal, Algo::BalSepHybrid, Algo::DetK, Algo::LogK],
        algo => vec![algo],
    };
    let mut result: Vec<Box<dyn Algorithm>> = vec![];
    for algo in selected {
        let workers = cli.workers.unwrap_or_else(rayon::current_num_threads);
        result.push(match algo {
            Algo::BalSepGlobal => Box::new(BalSepGlobal::new(width, bf)?.with_workers(workers)),
            Algo::BalSepLocal => Box::new(BalSepLocal::new(width, bf)?.with_workers(workers)),
            Algo::BalSepHybrid => Box::new(BalSepHybrid::new(width, bf, cli.depth)?.with_workers(workers)),
            Algo::DetK => Box::new(DetK::new(width)?.with_workers(workers)),
            Algo::LogK => Box::new(LogK::new(width, bf)?.with_workers(workers)),
            Algo::All => unreachable!(),
        });
    }
    Ok(result)
}

fn write_dot(path: &Path, decomp: &Decomp, names: &Names) -> Result<(), Box<dyn Error>> {
    let vertex = |v: Vertex| names.vertex(v).map_or_else(|| v.to_string(), str::to_string);
    let edge = |e: EdgeName| names.edge(e).map_or_else(|| e.to_string(), str::to_string);
    let tree = decomp.to_digraph().map(
        |_, (bag, cover)| {
            let bag: Vec<_> = bag.iter().copied().map(vertex).collect();
            let cover: Vec<_> = cover.iter().map(|e| edge(e.name())).collect();
            format!("{{{}}} / {{{}}}", bag.join(", "), cover.join(", "))
        },
        |_, _| "",
    );
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", Dot::with_config(&tree, &[Config::EdgeNoLabel]))?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(level) = cli.log_level {
        let builder = FmtSubscriber::builder().with_max_level(level).with_span_events(FmtSpan::CLOSE);
        if cli.json {
            builder.json().finish().init();
        } else {
            builder.finish().init();
        }
    }
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let start = Instant::now();
    let (graph, names) = read_hyperbench(&cli.input)?;
    let t_read = start.elapsed();
    info!(edges = graph.edges().len(), vertices = graph.vertices().len(), "read hypergraph");

    let file_name = cli.input.file_name().and_then(OsStr::to_str).unwrap_or_default();
    println!("{file_name:<30.30}  read {:9} μs  edges {:6}  vertices {:6}", t_read.as_micros(), graph.edges().len(), graph.vertices().len());

    let mut outcomes: Vec<(&'static str, Outcome)> = vec![];
    for algorithm in algorithms(&cli)? {
        let start = Instant::now();
        let outcome = algorithm.find_decomposition(&graph);
        let t = start.elapsed();

        match outcome.decomp() {
            Some(decomp) => {
                assert!(decomp.is_correct(&graph), "{} returned an incorrect decomposition", algorithm.name());
                assert!(decomp.width() <= cli.width);
                println!(
                    "{:<14} {:9} μs  found  width {:3}  nodes {:6}",
                    algorithm.name(),
                    t.as_micros(),
                    decomp.width(),
                    decomp.node_count()
                );
            }
            None => println!("{:<14} {:9} μs  not found", algorithm.name(), t.as_micros()),
        }
        outcomes.push((algorithm.name(), outcome));
    }

    if let Some((first, outcome)) = outcomes.first() {
        for (name, other) in &outcomes[1..] {
            if other.is_found() != outcome.is_found() {
                warn!(first, found = outcome.is_found(), other = name, other_found = other.is_found(), "algorithms disagree");
            }
        }
    }

    if let Some(decomp) = outcomes.iter().find_map(|(_, outcome)| outcome.decomp()) {
        if cli.print {
            print!("{}", decomp.display(Some(&names)));
        }
        if let Some(path) = &cli.dot {
            write_dot(path, decomp, &names)?;
        }
    }
    Ok(())
}
