// rfdist.rs - Robinson-Foulds summary of a Newick tree file

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::{Arg, Command};

use pythia::core::{topology_stats, DistanceMatrix, ParsimonyTreeSet};
use pythia::output::ensure_parent_dir;

fn write_matrix(path: &Path, tree_set: &ParsimonyTreeSet, matrix: &DistanceMatrix) -> Result<(), Box<dyn std::error::Error>> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "# pythia v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(writer, "tree1\ttree2\tabsolute\trelative")?;
    for i in 0..tree_set.len() {
        for j in i + 1..tree_set.len() {
            writeln!(writer, "{}\t{}\t{}\t{:.6}", i, j, matrix.absolute(i, j), matrix.get(i, j))?;
        }
    }
    writer.flush()?;
    println!("✅ Pairwise distances written to: {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("pythia-rfdist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Number of unique topologies and average RF distance of a tree set")
        .arg(Arg::new("trees")
            .long("trees")
            .value_name("FILE")
            .help("Newick file with one tree per line")
            .required(true))
        .arg(Arg::new("threads")
            .long("threads")
            .value_name("N")
            .help("Number of threads (default: auto-detect)"))
        .arg(Arg::new("pairs")
            .long("pairs")
            .value_name("FILE")
            .help("Write every pairwise distance to this TSV file"))
        .get_matches();

    let Some(trees_path) = matches.get_one::<String>("trees") else {
        return Err("--trees is required".into());
    };

    if let Some(threads) = matches.get_one::<String>("threads") {
        let n = threads
            .parse::<usize>()
            .map_err(|_| format!("Invalid thread count: {}", threads))?;
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    let text = std::fs::read_to_string(trees_path)
        .map_err(|e| format!("Failed to read '{}': {}", trees_path, e))?;
    let tree_set = ParsimonyTreeSet::from_newick_lines(&text, None, None)?;
    let (matrix, stats) = topology_stats(&tree_set)?;

    println!("Loaded {} trees with {} taxa.", stats.num_trees, tree_set.taxa().len());
    println!("Average absolute RF distance in this tree set: {:.6}", stats.mean_absolute_distance);
    println!("Average relative RF distance in this tree set: {:.6}", stats.mean_distance);
    println!("Number of unique topologies in this tree set: {}", stats.num_unique_topologies);

    if let Some(pairs) = matches.get_one::<String>("pairs") {
        write_matrix(Path::new(pairs), &tree_set, &matrix)?;
    }
    Ok(())
}
