// main.rs - CLI entry point

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use pythia::cli::Config;
use pythia::output::{ensure_parent_dir, write_attributions, write_feature_record, write_trees};
use pythia::prelude::*;

fn main() {
    let code = match run_main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("❌ ERROR: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

/// Stderr gets warnings (debug with `--verbose`); the run log gets everything from info up
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "pythia=debug" } else { "warn" }));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let file_layer = match log_file {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path).map_err(|e| PythiaError::io(path, e))?;
            let level = if verbose { "pythia=debug" } else { "pythia=info" };
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(level)),
            )
        }
        None => None,
    };

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PythiaError::Config(format!("failed to initialise logging: {}", e)))
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    if args.version {
        println!("{}", get_info());
        return Ok(());
    }

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation = validate_args(&args)?;
    init_logging(args.verbose, validation.artifacts.as_ref().map(|a| a.log.as_path()))?;

    println!("🚀 pythia v{}", VERSION);
    tracing::info!(command = %command_line, "pythia v{}", VERSION);

    // Configure thread pool
    if let Some(n) = validation.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| PythiaError::Config(format!("failed to configure thread pool: {}", e)))?;
        println!("🧵 Threads: {}", n);
    } else {
        println!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let total_start = Instant::now();
    let pipeline_config = validation.pipeline.clone();
    println!("📂 MSA: {}", pipeline_config.msa.display());
    println!(
        "🌱 Parsimony trees: {} (seed {})",
        pipeline_config.inference.num_trees, pipeline_config.inference.seed
    );

    let pipeline = Pipeline::from_paths(pipeline_config, &validation.raxmlng, &validation.predictor)?;
    println!(
        "🔮 Predictor: {} ({} features, sha256 {})",
        validation.predictor.display(),
        pipeline.scorer().schema().len(),
        pipeline.scorer().fingerprint().unwrap_or("n/a")
    );

    let result = pipeline.run()?;

    // Summary
    let report = &result.reduction;
    if report.is_reduced() {
        println!(
            "✂️  Removed {} duplicate and {} full-gap sequences",
            report.removed_duplicates.len(),
            report.removed_full_gaps.len()
        );
    }
    if !report.kept_duplicate_groups.is_empty() || !report.kept_full_gaps.is_empty() {
        println!("⚠️  Degenerate sequences kept as requested; features may be biased");
    }
    println!(
        "📊 Alignment: {} taxa, {} sites, {} patterns ({})",
        result.alignment_stats.num_taxa,
        result.alignment_stats.num_sites,
        result.alignment_stats.num_patterns,
        result.alignment.data_type()
    );
    println!(
        "🌳 Topologies: {} unique of {} trees, mean RF distance {:.4}",
        result.topology.num_unique_topologies, result.topology.num_trees, result.topology.mean_distance
    );
    println!("🧮 Features ({}):", result.features.schema_version());
    for (name, value) in result.features.iter() {
        println!("   {:<36} {:.6}", name, value);
    }
    println!("🎯 Predicted difficulty: {:.2}", result.difficulty);

    if let Some(artifacts) = &validation.artifacts {
        write_trees(&artifacts.trees, &result.tree_set)?;
        write_feature_record(
            &artifacts.features,
            &validation.pipeline.msa,
            &result.features,
            result.difficulty,
            &command_line,
        )?;
        if let Some(attribution) = &result.attribution {
            write_attributions(&artifacts.attributions, &result.features, attribution, &command_line)?;
        }
        println!("📝 Run log: {}", artifacts.log.display());
    } else if let Some(attribution) = &result.attribution {
        println!("🔍 Attributions (bias {:.4}):", attribution.bias);
        for (name, contribution) in &attribution.contributions {
            println!("   {:<36} {:+.6}", name, contribution);
        }
    }

    println!("⏱️  Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}
