// mod.rs - Result artifact writers

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::ParsimonyTreeSet;
use crate::data::loaders::phylip::write_phylip;
use crate::data::Alignment;
use crate::error::{PythiaError, Result};
use crate::features::FeatureVector;
use crate::scorer::Attribution;

/// Output file names derived from a run prefix.
///
/// Writers overwrite existing files, so concurrent runs in one directory
/// must use distinct prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub trees: PathBuf,
    pub features: PathBuf,
    pub log: PathBuf,
    pub attributions: PathBuf,
}

impl ArtifactPaths {
    pub fn from_prefix(prefix: &Path) -> Self {
        let with = |suffix: &str| {
            let mut name = prefix.as_os_str().to_owned();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            trees: with(".pythia.trees"),
            features: with(".pythia.csv"),
            log: with(".pythia.log"),
            attributions: with(".pythia.shap.csv"),
        }
    }
}

/// Ensure parent directory exists before creating file
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| PythiaError::io(parent, e))?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| PythiaError::io(path, e))?;
    Ok(BufWriter::new(file))
}

fn write_header<W: Write>(writer: &mut W, command_line: &str) -> std::io::Result<()> {
    writeln!(writer, "# Command: {}", command_line)?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "# pythia v{}", env!("CARGO_PKG_VERSION"))
}

/// Write the reduced alignment in relaxed PHYLIP
pub fn write_reduced_alignment(path: &Path, alignment: &Alignment) -> Result<()> {
    let mut writer = create(path)?;
    write_phylip(alignment, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| PythiaError::io(path, e))?;
    println!("✅ Reduced alignment written to: {}", path.display());
    Ok(())
}

/// Write the parsimony trees, one Newick string per line
pub fn write_trees(path: &Path, tree_set: &ParsimonyTreeSet) -> Result<()> {
    let mut writer = create(path)?;
    writer
        .write_all(tree_set.to_newick_lines().as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| PythiaError::io(path, e))?;
    println!("✅ {} parsimony trees written to: {}", tree_set.len(), path.display());
    Ok(())
}

/// Write one CSV record: the features, in schema order, and the difficulty
pub fn write_feature_record(
    path: &Path,
    msa: &Path,
    features: &FeatureVector,
    difficulty: f64,
    command_line: &str,
) -> Result<()> {
    let mut writer = create(path)?;
    write_header(&mut writer, command_line).map_err(|e| PythiaError::io(path, e))?;

    let to_io = |e: csv::Error| PythiaError::io(path, e.into());
    let mut records = csv::Writer::from_writer(&mut writer);
    let mut header = vec!["msa".to_string(), "schema".to_string()];
    header.extend(features.names().map(str::to_string));
    header.push("difficulty".to_string());
    records.write_record(&header).map_err(to_io)?;

    let mut row = vec![msa.display().to_string(), features.schema_version().to_string()];
    row.extend(features.values().iter().map(|v| v.to_string()));
    row.push(format!("{:.4}", difficulty));
    records.write_record(&row).map_err(to_io)?;
    records.flush().map_err(|e| PythiaError::io(path, e))?;
    drop(records);

    writer.flush().map_err(|e| PythiaError::io(path, e))?;
    println!("✅ Features and difficulty written to: {}", path.display());
    Ok(())
}

/// Write per-feature attributions, with the model bias as the first row
pub fn write_attributions(
    path: &Path,
    features: &FeatureVector,
    attribution: &Attribution,
    command_line: &str,
) -> Result<()> {
    let mut writer = create(path)?;
    write_header(&mut writer, command_line).map_err(|e| PythiaError::io(path, e))?;

    let to_io = |e: csv::Error| PythiaError::io(path, e.into());
    let mut records = csv::Writer::from_writer(&mut writer);
    records.write_record(["feature", "value", "contribution"]).map_err(to_io)?;
    records.write_record(["bias", "", attribution.bias.to_string().as_str()])
        .map_err(to_io)?;
    for (name, contribution) in &attribution.contributions {
        let value = features.get(name).map(|v| v.to_string()).unwrap_or_default();
        records.write_record([name.as_str(), value.as_str(), contribution.to_string().as_str()])
            .map_err(to_io)?;
    }
    records.flush().map_err(|e| PythiaError::io(path, e))?;
    drop(records);

    writer.flush().map_err(|e| PythiaError::io(path, e))?;
    println!("✅ Feature attributions written to: {}", path.display());
    Ok(())
}
