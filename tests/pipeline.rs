// pipeline.rs - End-to-end runs with an in-process tree-search provider

mod common;

use std::path::{Path, PathBuf};

use common::{six_taxon_fasta, test_schema, test_scorer, FakeProvider};
use pythia::features::FeatureSchema;
use pythia::pipeline::reduced_alignment_path;
use pythia::prelude::*;

fn write_msa(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn pipeline(config: PipelineConfig, provider: &FakeProvider, schema: FeatureSchema) -> Pipeline {
    Pipeline::new(config, Box::new(provider.clone()), Box::new(test_scorer(schema)))
}

#[test]
fn test_six_taxon_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(dir.path(), "msa.fasta", &six_taxon_fasta());
    let mut config = PipelineConfig::new(&msa);
    config.inference.num_trees = 1;
    config.explain = true;

    let provider = FakeProvider::new();
    let result = pipeline(config, &provider, test_schema()).run().unwrap();

    // one duplicate dropped, first occurrence kept
    assert_eq!(result.reduction.removed_duplicates, vec!["t6".to_string()]);
    assert_eq!(result.alignment.num_taxa(), 5);
    assert!(result.alignment.names().contains(&"t2".to_string()));

    let reduced = result.reduced_alignment_path.clone().unwrap();
    assert_eq!(reduced, reduced_alignment_path(&msa));
    assert_eq!(load(&reduced).unwrap().num_taxa(), 5);

    assert_eq!(provider.call_count(), 1);
    assert_eq!(result.tree_set.len(), 1);
    assert!(result.tree_set.scores()[0] > 0);
    assert_eq!(result.distances.size(), 1);
    assert_eq!(result.topology.num_unique_topologies, 1);
    assert_eq!(result.topology.mean_distance, 0.0);

    let features = &result.features;
    assert_eq!(features.get("num_taxa"), Some(5.0));
    let patterns = features.get("num_patterns").unwrap();
    assert!(patterns >= 1.0 && patterns <= 922.0);
    let invariant = features.get("proportion_invariant").unwrap();
    assert!((0.0..=1.0).contains(&invariant));
    assert!(features.get("proportion_gaps").unwrap() > 0.0);
    assert_eq!(features.get("avg_rfdist_parsimony"), Some(0.0));

    assert!((0.0..=1.0).contains(&result.difficulty));
    let attribution = result.attribution.unwrap();
    assert_eq!(attribution.contributions.len(), features.len());
    assert_eq!(result.predictor_fingerprint.as_deref(), Some("test-model"));
}

#[test]
fn test_identical_inputs_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(dir.path(), "msa.fasta", &six_taxon_fasta());
    let mut config = PipelineConfig::new(&msa);
    config.write_reduced = false;
    config.inference.seed = 7;

    let provider = FakeProvider::new();
    let first = pipeline(config.clone(), &provider, test_schema()).run().unwrap();
    let second = pipeline(config, &provider, test_schema()).run().unwrap();

    assert_eq!(first.tree_set.to_newick_lines(), second.tree_set.to_newick_lines());
    assert_eq!(first.tree_set.scores(), second.tree_set.scores());
    assert_eq!(first.features, second.features);
    assert_eq!(first.difficulty, second.difficulty);
    assert_eq!(first.tree_set.len(), 24);

    // no-file mode still reduces in memory
    assert!(first.reduced_alignment_path.is_none());
    assert!(!reduced_alignment_path(&msa).exists());
    assert_eq!(first.alignment.num_taxa(), 5);
}

#[test]
fn test_distance_matrix_properties_over_many_trees() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(dir.path(), "msa.fasta", &six_taxon_fasta());
    let mut config = PipelineConfig::new(&msa);
    config.write_reduced = false;
    config.inference.num_trees = 30;

    let result = pipeline(config, &FakeProvider::new(), test_schema()).run().unwrap();
    let m = &result.distances;
    assert_eq!(m.size(), 30);
    for i in 0..30 {
        assert_eq!(m.get(i, i), 0.0);
        for j in 0..30 {
            assert_eq!(m.get(i, j), m.get(j, i));
            assert!((0.0..=1.0).contains(&m.get(i, j)));
        }
    }
    assert!(result.topology.num_unique_topologies >= 1);
    assert!(result.topology.num_unique_topologies <= 30);
}

#[test]
fn test_schema_mismatch_fails_before_tree_search() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(dir.path(), "msa.fasta", &six_taxon_fasta());
    let mut schema = test_schema();
    schema.features.push("tree_length".to_string());

    let provider = FakeProvider::new();
    let err = pipeline(PipelineConfig::new(&msa), &provider, schema).run().unwrap_err();
    match err {
        PythiaError::FeatureSchemaMismatch { reason, .. } => assert!(reason.contains("tree_length")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(provider.call_count(), 0);
}

#[test]
fn test_comma_in_taxon_name_never_reaches_the_tool() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(
        dir.path(),
        "bad.fasta",
        ">t1,x\nACGT\n>t2\nACGA\n>t3\nACTT\n>t4\nTCGT\n",
    );

    let provider = FakeProvider::new();
    let err = pipeline(PipelineConfig::new(&msa), &provider, test_schema()).run().unwrap_err();
    assert!(matches!(err, PythiaError::Parse { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(provider.call_count(), 0);
}

#[test]
fn test_too_few_taxa_after_reduction() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(
        dir.path(),
        "dups.phy",
        "5 4\nA ACGT\nB ACGT\nC ACGT\nD TTTT\nE ----\n",
    );

    let provider = FakeProvider::new();
    let err = pipeline(PipelineConfig::new(&msa), &provider, test_schema()).run().unwrap_err();
    assert!(matches!(err, PythiaError::InsufficientTaxa { remaining: 2, removed: 3 }));
    assert_eq!(provider.call_count(), 0);

    // keeping everything satisfies the minimum
    let mut config = PipelineConfig::new(&msa);
    config.reduction.force_duplicates = true;
    config.reduction.force_full_gaps = true;
    config.inference.num_trees = 2;
    let result = pipeline(config, &provider, test_schema()).run().unwrap();
    assert_eq!(result.alignment.num_taxa(), 5);
    assert!(result.reduced_alignment_path.is_none());
    assert_eq!(result.reduction.kept_full_gaps, vec!["E".to_string()]);
}

#[test]
fn test_unsupported_alphabet() {
    let dir = tempfile::tempdir().unwrap();
    let msa = write_msa(dir.path(), "odd.fasta", ">a\nAC`T\n>b\nACGT\n>c\nACGT\n>d\nACGA\n");
    let err = pipeline(PipelineConfig::new(&msa), &FakeProvider::new(), test_schema())
        .run()
        .unwrap_err();
    match err {
        PythiaError::UnsupportedDataType { chars, .. } => assert_eq!(chars, vec!['`']),
        other => panic!("unexpected error: {other}"),
    }
}
