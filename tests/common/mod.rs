// mod.rs - Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pythia::features::{default_schema, FeatureSchema};
use pythia::inference::{InferenceRequest, RawInference, TreeInferenceProvider};
use pythia::scorer::{GbmModel, GbmNode, GbmTree, GradientBoostedScorer};
use pythia::Result;

/// Small deterministic generator so fixtures never change between runs
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

/// 6-taxon, 922-site DNA alignment in FASTA where `t6` duplicates `t2`
pub fn six_taxon_fasta() -> String {
    const SITES: usize = 922;
    let bases = b"ACGT";
    let mut rng = Lcg::new(42);
    let root: Vec<u8> = (0..SITES).map(|_| bases[rng.below(4) as usize]).collect();

    let mut rows: Vec<(String, Vec<u8>)> = (1..=5)
        .map(|t| {
            let seq = root
                .iter()
                .map(|&b| if rng.below(10) == 0 { bases[rng.below(4) as usize] } else { b })
                .collect();
            (format!("t{}", t), seq)
        })
        .collect();
    // a short run of gaps so the gap proportion is not trivially zero
    rows[0].1[..5].copy_from_slice(b"-----");
    let duplicate = rows[1].1.clone();
    rows.push(("t6".to_string(), duplicate));

    rows.iter()
        .map(|(name, seq)| format!(">{}\n{}\n", name, String::from_utf8_lossy(seq)))
        .collect()
}

/// In-process provider producing seeded caterpillar trees over the alignment taxa
#[derive(Clone, Default)]
pub struct FakeProvider {
    pub calls: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn caterpillar(names: &[String], rng: &mut Lcg) -> String {
    let mut order: Vec<&str> = names.iter().map(String::as_str).collect();
    for i in (1..order.len()).rev() {
        let j = rng.below(i as u64 + 1) as usize;
        order.swap(i, j);
    }
    let mut newick = format!("({},{})", order[0], order[1]);
    for name in &order[2..] {
        newick = format!("({},{})", newick, name);
    }
    newick.push(';');
    newick
}

impl TreeInferenceProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn infer(&self, request: &InferenceRequest<'_>) -> Result<RawInference> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let names = request.alignment.names();
        let trees = (0..request.num_trees)
            .map(|k| {
                let mut rng = Lcg::new(request.seed.wrapping_mul(1_000).wrapping_add(k as u64));
                caterpillar(names, &mut rng) + "\n"
            })
            .collect();
        Ok(RawInference {
            trees,
            log: "Elapsed time: 0.001 seconds\n".to_string(),
            tool_reduced_alignment: false,
        })
    }
}

/// Schema of the test model: the default features plus two raw counts
pub fn test_schema() -> FeatureSchema {
    let mut schema = default_schema();
    schema.version = "pythia-test".to_string();
    schema.features.push("num_taxa".to_string());
    schema.features.push("num_patterns".to_string());
    schema
}

fn split(feature: usize, threshold: f64, left: f64, right: f64) -> GbmTree {
    let leaf = |value| GbmNode {
        feature: None,
        threshold: 0.0,
        left: None,
        right: None,
        value,
        cover: 1.0,
    };
    GbmTree {
        nodes: vec![
            GbmNode {
                feature: Some(feature),
                threshold,
                left: Some(1),
                right: Some(2),
                value: 0.0,
                cover: 2.0,
            },
            leaf(left),
            leaf(right),
        ],
    }
}

/// Two-stump model over `schema`
pub fn test_scorer(schema: FeatureSchema) -> GradientBoostedScorer {
    let rf = schema
        .features
        .iter()
        .position(|f| f == "avg_rfdist_parsimony")
        .unwrap_or(0);
    let invariant = schema
        .features
        .iter()
        .position(|f| f == "proportion_invariant")
        .unwrap_or(0);
    let model = GbmModel {
        schema,
        base_score: 0.1,
        learning_rate: 1.0,
        trees: vec![split(rf, 0.3, 0.1, 0.4), split(invariant, 0.5, 0.2, 0.0)],
    };
    GradientBoostedScorer::from_model(model, "test-model".to_string()).unwrap()
}
