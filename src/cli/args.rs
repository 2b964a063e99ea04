// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// pythia - Predict the difficulty of phylogenetic inference on an MSA
pub struct Args {
    /// multiple sequence alignment to predict the difficulty for (FASTA or relaxed PHYLIP)
    #[argh(option)]
    pub msa: Option<String>,

    /// path to the RAxML-NG executable (default: raxml-ng from PATH)
    #[argh(option)]
    pub raxmlng: Option<String>,

    /// path to the difficulty predictor model (JSON)
    #[argh(option)]
    pub predictor: Option<String>,

    /// prefix for all output files (default: the MSA path)
    #[argh(option)]
    pub prefix: Option<String>,

    /// number of threads for RAxML-NG and the distance computation (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// seed for the parsimony tree search (default: 0)
    #[argh(option)]
    pub seed: Option<u64>,

    /// number of parsimony starting trees (default: 24)
    #[argh(option)]
    pub num_trees: Option<usize>,

    /// kill RAxML-NG after this many seconds
    #[argh(option)]
    pub timeout: Option<f64>,

    /// write per-feature attributions of the prediction
    #[argh(switch)]
    pub shap: bool,

    /// keep duplicate sequences instead of removing them
    #[argh(switch)]
    pub force_duplicates: bool,

    /// keep sequences consisting only of gaps instead of removing them
    #[argh(switch)]
    pub force_full_gaps: bool,

    /// do not write any output files (including the reduced alignment)
    #[argh(switch)]
    pub nofiles: bool,

    /// enable debug logging
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// print version and exit
    #[argh(switch, short = 'V')]
    pub version: bool,
}
