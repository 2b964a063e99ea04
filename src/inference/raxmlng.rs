// raxmlng.rs - RAxML-NG parsimony starting-tree provider

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::data::loaders::phylip::write_phylip;
use crate::error::{PythiaError, Result};

use super::process::{self, describe, resolve_executable, tail, DIAGNOSTIC_LINES};
use super::traits::{InferenceRequest, RawInference, TreeInferenceProvider};

const MSA_FILE: &str = "alignment.phy";
const RUN_PREFIX: &str = "pythia";

/// Runs `raxml-ng --start` in a scoped temporary directory.
///
/// Every call gets a fresh directory, so concurrent runs never share tool
/// output files; the directory is removed on every exit path.
#[derive(Debug, Clone)]
pub struct RaxmlNg {
    executable: PathBuf,
}

impl RaxmlNg {
    /// Validate the executable up front so a bad path fails before any work
    pub fn new(executable: impl AsRef<Path>) -> Result<Self> {
        let executable = resolve_executable(executable.as_ref())?;
        debug!(executable = %executable.display(), "using RAxML-NG");
        Ok(Self { executable })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command(&self, request: &InferenceRequest<'_>, msa: &Path, prefix: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--start")
            .arg("--msa")
            .arg(msa)
            .arg("--model")
            .arg(&request.model)
            .arg("--prefix")
            .arg(prefix)
            .arg("--tree")
            .arg(format!("pars{{{}}}", request.num_trees))
            .arg("--seed")
            .arg(request.seed.to_string());
        if let Some(threads) = request.threads {
            cmd.arg("--threads").arg(threads.to_string());
        }
        cmd.arg("--redo").arg("--log").arg("VERBOSE");
        cmd
    }
}

/// Lines the tool flagged as errors, or the tails of its streams
fn failure_details(stdout: &str, stderr: &str, log: Option<&str>) -> String {
    let errors: Vec<&str> = stdout
        .lines()
        .chain(log.unwrap_or_default().lines())
        .chain(stderr.lines())
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR"))
        .collect();
    if !errors.is_empty() {
        return errors.join("\n");
    }
    format!(
        "stdout (tail):\n{}\nstderr (tail):\n{}",
        tail(stdout, DIAGNOSTIC_LINES),
        tail(stderr, DIAGNOSTIC_LINES)
    )
}

impl TreeInferenceProvider for RaxmlNg {
    fn name(&self) -> &str {
        "RAxML-NG"
    }

    fn infer(&self, request: &InferenceRequest<'_>) -> Result<RawInference> {
        let workdir = tempfile::Builder::new()
            .prefix("pythia-raxml-")
            .tempdir()
            .map_err(|e| PythiaError::io(std::env::temp_dir(), e))?;

        let msa = workdir.path().join(MSA_FILE);
        let file = File::create(&msa).map_err(|e| PythiaError::io(&msa, e))?;
        let mut writer = BufWriter::new(file);
        write_phylip(request.alignment, &mut writer).map_err(|e| PythiaError::io(&msa, e))?;
        writer.flush().map_err(|e| PythiaError::io(&msa, e))?;

        let prefix = workdir.path().join(RUN_PREFIX);
        let cmd = self.command(request, &msa, &prefix);
        let command_line = describe(&cmd);
        info!(
            trees = request.num_trees,
            seed = request.seed,
            model = %request.model,
            "running RAxML-NG parsimony tree search"
        );

        let output = process::run(cmd, workdir.path(), request.timeout, request.cancel.as_ref())?;

        let output_file = |suffix: &str| PathBuf::from(format!("{}.raxml.{}", prefix.display(), suffix));
        let log_path = output_file("log");
        let log = std::fs::read_to_string(&log_path).ok();

        if !output.status.success() {
            return Err(PythiaError::ExternalToolExecution {
                command: command_line,
                exit_code: output.status.code(),
                details: failure_details(&output.stdout, &output.stderr, log.as_deref()),
            });
        }

        let trees_path = output_file("startTree");
        let trees = std::fs::read_to_string(&trees_path).map_err(|e| {
            PythiaError::ExternalToolOutputParse(format!(
                "expected tree file {} was not produced: {}",
                trees_path.display(),
                e
            ))
        })?;

        // RAxML-NG echoes its log to stdout, so fall back to that
        let log = log.unwrap_or_else(|| {
            warn!(path = %log_path.display(), "log file missing, using captured stdout");
            output.stdout.clone()
        });

        let tool_reduced_alignment = output_file("reduced.phy").exists();
        debug!(
            elapsed_ms = output.elapsed.as_millis() as u64,
            tool_reduced_alignment, "RAxML-NG finished"
        );

        Ok(RawInference {
            trees,
            log,
            tool_reduced_alignment,
        })
    }
}
