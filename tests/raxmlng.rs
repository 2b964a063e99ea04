// raxmlng.rs - RAxML-NG adapter against scripted stand-ins for the executable

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pythia::prelude::*;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Parse --prefix and --tree pars{N} like the real tool
const ARG_LOOP: &str = r#"
prefix=""
n=1
while [ $# -gt 0 ]; do
  case "$1" in
    --prefix) prefix="$2"; shift ;;
    --tree) n=$(echo "$2" | sed 's/pars{\(.*\)}/\1/'); shift ;;
  esac
  shift
done
"#;

fn alignment() -> Alignment {
    Alignment::new(
        [("A", "AACG"), ("B", "AACT"), ("C", "CCCG"), ("D", "CCCA")]
            .iter()
            .map(|(n, s)| (n.to_string(), s.as_bytes().to_vec()))
            .collect(),
    )
    .unwrap()
}

fn options(num_trees: usize) -> InferenceOptions {
    InferenceOptions {
        num_trees,
        ..Default::default()
    }
}

#[test]
fn test_successful_run() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        r#"{}
i=0
: > "$prefix.raxml.startTree"
while [ $i -lt $n ]; do
  echo "((A,B),(C,D));" >> "$prefix.raxml.startTree"
  i=$((i+1))
done
echo "Alignment sites / patterns: 4 / 4" > "$prefix.raxml.log"
echo "Elapsed time: 0.010 seconds" >> "$prefix.raxml.log"
"#,
        ARG_LOOP
    );
    let exe = script(dir.path(), "raxml-ng", &body);
    let provider = RaxmlNg::new(&exe).unwrap();
    let (set, log) = infer_parsimony_trees(&provider, &alignment(), &options(3)).unwrap();
    assert_eq!(set.len(), 3);
    // no scores in the log, computed locally
    assert_eq!(set.scores(), vec![4, 4, 4]);
    assert!(log.contains("Elapsed time"));
}

#[test]
fn test_concurrent_runs_do_not_share_output() {
    let dir = tempfile::tempdir().unwrap();
    // each run writes the tree matching its own seed
    let body = format!(
        r#"seed=""
for a in "$@"; do
  if [ "$prev" = "--seed" ]; then seed="$a"; fi
  prev="$a"
done
{}
sleep 0.2
if [ "$seed" = "1" ]; then
  echo "((A,B),(C,D));" > "$prefix.raxml.startTree"
else
  echo "((A,C),(B,D));" > "$prefix.raxml.startTree"
fi
"#,
        ARG_LOOP
    );
    let exe = script(dir.path(), "raxml-ng", &body);
    let provider = RaxmlNg::new(&exe).unwrap();
    let aln = alignment();

    let (first, second) = std::thread::scope(|s| {
        let run = |seed| {
            let provider = &provider;
            let aln = &aln;
            s.spawn(move || {
                let opts = InferenceOptions {
                    seed,
                    num_trees: 1,
                    ..Default::default()
                };
                infer_parsimony_trees(provider, aln, &opts).unwrap().0
            })
        };
        let a = run(1);
        let b = run(2);
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(first.scores(), vec![4]);
    assert_eq!(second.scores(), vec![6]);
}

#[test]
fn test_tool_side_reduction_detected() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        r#"{}
echo "((A,B),(C,D));" > "$prefix.raxml.startTree"
echo "" > "$prefix.raxml.log"
echo "4 1" > "$prefix.raxml.reduced.phy"
"#,
        ARG_LOOP
    );
    let exe = script(dir.path(), "raxml-ng", &body);
    let provider = RaxmlNg::new(&exe).unwrap();
    let aln = alignment();
    let request = InferenceRequest {
        alignment: &aln,
        model: aln.default_model(),
        seed: 0,
        num_trees: 1,
        threads: None,
        timeout: None,
        cancel: None,
    };
    let raw = provider.infer(&request).unwrap();
    assert!(raw.tool_reduced_alignment);
    assert_eq!(raw.trees.trim(), "((A,B),(C,D));");
}

#[test]
fn test_nonzero_exit_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let exe = script(
        dir.path(),
        "raxml-ng",
        "echo 'ERROR: Invalid model name: GTR+G'\necho 'some noise' 1>&2\nexit 2\n",
    );
    let provider = RaxmlNg::new(&exe).unwrap();
    let err = infer_parsimony_trees(&provider, &alignment(), &options(1)).unwrap_err();
    match &err {
        PythiaError::ExternalToolExecution { exit_code, details, command } => {
            assert_eq!(*exit_code, Some(2));
            assert!(details.contains("Invalid model name"));
            assert!(command.contains("--tree pars{1}"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 6);
}

#[test]
fn test_missing_tree_file() {
    let dir = tempfile::tempdir().unwrap();
    let exe = script(dir.path(), "raxml-ng", "exit 0\n");
    let provider = RaxmlNg::new(&exe).unwrap();
    let err = infer_parsimony_trees(&provider, &alignment(), &options(1)).unwrap_err();
    assert!(matches!(err, PythiaError::ExternalToolOutputParse(_)));
}

#[test]
fn test_wrong_tree_count() {
    let dir = tempfile::tempdir().unwrap();
    let body = format!(
        "{}\necho \"((A,B),(C,D));\" > \"$prefix.raxml.startTree\"\n",
        ARG_LOOP
    );
    let exe = script(dir.path(), "raxml-ng", &body);
    let provider = RaxmlNg::new(&exe).unwrap();
    let err = infer_parsimony_trees(&provider, &alignment(), &options(5)).unwrap_err();
    match err {
        PythiaError::ExternalToolOutputParse(msg) => assert!(msg.contains("expected 5 trees, got 1")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_timeout_kills_tool() {
    let dir = tempfile::tempdir().unwrap();
    let exe = script(
        dir.path(),
        "raxml-ng",
        "echo 'Generating 1 parsimony starting tree(s)'\necho 'slow start' 1>&2\nsleep 30\n",
    );
    let provider = RaxmlNg::new(&exe).unwrap();
    let opts = InferenceOptions {
        num_trees: 1,
        timeout: Some(Duration::from_millis(300)),
        ..Default::default()
    };
    let start = Instant::now();
    let err = infer_parsimony_trees(&provider, &alignment(), &opts).unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(10));
    match &err {
        PythiaError::ExternalToolTimeout { details, command, .. } => {
            assert!(details.contains("Generating 1 parsimony starting tree(s)"));
            assert!(details.contains("slow start"));
            assert!(command.contains("--start"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 8);
}

#[test]
fn test_executable_checks() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        RaxmlNg::new(&missing),
        Err(PythiaError::ExternalToolNotFound { .. })
    ));

    let not_executable = dir.path().join("raxml-ng.txt");
    std::fs::write(&not_executable, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&not_executable, std::fs::Permissions::from_mode(0o644)).unwrap();
    let err = RaxmlNg::new(&not_executable).unwrap_err();
    assert_eq!(err.exit_code(), 5);
    assert!(err.to_string().contains("not executable"));

    assert!(RaxmlNg::new(dir.path()).is_err());
}
