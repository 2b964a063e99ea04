// log_parser.rs - Extract run statistics from RAxML-NG log text

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Values recovered from a tree-search log; absent lines leave fields empty
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InferenceLog {
    pub num_sites: Option<usize>,
    pub num_patterns: Option<usize>,
    /// Gap proportion in `[0, 1]` (the log reports percent)
    pub proportion_gaps: Option<f64>,
    /// Invariant-site proportion in `[0, 1]`
    pub proportion_invariant: Option<f64>,
    /// One score per starting tree, in output order
    pub parsimony_scores: Vec<u64>,
    pub elapsed_seconds: Option<f64>,
    pub rf_summary: Option<RfLogSummary>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Summary printed by `raxml-ng --rfdist`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RfLogSummary {
    pub num_topologies: usize,
    pub average_absolute: f64,
    pub average_relative: f64,
}

struct LogPatterns {
    sites_patterns: Regex,
    sites: Regex,
    patterns: Regex,
    gaps: Regex,
    invariant: Regex,
    parsimony: Regex,
    elapsed: Regex,
    rf_topologies: Regex,
    rf_absolute: Regex,
    rf_relative: Regex,
}

fn patterns() -> &'static LogPatterns {
    static PATTERNS: OnceLock<LogPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |p: &str| Regex::new(p).unwrap_or_else(|e| panic!("invalid log pattern {p}: {e}"));
        LogPatterns {
            sites_patterns: re(r"Alignment sites\s*/\s*patterns:\s*(\d+)\s*/\s*(\d+)"),
            sites: re(r"Alignment sites:\s*(\d+)"),
            patterns: re(r"Alignment patterns:\s*(\d+)"),
            gaps: re(r"Gaps:\s*([0-9]*\.?[0-9]+)\s*%"),
            invariant: re(r"Invariant sites:\s*([0-9]*\.?[0-9]+)\s*%"),
            parsimony: re(r"(?i)parsimony score(?: of starting tree #\d+)?\s*:\s*(\d+)"),
            elapsed: re(r"Elapsed time:\s*([0-9]*\.?[0-9]+)\s*seconds"),
            rf_topologies: re(r"Number of unique topologies in this tree set:\s*(\d+)"),
            rf_absolute: re(r"Average absolute RF distance in this tree set:\s*([0-9]*\.?[0-9]+)"),
            rf_relative: re(r"Average relative RF distance in this tree set:\s*([0-9]*\.?[0-9]+)"),
        }
    })
}

fn capture<T: std::str::FromStr>(re: &Regex, line: &str, group: usize) -> Option<T> {
    re.captures(line)
        .and_then(|c| c.get(group))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse a RAxML-NG log. Unknown lines are ignored.
pub fn parse_raxml_log(text: &str) -> InferenceLog {
    let p = patterns();
    let mut log = InferenceLog::default();
    let mut rf_topologies = None;
    let mut rf_absolute = None;
    let mut rf_relative = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("ERROR") {
            log.errors.push(trimmed.to_string());
        } else if trimmed.starts_with("WARNING") {
            log.warnings.push(trimmed.to_string());
        }

        if let Some(c) = p.sites_patterns.captures(line) {
            log.num_sites = c[1].parse().ok();
            log.num_patterns = c[2].parse().ok();
            continue;
        }
        if let Some(v) = capture(&p.sites, line, 1) {
            log.num_sites = Some(v);
        }
        if let Some(v) = capture(&p.patterns, line, 1) {
            log.num_patterns = Some(v);
        }
        if let Some(v) = capture::<f64>(&p.gaps, line, 1) {
            log.proportion_gaps = Some(v / 100.0);
        }
        if let Some(v) = capture::<f64>(&p.invariant, line, 1) {
            log.proportion_invariant = Some(v / 100.0);
        }
        if let Some(v) = capture(&p.parsimony, line, 1) {
            log.parsimony_scores.push(v);
        }
        if let Some(v) = capture(&p.elapsed, line, 1) {
            log.elapsed_seconds = Some(v);
        }
        rf_topologies = rf_topologies.or_else(|| capture(&p.rf_topologies, line, 1));
        rf_absolute = rf_absolute.or_else(|| capture(&p.rf_absolute, line, 1));
        rf_relative = rf_relative.or_else(|| capture(&p.rf_relative, line, 1));
    }

    if let (Some(num_topologies), Some(average_absolute), Some(average_relative)) =
        (rf_topologies, rf_absolute, rf_relative)
    {
        log.rf_summary = Some(RfLogSummary {
            num_topologies,
            average_absolute,
            average_relative,
        });
    }
    log
}
