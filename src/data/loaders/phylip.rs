// phylip.rs - Relaxed PHYLIP reader and writer (sequential or interleaved)

use std::io::Write;
use std::path::Path;

use crate::data::alignment::Alignment;
use crate::error::{PythiaError, Result};

/// Read `(name, sequence)` records from relaxed PHYLIP text.
///
/// Names are whitespace-delimited tokens of any length. Sequential layout is
/// tried first; if it does not account for every line, the interleaved
/// layout is tried.
pub fn parse_records(source: &Path, content: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines
        .next()
        .ok_or_else(|| PythiaError::parse(source, "file is empty"))?;
    let (n_taxa, n_sites) = parse_dimensions(header)
        .ok_or_else(|| PythiaError::parse(source, format!("invalid PHYLIP header '{}'", header)))?;

    if n_taxa == 0 || n_sites == 0 {
        return Err(PythiaError::parse(
            source,
            format!("PHYLIP header declares {} taxa and {} sites", n_taxa, n_sites),
        ));
    }

    let body: Vec<&str> = lines.collect();
    match parse_sequential(&body, n_taxa, n_sites) {
        Ok(records) => Ok(records),
        Err(sequential_err) => parse_interleaved(&body, n_taxa, n_sites).map_err(|interleaved_err| {
            PythiaError::parse(
                source,
                format!(
                    "not readable as sequential PHYLIP ({}) nor as interleaved PHYLIP ({})",
                    sequential_err, interleaved_err
                ),
            )
        }),
    }
}

fn parse_dimensions(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let n_taxa = fields.next()?.parse().ok()?;
    let n_sites = fields.next()?.parse().ok()?;
    Some((n_taxa, n_sites))
}

/// Split a `name  SEQ UEN CE` line into the name and the whitespace-free sequence
fn split_name_seq(line: &str) -> (String, Vec<u8>) {
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_string(), strip_whitespace(rest)),
        None => (line.to_string(), Vec::new()),
    }
}

fn strip_whitespace(s: &str) -> Vec<u8> {
    s.bytes().filter(|c| !c.is_ascii_whitespace()).collect()
}

fn parse_sequential(
    body: &[&str],
    n_taxa: usize,
    n_sites: usize,
) -> std::result::Result<Vec<(String, Vec<u8>)>, String> {
    let mut records = Vec::with_capacity(n_taxa);
    let mut lines = body.iter();

    for t in 0..n_taxa {
        let line = lines
            .next()
            .ok_or_else(|| format!("expected {} taxa, found {}", n_taxa, t))?;
        let (name, mut seq) = split_name_seq(line);
        while seq.len() < n_sites {
            let cont = lines
                .next()
                .ok_or_else(|| format!("sequence of '{}' ends after {} of {} sites", name, seq.len(), n_sites))?;
            seq.extend(strip_whitespace(cont));
        }
        if seq.len() != n_sites {
            return Err(format!("sequence of '{}' has {} sites, expected {}", name, seq.len(), n_sites));
        }
        records.push((name, seq));
    }

    if let Some(extra) = lines.next() {
        return Err(format!("unexpected trailing line '{}'", truncate(extra)));
    }
    Ok(records)
}

fn parse_interleaved(
    body: &[&str],
    n_taxa: usize,
    n_sites: usize,
) -> std::result::Result<Vec<(String, Vec<u8>)>, String> {
    if body.len() < n_taxa {
        return Err(format!("expected {} taxa, found {}", n_taxa, body.len()));
    }

    let mut records: Vec<(String, Vec<u8>)> = body[..n_taxa].iter().map(|l| split_name_seq(l)).collect();
    for (i, line) in body[n_taxa..].iter().enumerate() {
        records[i % n_taxa].1.extend(strip_whitespace(line));
    }

    if (body.len() - n_taxa) % n_taxa != 0 {
        return Err(format!(
            "{} continuation lines do not form complete blocks of {} taxa",
            body.len() - n_taxa,
            n_taxa
        ));
    }
    if let Some((name, seq)) = records.iter().find(|(_, s)| s.len() != n_sites) {
        return Err(format!("sequence of '{}' has {} sites, expected {}", name, seq.len(), n_sites));
    }
    Ok(records)
}

fn truncate(line: &str) -> String {
    line.chars().take(30).collect()
}

/// Write an alignment as sequential relaxed PHYLIP
pub fn write_phylip<W: Write>(alignment: &Alignment, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{} {}", alignment.num_taxa(), alignment.num_sites())?;
    for (name, seq) in alignment.rows() {
        write!(writer, "{} ", name)?;
        writer.write_all(seq)?;
        writeln!(writer)?;
    }
    writer.flush()
}
