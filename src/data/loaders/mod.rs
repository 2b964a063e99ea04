// mod.rs - Alignment file loaders with content-based format detection

pub mod fasta;
pub mod phylip;

use std::path::Path;

use tracing::{debug, info};

use crate::data::alignment::Alignment;
use crate::error::{PythiaError, Result};

/// On-disk alignment formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    Fasta,
    /// Relaxed PHYLIP, sequential or interleaved
    Phylip,
}

/// Detect the format from the first non-blank line of the content
pub fn detect_format(source: &Path, content: &str) -> Result<AlignmentFormat> {
    let first = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| PythiaError::parse(source, "file is empty"))?;

    if first.starts_with('>') {
        return Ok(AlignmentFormat::Fasta);
    }

    let mut fields = first.split_whitespace();
    let header_ints = fields.next().map(|f| f.parse::<usize>().is_ok()).unwrap_or(false)
        && fields.next().map(|f| f.parse::<usize>().is_ok()).unwrap_or(false);
    if header_ints {
        return Ok(AlignmentFormat::Phylip);
    }

    Err(PythiaError::parse(
        source,
        "format could not be detected: expected FASTA ('>' header) or relaxed PHYLIP ('<taxa> <sites>' header)",
    ))
}

/// Parse alignment text whose origin is `source`
pub fn parse_alignment(source: &Path, content: &str) -> Result<Alignment> {
    parse_as(source, content, detect_format(source, content)?)
}

/// Parse alignment text in an already known format
pub fn parse_as(source: &Path, content: &str, format: AlignmentFormat) -> Result<Alignment> {
    let records = match format {
        AlignmentFormat::Fasta => fasta::parse_records(source, content)?,
        AlignmentFormat::Phylip => phylip::parse_records(source, content)?,
    };
    Alignment::from_records(source, records)
}

/// Load and validate an alignment from a FASTA or relaxed PHYLIP file
pub fn load(path: &Path) -> Result<Alignment> {
    let bytes = std::fs::read(path).map_err(|e| PythiaError::io(path, e))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| PythiaError::parse(path, format!("file is not valid UTF-8 text ({})", e)))?;

    let format = detect_format(path, &content)?;
    debug!(?format, path = %path.display(), "detected alignment format");

    let alignment = parse_as(path, &content, format)?;
    info!(
        taxa = alignment.num_taxa(),
        sites = alignment.num_sites(),
        data_type = %alignment.data_type(),
        "loaded alignment {}",
        path.display()
    );
    Ok(alignment)
}
