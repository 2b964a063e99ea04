// fasta.rs - FASTA alignment reader

use std::path::Path;

use bio::io::fasta;

use crate::error::{PythiaError, Result};

/// Read `(name, sequence)` records from FASTA text.
///
/// The taxon name is the full header line; a header with a description
/// therefore contains whitespace and is rejected during validation.
pub fn parse_records(source: &Path, content: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let reader = fasta::Reader::new(content.as_bytes());
    let mut records = Vec::new();

    for (idx, record_result) in reader.records().enumerate() {
        let record = record_result.map_err(|e| {
            PythiaError::parse(source, format!("invalid FASTA record {}: {}", idx + 1, e))
        })?;

        let name = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        let sequence: Vec<u8> = record
            .seq()
            .iter()
            .copied()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        records.push((name, sequence));
    }

    Ok(records)
}
