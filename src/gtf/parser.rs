//! GTF line and attribute parser.

use crate::error::Error;
use crate::feature::{FeatureKind, Frame};
use crate::strand::Strand;

use super::entry::{GtfAttributes, GtfEntry};

/// Result of parsing a single GTF line.
pub enum ParsedLine {
    Entry(Box<GtfEntry>),
    /// A line for a chromosome that was not requested.
    OtherChromosome,
    /// A well-formed line whose feature kind is not indexed.
    Skipped(String),
    Comment,
}

/// Parse a single GTF line into a structured entry.
///
/// The chromosome column is checked first so lines of chromosomes that are
/// not being built are passed over without validation.
///
/// Exon, CDS and start/stop codon lines must carry a `transcript_id`
/// attribute: records are grouped into transcripts by that key, so a line
/// without it is a `MalformedRecord` and is dropped by the reader.
pub fn parse_line(line: &str, keep_chrom: &dyn Fn(&str) -> bool) -> Result<ParsedLine, Error> {
    if line.starts_with('#') {
        return Ok(ParsedLine::Comment);
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ParsedLine::Comment);
    }

    let chrom = line.split('\t').next().unwrap_or_default();
    if !keep_chrom(chrom) {
        return Ok(ParsedLine::OtherChromosome);
    }

    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 9 {
        return Err(Error::MalformedRecord(format!(
            "GTF line has {} columns, expected 9",
            columns.len()
        )));
    }

    // Column 3: feature kind (unknown kinds are skipped, not errors)
    let kind: FeatureKind = match columns[2].parse() {
        Ok(kind) => kind,
        Err(_) => return Ok(ParsedLine::Skipped(columns[2].to_string())),
    };

    // Column 4 & 5: start and end
    let start = parse_coordinate("start", columns[3])?;
    let end = parse_coordinate("end", columns[4])?;
    if start > end {
        return Err(Error::MalformedRecord(format!(
            "start {start} is greater than end {end}"
        )));
    }

    // Column 7: strand
    let strand = Strand::from_gtf(columns[6])?;

    // Column 8: frame, only meaningful for CDS
    let frame = match kind {
        FeatureKind::Cds => Frame::from_gtf(columns[7])?,
        _ => Frame::Zero,
    };

    // Column 9: attributes
    let attributes = split_attributes(columns[8]);
    if attributes.transcript_id().is_none() {
        return Err(Error::MalformedRecord(format!(
            "{kind} at {chrom}:{start}-{end} has no transcript_id"
        )));
    }

    Ok(ParsedLine::Entry(Box::new(GtfEntry {
        chrom: chrom.to_string(),
        start,
        end,
        kind,
        strand,
        frame,
        attributes,
    })))
}

fn parse_coordinate(name: &str, value: &str) -> Result<u32, Error> {
    let coordinate: u32 = value
        .trim()
        .parse()
        .map_err(|e| Error::MalformedRecord(format!("invalid {name} '{value}': {e}")))?;
    if coordinate == 0 {
        return Err(Error::MalformedRecord(format!(
            "{name} must be 1-based, got 0"
        )));
    }
    Ok(coordinate)
}

/// Split GTF column 9 into key/value pairs.
///
/// Tokens are separated by `;`; each token is split at its first run of
/// whitespace into key and value, and one pair of surrounding double quotes
/// is removed from the value. A key without a value maps to an empty string.
pub fn split_attributes(attrs_str: &str) -> GtfAttributes {
    let mut attrs = GtfAttributes::default();

    for token in attrs_str.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let (key, value) = match token.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (token, ""),
        };
        attrs.insert(key, strip_quotes(value));
    }

    attrs
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
