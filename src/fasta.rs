//! Parser for FASTA reference files.

use std::io::BufRead;

use crate::error::Error;

/// Reads FASTA and returns (contig name, sequence) pairs in file order.
///
/// The contig name is the first whitespace-delimited token after `>`.
/// Sequence bases are uppercased. When `keep` is given, contigs it rejects
/// are skipped without buffering their sequence.
pub fn parse_fasta<R: BufRead>(
    reader: R,
    keep: Option<&dyn Fn(&str) -> bool>,
) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let mut results: Vec<(String, Vec<u8>)> = Vec::new();
    let mut current: Option<(String, Vec<u8>)> = None;
    let mut skipping = false;

    for line in reader.lines() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                results.push(record);
            }
            let name = contig_name(header)?;
            skipping = keep.is_some_and(|keep| !keep(&name));
            if !skipping {
                current = Some((name, Vec::new()));
            }
        } else if !skipping {
            if let Some((_, sequence)) = current.as_mut() {
                let start = sequence.len();
                sequence.extend_from_slice(line.trim().as_bytes());
                sequence[start..].make_ascii_uppercase();
            }
        }
    }

    if let Some(record) = current {
        results.push(record);
    }

    Ok(results)
}

fn contig_name(header: &str) -> Result<String, Error> {
    let first_token = header.split_whitespace().next().unwrap_or("");
    if first_token.is_empty() {
        return Err(Error::Parse(format!("empty FASTA header: >{header}")));
    }
    Ok(first_token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::wrap_read;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    fn make_gz(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn parse_single_sequence() {
        let fasta = b">chr1 Homo sapiens chromosome 1\nACGTacgt\nNNNN\n";
        let results = parse_fasta(Cursor::new(fasta), None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "chr1");
        assert_eq!(results[0].1, b"ACGTACGTNNNN");
    }

    #[test]
    fn parse_gzip_multiple_sequences() {
        let gz = make_gz(b">chr1\nACGT\n>chr2\nTTTT\nAAAA\n>chr3\nGGG\n");
        let reader = wrap_read(Cursor::new(gz)).unwrap();
        let results = parse_fasta(reader, None).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].0, "chr2");
        assert_eq!(results[1].1, b"TTTTAAAA");
        assert_eq!(results[2].1, b"GGG");
    }

    #[test]
    fn filter_skips_unwanted_contigs() {
        let fasta = b">chr1\nACGT\n>chr2\nTTTT\n>chr3\nGGG\n";
        let keep = |name: &str| name != "chr2";
        let results = parse_fasta(Cursor::new(fasta), Some(&keep)).unwrap();
        let names: Vec<&str> = results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["chr1", "chr3"]);
        assert_eq!(results[1].1, b"GGG");
    }

    #[test]
    fn empty_header_error() {
        assert!(parse_fasta(Cursor::new(b">\nACGT\n"), None).is_err());
    }

    #[test]
    fn text_before_first_header_ignored() {
        let results = parse_fasta(Cursor::new(b"ACGT\n>chr1\nGG\n"), None).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1, b"GG");
    }
}
