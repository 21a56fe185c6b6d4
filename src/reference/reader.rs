//! In-memory FASTA reference.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::Error;
use crate::fasta;
use crate::reader::open_text;

use super::SequenceFetcher;

/// Reference contigs held fully in memory, keyed by name.
#[derive(Debug, Default)]
pub struct FastaReference {
    contigs: HashMap<String, Vec<u8>>,
}

impl FastaReference {
    /// Load every contig of a plain or gzipped FASTA file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::from_reader(open_text(path)?, None)
    }

    /// Load only the contigs accepted by `keep`.
    pub fn from_path_filtered(path: &Path, keep: &dyn Fn(&str) -> bool) -> Result<Self, Error> {
        Self::from_reader(open_text(path)?, Some(keep))
    }

    pub fn from_reader<R: BufRead>(
        reader: R,
        keep: Option<&dyn Fn(&str) -> bool>,
    ) -> Result<Self, Error> {
        let mut contigs = HashMap::new();
        for (name, sequence) in fasta::parse_fasta(reader, keep)? {
            if u32::try_from(sequence.len()).is_err() {
                return Err(Error::Validation(format!(
                    "contig {name} exceeds {} bases",
                    u32::MAX
                )));
            }
            if contigs.insert(name.clone(), sequence).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate contig in reference FASTA: {name}"
                )));
            }
        }
        Ok(Self { contigs })
    }

    /// Build from (name, sequence) pairs; sequences are uppercased.
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let contigs = sequences
            .into_iter()
            .map(|(name, mut seq)| {
                seq.make_ascii_uppercase();
                (name.into(), seq)
            })
            .collect();
        Self { contigs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }
}

impl SequenceFetcher for FastaReference {
    fn fetch(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<u8>, Error> {
        let sequence = self
            .contigs
            .get(chrom)
            .ok_or_else(|| Error::UnknownContig(chrom.to_string()))?;
        let length = sequence.len() as u32;

        if start < 1 || start > end || end > length {
            return Err(Error::SequenceOutOfRange {
                chrom: chrom.to_string(),
                start,
                end,
                length,
            });
        }

        Ok(sequence[(start - 1) as usize..end as usize].to_vec())
    }

    fn contig_length(&self, chrom: &str) -> Option<u32> {
        self.contigs.get(chrom).map(|s| s.len() as u32)
    }
}
