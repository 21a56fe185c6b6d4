//! FASTA reference read through its samtools `.fai` index.
//!
//! Only the bases a query asks for are read from disk, so genome-sized
//! references can be served without loading them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use bio::io::fasta::IndexedReader;
use log::debug;

use crate::error::Error;

use super::SequenceFetcher;

/// Path of the `.fai` index that accompanies a FASTA file.
#[must_use]
pub fn fai_path(fasta: &Path) -> PathBuf {
    let mut path = OsString::from(fasta.as_os_str());
    path.push(".fai");
    PathBuf::from(path)
}

/// Indexed random access to an uncompressed FASTA file.
pub struct IndexedFasta {
    reader: RefCell<IndexedReader<BufReader<File>>>,
    lengths: HashMap<String, u32>,
}

impl IndexedFasta {
    /// Open `path` together with `<path>.fai`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let index = fai_path(path);
        let open = |p: &Path| {
            File::open(p).map_err(|source| Error::MissingSource {
                path: p.to_path_buf(),
                source,
            })
        };
        let fasta = open(path)?;
        let fai = open(&index)?;

        let reader = IndexedReader::new(BufReader::new(fasta), BufReader::new(fai))
            .map_err(|e| Error::Parse(format!("invalid FASTA index {}: {e}", index.display())))?;

        let mut lengths = HashMap::new();
        for sequence in reader.index.sequences() {
            let len = u32::try_from(sequence.len).map_err(|_| {
                Error::Validation(format!("contig {} exceeds {} bases", sequence.name, u32::MAX))
            })?;
            lengths.insert(sequence.name, len);
        }
        debug!("{}: {} indexed contigs", path.display(), lengths.len());

        Ok(Self {
            reader: RefCell::new(reader),
            lengths,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

impl SequenceFetcher for IndexedFasta {
    fn fetch(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<u8>, Error> {
        let length = self
            .contig_length(chrom)
            .ok_or_else(|| Error::UnknownContig(chrom.to_string()))?;
        if start == 0 || start > end || end > length {
            return Err(Error::SequenceOutOfRange {
                chrom: chrom.to_string(),
                start,
                end,
                length,
            });
        }

        let mut reader = self.reader.borrow_mut();
        reader.fetch(chrom, u64::from(start - 1), u64::from(end))?;
        let mut seq = Vec::with_capacity((end - start + 1) as usize);
        reader.read(&mut seq)?;
        seq.make_ascii_uppercase();
        Ok(seq)
    }

    fn contig_length(&self, chrom: &str) -> Option<u32> {
        self.lengths.get(chrom).copied()
    }
}
