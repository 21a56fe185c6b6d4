//! Reference sequence access.
//!
//! Everything downstream only needs random access to bases by contig and
//! 1-based inclusive range; [`SequenceFetcher`] is that capability and any
//! indexed reader that honours it can be plugged into the annotation store.

pub mod indexed;
pub mod reader;

use std::path::Path;

use log::info;

use crate::error::Error;

pub use indexed::{IndexedFasta, fai_path};
pub use reader::FastaReference;

/// Random access to reference bases.
pub trait SequenceFetcher {
    /// Bases of `chrom` from `start` to `end`, 1-based and inclusive, uppercased.
    ///
    /// Fails with [`Error::SequenceOutOfRange`] when any part of the range lies
    /// outside the contig and with [`Error::UnknownContig`] for unknown names.
    fn fetch(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<u8>, Error>;

    /// Contig length, if the contig is known.
    fn contig_length(&self, chrom: &str) -> Option<u32>;
}

impl<T: SequenceFetcher + ?Sized> SequenceFetcher for &T {
    fn fetch(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<u8>, Error> {
        (**self).fetch(chrom, start, end)
    }

    fn contig_length(&self, chrom: &str) -> Option<u32> {
        (**self).contig_length(chrom)
    }
}

/// A reference opened from disk: read through its `.fai` index when one sits
/// next to an uncompressed FASTA, held in memory otherwise.
pub enum Reference {
    Indexed(IndexedFasta),
    InMemory(FastaReference),
}

impl Reference {
    /// Open `path`. `keep` limits which contigs are loaded when the file has
    /// to be read into memory; an indexed reference serves every contig.
    pub fn open(path: &Path, keep: Option<&dyn Fn(&str) -> bool>) -> Result<Self, Error> {
        if fai_path(path).is_file() && !crate::reader::is_gzip(path)? {
            info!("reading {} through its .fai index", path.display());
            return Ok(Self::Indexed(IndexedFasta::from_path(path)?));
        }
        info!("loading {} into memory", path.display());
        let reference = match keep {
            Some(keep) => FastaReference::from_path_filtered(path, keep)?,
            None => FastaReference::from_path(path)?,
        };
        Ok(Self::InMemory(reference))
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed(_))
    }

    /// Number of contigs available.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Indexed(r) => r.len(),
            Self::InMemory(r) => r.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SequenceFetcher for Reference {
    fn fetch(&self, chrom: &str, start: u32, end: u32) -> Result<Vec<u8>, Error> {
        match self {
            Self::Indexed(r) => r.fetch(chrom, start, end),
            Self::InMemory(r) => r.fetch(chrom, start, end),
        }
    }

    fn contig_length(&self, chrom: &str) -> Option<u32> {
        match self {
            Self::Indexed(r) => r.contig_length(chrom),
            Self::InMemory(r) => r.contig_length(chrom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use super::indexed::tests::write_indexed_fasta;

    #[test]
    fn index_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_indexed_fasta(
            dir.path(),
            &[("chr1", &b"ACGTACGTAC"[..]), ("chr2", &b"GGCC"[..])],
        );

        let keep: &dyn Fn(&str) -> bool = &|c| c == "chr2";
        let reference = Reference::open(&path, Some(keep)).unwrap();
        assert!(reference.is_indexed());
        assert_eq!(reference.len(), 2);
        assert_eq!(reference.fetch("chr1", 3, 6).unwrap(), b"GTAC");

        std::fs::remove_file(fai_path(&path)).unwrap();
        let reference = Reference::open(&path, Some(keep)).unwrap();
        assert!(!reference.is_indexed());
        assert_eq!(reference.len(), 1);
        assert_eq!(reference.fetch("chr2", 1, 4).unwrap(), b"GGCC");
        assert!(matches!(reference.fetch("chr1", 1, 2), Err(Error::UnknownContig(_))));
    }

    #[test]
    fn gzipped_reference_loads_into_memory() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genome.fa.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(b">chr1\nACGTAC\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();
        std::fs::write(fai_path(&path), "chr1\t6\t6\t6\t7\n").unwrap();

        let reference = Reference::open(&path, None).unwrap();
        assert!(!reference.is_indexed());
        assert_eq!(reference.fetch("chr1", 2, 3).unwrap(), b"CG");
    }
}
