//! Error types for the annosyn library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or querying annotations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The annotation or reference file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    MissingSource {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An annotation line with the wrong column count or bad coordinates.
    /// The line is dropped and loading continues.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A feature type outside exon / CDS / start_codon / stop_codon.
    #[error("unrecognized feature kind: '{0}'")]
    UnrecognizedFeatureKind(String),

    /// The reference cannot supply the requested bases.
    #[error("{chrom}:{start}-{end} is outside the contig (length {length})")]
    SequenceOutOfRange {
        chrom: String,
        start: u32,
        end: u32,
        length: u32,
    },

    /// The reference has no contig with this name.
    #[error("unknown contig: '{0}'")]
    UnknownContig(String),

    /// A synonymous-site query outside the coding span of a record.
    #[error("position {position} is outside the coding span {start}-{end}")]
    QueryOutOfDomain { position: u32, start: u32, end: u32 },

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),
}
