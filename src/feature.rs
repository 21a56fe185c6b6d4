//! Feature records produced from gene-model annotation lines.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::sequence::base_bit;
use crate::strand::Strand;

/// The annotation feature types that are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Exon,
    Cds,
    StartCodon,
    StopCodon,
}

impl FromStr for FeatureKind {
    type Err = Error;

    /// Parse GTF column 3.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exon" => Ok(Self::Exon),
            "CDS" => Ok(Self::Cds),
            "start_codon" => Ok(Self::StartCodon),
            "stop_codon" => Ok(Self::StopCodon),
            _ => Err(Error::UnrecognizedFeatureKind(s.to_string())),
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exon => "exon",
            Self::Cds => "CDS",
            Self::StartCodon => "start_codon",
            Self::StopCodon => "stop_codon",
        };
        write!(f, "{s}")
    }
}

/// GTF phase: bases to skip from the 5' end of a CDS to reach the next codon.
/// A base `d` positions from that end sits at codon offset `(d + 3 - phase) % 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Frame {
    #[default]
    Zero = 0,
    One = 1,
    Two = 2,
}

impl Frame {
    #[must_use]
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Parse GTF column 8. `.` means no frame and is read as zero.
    pub fn from_gtf(s: &str) -> Result<Self, Error> {
        match s {
            "0" | "." => Ok(Self::Zero),
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            _ => Err(Error::MalformedRecord(format!("invalid frame '{s}'"))),
        }
    }
}

/// Per-position 4-bit masks (A=1, C=2, G=4, T=8) of the bases that keep the
/// encoded amino acid, one entry per base of a CDS in genomic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegeneracyMask(Box<[u8]>);

impl DegeneracyMask {
    #[must_use]
    pub fn new(bits: Box<[u8]>) -> Self {
        Self(bits)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.0.get(offset).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Coding data carried only by CDS records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingSegment {
    pub frame: Frame,
    pub mask: DegeneracyMask,
}

/// A feature with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature {
    Exon,
    Cds(CodingSegment),
    StartCodon,
    StopCodon,
}

impl Feature {
    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        match self {
            Self::Exon => FeatureKind::Exon,
            Self::Cds(_) => FeatureKind::Cds,
            Self::StartCodon => FeatureKind::StartCodon,
            Self::StopCodon => FeatureKind::StopCodon,
        }
    }
}

/// Flags describing how a record sits inside its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    /// The 5' boundary is an exon junction preceded by the canonical acceptor `AG`.
    pub five_prime_splice_site: bool,
    /// The 3' boundary is an exon junction followed by the canonical donor `GT`.
    pub three_prime_splice_site: bool,
    /// The record holds the first coding triplet of its transcript.
    pub contains_start_codon: bool,
    /// The record holds the last coding triplet of its transcript.
    pub contains_stop_codon: bool,
}

/// An indexed gene-model feature. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub feature: Feature,
    pub gene: String,
    pub transcript_id: String,
    /// 1-based exon number within the transcript, 5' to 3'.
    pub exon_number: u32,
    pub flags: FeatureFlags,
    pub level: u32,
}

impl FeatureRecord {
    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        self.feature.kind()
    }

    #[must_use]
    pub fn is_coding(&self) -> bool {
        matches!(self.feature, Feature::Cds(_))
    }

    /// Frame of a CDS record; `None` for other kinds.
    #[must_use]
    pub fn frame(&self) -> Option<Frame> {
        match &self.feature {
            Feature::Cds(cds) => Some(cds.frame),
            _ => None,
        }
    }

    #[must_use]
    pub fn mask(&self) -> Option<&DegeneracyMask> {
        match &self.feature {
            Feature::Cds(cds) => Some(&cds.mask),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start <= end && start <= self.end
    }

    /// Degeneracy mask at a genomic position of this CDS.
    pub fn mask_at(&self, position: u32) -> Result<u8, Error> {
        let out_of_domain = || Error::QueryOutOfDomain {
            position,
            start: self.start,
            end: self.end,
        };
        let mask = self.mask().ok_or_else(out_of_domain)?;
        if position < self.start || position > self.end {
            return Err(out_of_domain());
        }
        mask.get((position - self.start) as usize)
            .ok_or_else(out_of_domain)
    }

    /// Whether `base` at `position` encodes the same amino acid as the
    /// reference. Bases are read on the reference strand. Positions outside
    /// the record, or records that are not CDS, are an error; ambiguity codes
    /// are never synonymous.
    pub fn is_synonymous(&self, position: u32, base: u8) -> Result<bool, Error> {
        let mask = self.mask_at(position)?;
        Ok(base_bit(base).is_some_and(|bit| mask & bit != 0))
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self
            .frame()
            .map_or_else(|| ".".to_string(), |fr| fr.value().to_string());
        let flag = |b: bool| if b { '1' } else { '0' };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}{}{}{}\t{}",
            self.chrom,
            self.start,
            self.end,
            self.strand,
            self.kind(),
            self.gene,
            self.transcript_id,
            self.exon_number,
            frame,
            flag(self.flags.five_prime_splice_site),
            flag(self.flags.three_prime_splice_site),
            flag(self.flags.contains_start_codon),
            flag(self.flags.contains_stop_codon),
            self.level,
        )
    }
}
