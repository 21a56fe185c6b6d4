//! Coding consequence of small variants over the records returned by a
//! search.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::feature::FeatureRecord;

/// Effect of an insertion or deletion on the reading frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndelEffect {
    Frameshift,
    InFrame,
    /// No CDS record overlaps the indel.
    NotCoding,
}

/// Effect of a single-base substitution on the encoded amino acid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionEffect {
    Synonymous,
    NonSynonymous,
    NotCoding,
}

impl fmt::Display for IndelEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Frameshift => "frameshift",
            Self::InFrame => "in-frame",
            Self::NotCoding => "non-coding",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for SubstitutionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Synonymous => "synonymous",
            Self::NonSynonymous => "non-synonymous",
            Self::NotCoding => "non-coding",
        };
        write!(f, "{s}")
    }
}

/// An indel shifts the frame when its length is not a multiple of three.
/// Positive lengths are insertions, negative lengths deletions.
#[must_use]
pub fn is_frameshift(length: i64) -> bool {
    length % 3 != 0
}

/// Classify an indel of `length` against the records overlapping it.
#[must_use]
pub fn classify_indel(records: &[Arc<FeatureRecord>], length: i64) -> IndelEffect {
    if !records.iter().any(|r| r.is_coding()) {
        IndelEffect::NotCoding
    } else if is_frameshift(length) {
        IndelEffect::Frameshift
    } else {
        IndelEffect::InFrame
    }
}

/// Classify substituting `base` at `position` against the overlapping
/// records. A change is non-synonymous if any overlapping CDS sees a
/// different amino acid.
pub fn classify_substitution(
    records: &[Arc<FeatureRecord>],
    position: u32,
    base: u8,
) -> Result<SubstitutionEffect, Error> {
    let mut effect = SubstitutionEffect::NotCoding;
    for record in records.iter().filter(|r| r.is_coding()) {
        if record.is_synonymous(position, base)? {
            if effect == SubstitutionEffect::NotCoding {
                effect = SubstitutionEffect::Synonymous;
            }
        } else {
            return Ok(SubstitutionEffect::NonSynonymous);
        }
    }
    Ok(effect)
}
