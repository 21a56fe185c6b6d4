//! GTF data structures for parsed lines.

use std::collections::HashMap;

use crate::feature::{FeatureKind, Frame};
use crate::strand::Strand;

/// Key/value pairs from GTF column 9. Repeated keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GtfAttributes {
    values: HashMap<String, String>,
}

impl GtfAttributes {
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Value of `key`; absence is not an error.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn transcript_id(&self) -> Option<&str> {
        self.get("transcript_id").filter(|s| !s.is_empty())
    }

    /// Gene label: `gene_name`, falling back to `gene_id`.
    #[must_use]
    pub fn gene(&self) -> Option<&str> {
        self.get("gene_name")
            .filter(|s| !s.is_empty())
            .or_else(|| self.get("gene_id").filter(|s| !s.is_empty()))
    }

    /// Annotation level (GENCODE `level`), 0 when absent or not numeric.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.get("level").and_then(|l| l.parse().ok()).unwrap_or(0)
    }
}

/// A single parsed GTF line of an indexed feature kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtfEntry {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub kind: FeatureKind,
    pub strand: Strand,
    pub frame: Frame,
    pub attributes: GtfAttributes,
}

impl GtfEntry {
    #[must_use]
    pub fn transcript_id(&self) -> &str {
        self.attributes.transcript_id().unwrap_or_default()
    }

    /// The boundary at the transcript's 5' side.
    #[must_use]
    pub fn five_prime(&self) -> u32 {
        if self.strand.is_reverse() {
            self.end
        } else {
            self.start
        }
    }

    /// The boundary at the transcript's 3' side.
    #[must_use]
    pub fn three_prime(&self) -> u32 {
        if self.strand.is_reverse() {
            self.start
        } else {
            self.end
        }
    }

    #[must_use]
    pub fn contains(&self, other: &GtfEntry) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Counters collected while reading an annotation source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read, including comments and lines of other chromosomes.
    pub lines: u64,
    /// Lines turned into entries.
    pub entries: u64,
    /// Lines dropped because of bad columns or coordinates.
    pub malformed: u64,
    /// Lines of feature kinds that are not indexed.
    pub skipped_kinds: u64,
}

impl LoadStats {
    pub fn merge(&mut self, other: &LoadStats) {
        self.lines += other.lines;
        self.entries += other.entries;
        self.malformed += other.malformed;
        self.skipped_kinds += other.skipped_kinds;
    }
}
