//! Transcript model assembled from GTF entries.

use crate::feature::FeatureKind;
use crate::gtf::entry::GtfEntry;
use crate::strand::Strand;

/// All indexed entries of one transcript, each list in 5'→3' transcript order.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub id: String,
    pub strand: Strand,
    pub exons: Vec<GtfEntry>,
    pub cds: Vec<GtfEntry>,
    pub start_codons: Vec<GtfEntry>,
    pub stop_codons: Vec<GtfEntry>,
}

impl Transcript {
    #[must_use]
    pub fn new(id: &str, strand: Strand) -> Self {
        Self {
            id: id.to_string(),
            strand,
            exons: Vec::new(),
            cds: Vec::new(),
            start_codons: Vec::new(),
            stop_codons: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: GtfEntry) {
        match entry.kind {
            FeatureKind::Exon => self.exons.push(entry),
            FeatureKind::Cds => self.cds.push(entry),
            FeatureKind::StartCodon => self.start_codons.push(entry),
            FeatureKind::StopCodon => self.stop_codons.push(entry),
        }
    }

    /// Sort every list 5'→3': ascending start on '+', descending on '-'.
    pub fn sort_five_to_three(&mut self) {
        let reverse = self.strand.is_reverse();
        for list in [
            &mut self.exons,
            &mut self.cds,
            &mut self.start_codons,
            &mut self.stop_codons,
        ] {
            if reverse {
                list.sort_by(|a, b| b.start.cmp(&a.start));
            } else {
                list.sort_by_key(|e| e.start);
            }
        }
    }

    /// Exon structure used for numbering and splice junctions. When a
    /// transcript lists no exon lines, its CDS lines stand in for exons.
    #[must_use]
    pub fn exon_structure(&self) -> &[GtfEntry] {
        if self.exons.is_empty() {
            &self.cds
        } else {
            &self.exons
        }
    }

    /// 0-based index of the exon containing `entry`, in 5'→3' order.
    #[must_use]
    pub fn containing_exon(&self, entry: &GtfEntry) -> Option<usize> {
        self.exon_structure().iter().position(|e| e.contains(entry))
    }

    /// Spliced coding length in bases.
    #[must_use]
    pub fn coding_length(&self) -> u32 {
        self.cds.iter().map(GtfEntry::len).sum()
    }
}
