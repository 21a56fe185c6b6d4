//! Synonymous-site calculator.
//!
//! For every base of a CDS the calculator assembles the codon the base
//! belongs to and records which of the four bases keep the encoded amino
//! acid. Codons are assembled in transcript order: coding sequence is
//! contiguous across exon junctions even though the genome is not, so a codon
//! split by an intron takes its missing bases from the neighbouring CDS of the
//! same transcript. Before the first and after the last CDS the codon
//! continues into the genomically adjacent bases.
//!
//! Masks are stored in genomic order and in reference-strand base identity,
//! so a minus-strand mask is complemented after it is computed.

use log::debug;

use crate::codon::CodonTable;
use crate::feature::{DegeneracyMask, Frame};
use crate::gtf::entry::GtfEntry;
use crate::reference::SequenceFetcher;
use crate::sequence::{BASES, base_bit, complement, complement_mask, reverse_complement};
use crate::strand::Strand;

/// Bases of context kept on each side of the spliced coding sequence.
const FLANK: usize = 2;

/// Spliced coding sequence of one transcript in transcript orientation,
/// padded with two bases of flank on each side. Bases the reference could
/// not supply are `None`.
#[derive(Debug, Clone)]
pub struct CodingContext {
    bases: Vec<Option<u8>>,
    /// Index into `bases` of the first base of each CDS.
    offsets: Vec<usize>,
    lengths: Vec<usize>,
    strand: Strand,
}

impl CodingContext {
    /// Assemble the context for CDS entries given in 5'→3' transcript order.
    pub fn assemble<F: SequenceFetcher + ?Sized>(
        chrom: &str,
        strand: Strand,
        cds: &[GtfEntry],
        fetcher: &F,
    ) -> Self {
        let mut bases: Vec<Option<u8>> = Vec::with_capacity(
            cds.iter().map(|e| e.len() as usize).sum::<usize>() + 2 * FLANK,
        );
        let mut offsets = Vec::with_capacity(cds.len());
        let mut lengths = Vec::with_capacity(cds.len());

        let Some((first, last)) = cds.first().zip(cds.last()) else {
            return Self {
                bases,
                offsets,
                lengths,
                strand,
            };
        };

        // 5' flank, farthest base first
        for step in (1..=FLANK as i64).rev() {
            bases.push(flank_base(chrom, strand, first.five_prime(), -step, fetcher));
        }

        for entry in cds {
            offsets.push(bases.len());
            lengths.push(entry.len() as usize);
            match fetcher.fetch(chrom, entry.start, entry.end) {
                Ok(seq) => {
                    let oriented = if strand.is_reverse() {
                        reverse_complement(&seq)
                    } else {
                        seq
                    };
                    bases.extend(oriented.into_iter().map(Some));
                }
                Err(e) => {
                    debug!("{chrom}:{}-{}: {e}", entry.start, entry.end);
                    bases.extend(std::iter::repeat_n(None, entry.len() as usize));
                }
            }
        }

        // 3' flank, nearest base first
        for step in 1..=FLANK as i64 {
            bases.push(flank_base(chrom, strand, last.three_prime(), step, fetcher));
        }

        Self {
            bases,
            offsets,
            lengths,
            strand,
        }
    }

    /// Spliced coding sequence without flanks; unavailable bases are `N`.
    #[must_use]
    pub fn coding_sequence(&self) -> Vec<u8> {
        if self.bases.len() < 2 * FLANK {
            return Vec::new();
        }
        self.bases[FLANK..self.bases.len() - FLANK]
            .iter()
            .map(|b| b.unwrap_or(b'N'))
            .collect()
    }

    /// Degeneracy mask for the CDS at `index` (5'→3' order) with `frame`.
    /// The mask has one entry per base of the CDS, in genomic order.
    #[must_use]
    pub fn mask(&self, index: usize, frame: Frame, table: &CodonTable) -> DegeneracyMask {
        let (Some(&offset), Some(&length)) = (self.offsets.get(index), self.lengths.get(index))
        else {
            return DegeneracyMask::new(Box::default());
        };

        let mut bits = vec![0u8; length].into_boxed_slice();
        for d in 0..length {
            let in_codon = (d + 3 - frame.value() as usize) % 3;
            let codon_start = offset + d - in_codon;
            let mask = self.codon_mask(codon_start, in_codon, table);
            let mask = if self.strand.is_reverse() {
                complement_mask(mask)
            } else {
                mask
            };
            let genomic = if self.strand.is_reverse() {
                length - 1 - d
            } else {
                d
            };
            bits[genomic] = mask;
        }
        DegeneracyMask::new(bits)
    }

    /// Bases (transcript orientation) that keep the amino acid of the codon
    /// starting at `codon_start` when substituted at `in_codon`. Zero when
    /// the codon cannot be fully assembled.
    fn codon_mask(&self, codon_start: usize, in_codon: usize, table: &CodonTable) -> u8 {
        let mut codon = [0u8; 3];
        for (i, slot) in codon.iter_mut().enumerate() {
            match self.bases.get(codon_start + i).copied().flatten() {
                Some(b) => *slot = b,
                None => return 0,
            }
        }
        let Some(reference) = table.translate_codon(&codon) else {
            return 0;
        };

        let mut mask = 0;
        for alt in BASES {
            codon[in_codon] = alt;
            if table.translate_codon(&codon) == Some(reference) {
                mask |= base_bit(alt).unwrap_or(0);
            }
        }
        mask
    }
}

/// One base `step` positions beyond a transcript boundary, in transcript
/// orientation (negative steps go 5', positive steps go 3').
fn flank_base<F: SequenceFetcher + ?Sized>(
    chrom: &str,
    strand: Strand,
    boundary: u32,
    step: i64,
    fetcher: &F,
) -> Option<u8> {
    let genomic_step = if strand.is_reverse() { -step } else { step };
    let position = u32::try_from(i64::from(boundary) + genomic_step).ok()?;
    let base = *fetcher.fetch(chrom, position, position).ok()?.first()?;
    Some(if strand.is_reverse() {
        complement(base)
    } else {
        base
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::STANDARD;
    use crate::feature::FeatureKind;
    use crate::gtf::entry::GtfAttributes;
    use crate::reference::FastaReference;
    use crate::sequence::{BASE_A, BASE_C, BASE_G, BASE_T};

    fn cds(start: u32, end: u32, strand: Strand, frame: Frame) -> GtfEntry {
        GtfEntry {
            chrom: "chr1".to_string(),
            start,
            end,
            kind: FeatureKind::Cds,
            strand,
            frame,
            attributes: GtfAttributes::default(),
        }
    }

    fn reference(seq: &[u8]) -> FastaReference {
        FastaReference::from_sequences([("chr1", seq.to_vec())])
    }

    const ALL: u8 = BASE_A | BASE_C | BASE_G | BASE_T;

    #[test]
    fn leucine_wobble_is_fourfold() {
        // CTT at 4-6
        let r = reference(b"AAACTTAAA");
        let entries = [cds(4, 6, Strand::Forward, Frame::Zero)];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        let mask = ctx.mask(0, Frame::Zero, &STANDARD);
        assert_eq!(mask.len(), 3);
        // C: CTT→TTT is Phe, ATT Ile, GTT Val; only C keeps Leu
        assert_eq!(mask.get(0), Some(BASE_C));
        // T: CAT His, CCT Pro, CGT Arg; only T
        assert_eq!(mask.get(1), Some(BASE_T));
        assert_eq!(mask.get(2), Some(ALL));
    }

    #[test]
    fn leucine_first_position_on_ctg() {
        // CTG: TTG is also Leu
        let r = reference(b"CTG");
        let entries = [cds(1, 3, Strand::Forward, Frame::Zero)];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        let mask = ctx.mask(0, Frame::Zero, &STANDARD);
        assert_eq!(mask.get(0), Some(BASE_C | BASE_T));
    }

    #[test]
    fn codon_split_across_junction() {
        // exon1 CDS 3-4 "AT", intron 5-8, exon2 CDS 9-9 "G" → ATG (Met)
        let r = reference(b"CCATGTACGCC");
        let entries = [
            cds(3, 4, Strand::Forward, Frame::Zero),
            cds(9, 9, Strand::Forward, Frame::One),
        ];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        assert_eq!(ctx.coding_sequence(), b"ATG");
        let first = ctx.mask(0, Frame::Zero, &STANDARD);
        let second = ctx.mask(1, Frame::One, &STANDARD);
        // Met has a single codon: every position only tolerates itself
        assert_eq!(first.as_slice(), &[BASE_A, BASE_T]);
        assert_eq!(second.as_slice(), &[BASE_G]);
    }

    #[test]
    fn minus_strand_masks_in_reference_identity() {
        // genomic AAG reverse-complements to CTT (Leu)
        let r = reference(b"GGAAGGG");
        let entries = [cds(3, 5, Strand::Reverse, Frame::Zero)];
        let ctx = CodingContext::assemble("chr1", Strand::Reverse, &entries, &r);
        assert_eq!(ctx.coding_sequence(), b"CTT");
        let mask = ctx.mask(0, Frame::Zero, &STANDARD);
        // genomic 3 is the wobble base (transcript T): all four
        assert_eq!(mask.get(0), Some(ALL));
        // genomic 4 (transcript T, middle) tolerates only T → reference A
        assert_eq!(mask.get(1), Some(BASE_A));
        // genomic 5 (transcript C, first) tolerates only C → reference G
        assert_eq!(mask.get(2), Some(BASE_G));
    }

    #[test]
    fn contig_edge_yields_zero_mask() {
        // CDS starts at base 1 with frame 2: its first two bases finish a
        // codon that would need one base before the contig
        let r = reference(b"TGCTTAAA");
        let entries = [cds(1, 5, Strand::Forward, Frame::Two)];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        let mask = ctx.mask(0, Frame::Two, &STANDARD);
        assert_eq!(mask.get(0), Some(0));
        assert_eq!(mask.get(1), Some(0));
        // CTT at 3-5 resolves
        assert_eq!(mask.get(4), Some(ALL));
    }

    #[test]
    fn cds_beyond_contig_is_all_zero() {
        let r = reference(b"ACGTAC");
        let entries = [cds(4, 9, Strand::Forward, Frame::Zero)];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        let mask = ctx.mask(0, Frame::Zero, &STANDARD);
        assert_eq!(mask.len(), 6);
        assert!(mask.as_slice().iter().all(|&m| m == 0));
    }

    #[test]
    fn ambiguous_reference_base_is_zero() {
        let r = reference(b"CTNCTT");
        let entries = [cds(1, 6, Strand::Forward, Frame::Zero)];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        let mask = ctx.mask(0, Frame::Zero, &STANDARD);
        assert_eq!(&mask.as_slice()[..3], &[0u8, 0, 0]);
        assert_eq!(mask.get(5), Some(ALL));
    }

    #[test]
    fn stop_to_stop_is_synonymous() {
        // TAA: second position A→G gives TGA, also stop
        let r = reference(b"TAA");
        let entries = [cds(1, 3, Strand::Forward, Frame::Zero)];
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &entries, &r);
        let mask = ctx.mask(0, Frame::Zero, &STANDARD);
        assert_eq!(mask.get(1), Some(BASE_A | BASE_G));
        assert_eq!(mask.get(2), Some(BASE_A | BASE_G));
    }

    #[test]
    fn empty_transcript() {
        let r = reference(b"ACGT");
        let ctx = CodingContext::assemble("chr1", Strand::Forward, &[], &r);
        assert!(ctx.coding_sequence().is_empty());
        assert!(ctx.mask(0, Frame::Zero, &STANDARD).is_empty());
    }
}
